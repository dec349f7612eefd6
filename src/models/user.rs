//! User model shared by the session store and the UI.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Authenticated user's identity.
///
/// Never mutated after a fetch; a new profile replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// GitHub user ID, as a string
    pub id: String,
    /// Display name (falls back to the login)
    pub name: String,
    /// Primary email, empty if not shared
    pub email: String,
    /// Avatar image URL
    pub avatar_url: String,
}

/// `GET /user` response from GitHub.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubProfile {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
}

impl From<GithubProfile> for User {
    fn from(profile: GithubProfile) -> Self {
        let name = profile
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| profile.login.clone());

        Self {
            id: profile.id.to_string(),
            name,
            email: profile.email.unwrap_or_default(),
            avatar_url: profile.avatar_url,
        }
    }
}
