//! Session and observable auth state.

use serde::Serialize;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::User;

/// Access token paired with the profile fetched for it.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Session store state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "src/lib/generated/")
)]
#[serde(tag = "state", content = "message", rename_all = "camelCase")]
pub enum AuthStatus {
    Unauthenticated,
    Loading,
    Authenticated,
    Error(String),
}

/// Point-in-time view of the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub status: AuthStatus,
    pub session: Option<Session>,
    /// Informational message, e.g. after an expired session was purged.
    pub notice: Option<String>,
}

impl Default for AuthSnapshot {
    /// Startup state: loading until the persisted session is checked.
    fn default() -> Self {
        Self {
            status: AuthStatus::Loading,
            session: None,
            notice: None,
        }
    }
}

impl AuthSnapshot {
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_loading(&self) -> bool {
        self.status == AuthStatus::Loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            AuthStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Serializable view for the UI. Never includes the access token.
    pub fn view(&self) -> AuthView {
        AuthView {
            status: self.status.clone(),
            user: self.user().cloned(),
            notice: self.notice.clone(),
        }
    }
}

/// What the UI is allowed to see of the auth state.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AuthView {
    pub status: AuthStatus,
    pub user: Option<User>,
    pub notice: Option<String>,
}
