//! Application configuration loaded from environment variables.
//!
//! Every value has a default so an unconfigured build still starts; an empty
//! GitHub client ID just leaves the login button unusable.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default custom URL scheme registered by the desktop shell.
pub const DEFAULT_DEEP_LINK_SCHEME: &str = "wtftodaydev";

/// Application configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    /// GitHub OAuth client ID (public)
    pub github_client_id: String,
    /// GitHub OAuth client secret. Only the native process ever holds it.
    pub github_client_secret: Option<String>,
    /// Redirect URI registered with the GitHub OAuth app
    pub redirect_uri: String,
    /// Custom URL scheme for deep links (without "://")
    pub deep_link_scheme: String,
    /// Relay listen port
    pub port: u16,
    /// Timeout applied to every outbound HTTP call
    pub http_timeout: Duration,
    /// Base URL for the OAuth endpoints (authorize, access_token)
    pub github_oauth_url: String,
    /// Base URL for the REST API (profile fetch)
    pub github_api_url: String,
    /// Directory holding the persisted token file
    pub data_dir: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            github_client_id: "test_client_id".to_string(),
            github_client_secret: Some("test_secret".to_string()),
            redirect_uri: format!("{DEFAULT_DEEP_LINK_SCHEME}://auth-success"),
            deep_link_scheme: DEFAULT_DEEP_LINK_SCHEME.to_string(),
            port: 3000,
            http_timeout: Duration::from_secs(15),
            github_oauth_url: "https://github.com".to_string(),
            github_api_url: "https://api.github.com".to_string(),
            data_dir: env::temp_dir().join("wtf-today-test"),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_client_id", &self.github_client_id)
            .field(
                "github_client_secret",
                &self.github_client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("redirect_uri", &self.redirect_uri)
            .field("deep_link_scheme", &self.deep_link_scheme)
            .field("port", &self.port)
            .field("http_timeout", &self.http_timeout)
            .field("github_oauth_url", &self.github_oauth_url)
            .field("github_api_url", &self.github_api_url)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let deep_link_scheme =
            env::var("DEEP_LINK_SCHEME").unwrap_or_else(|_| DEFAULT_DEEP_LINK_SCHEME.to_string());

        Ok(Self {
            github_client_id: env::var("GITHUB_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            github_client_secret: env::var("GITHUB_CLIENT_SECRET")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            redirect_uri: env::var("GITHUB_REDIRECT_URI")
                .unwrap_or_else(|_| format!("{deep_link_scheme}://auth-success")),
            port: parse_var("PORT", 3000)?,
            http_timeout: Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 15)?),
            github_oauth_url: env::var("GITHUB_OAUTH_URL")
                .unwrap_or_else(|_| "https://github.com".to_string()),
            github_api_url: env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".to_string()),
            data_dir: data_dir()?,
            deep_link_scheme,
        })
    }

    /// Path of the JSON file backing the token store.
    pub fn token_file(&self) -> PathBuf {
        self.data_dir.join("auth.json")
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw.clone(),
        }),
        Err(_) => Ok(default),
    }
}

fn data_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = env::var("WTF_TODAY_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|dir| dir.join("wtf-today"))
        .ok_or(ConfigError::Missing("WTF_TODAY_DATA_DIR"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
