// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the authentication flow and the relay.

/// Errors raised anywhere along the OAuth lifecycle.
///
/// Every variant is caught at the session store boundary and turned into
/// the message held by [`crate::models::AuthStatus::Error`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Cannot start login: {0}")]
    Login(String),

    #[error("No authorization code in callback")]
    MissingCode,

    #[error("Authorization denied by provider: {0}")]
    Denied(String),

    #[error("Code exchange failed: {0}")]
    Exchange(String),

    #[error("Invalid or expired token: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Token storage error: {0}")]
    Persistence(String),
}

impl AuthError {
    /// Message shown to the user on the login screen.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Login(_) => "Sign-in is not available. Check the app configuration.".into(),
            AuthError::MissingCode => "Sign-in did not complete. Please try again.".into(),
            AuthError::Denied(reason) => format!("GitHub sign-in was cancelled ({reason})."),
            AuthError::Exchange(_) => {
                "GitHub rejected the sign-in code. Please sign in again.".into()
            }
            AuthError::Auth(_) => "Your session has expired. Please sign in again.".into(),
            AuthError::Network(_) => {
                "Could not reach GitHub. Check your connection and try again.".into()
            }
            AuthError::Persistence(_) => "Could not access saved sign-in data.".into(),
        }
    }

    /// True when the provider rejected the token itself (HTTP 401).
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AuthError::Auth(_))
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AuthError::Network(format!("request timed out: {err}"))
        } else {
            AuthError::Network(err.to_string())
        }
    }
}

/// Relay server errors.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Result type alias for the auth flow
pub type Result<T> = std::result::Result<T, AuthError>;
