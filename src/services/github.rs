// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub OAuth client.
//!
//! Handles:
//! - Authorization URL construction
//! - Code-for-token exchange (holds the client secret, native side only)
//! - Authenticated user profile fetch

use crate::config::Config;
use crate::error::AuthError;
use crate::models::{GithubProfile, User};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

/// Scopes requested at authorization time.
pub const OAUTH_SCOPE: &str = "user:email,read:user";

const USER_AGENT: &str = concat!("wtf-today/", env!("CARGO_PKG_VERSION"));

/// The provider operations the session store depends on.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Build the provider's authorize URL. Pure function of configuration.
    fn authorization_url(&self) -> Result<Url, AuthError>;

    /// Exchange a single-use authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, AuthError>;

    /// Fetch the profile of the user owning `access_token`.
    async fn fetch_user(&self, access_token: &str) -> Result<User, AuthError>;
}

/// GitHub API client.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    oauth_url: String,
    api_url: String,
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: String,
}

impl GithubClient {
    /// Create a client from configuration. Every request is bounded by
    /// `config.http_timeout`.
    pub fn new(config: &Config) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AuthError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            oauth_url: config.github_oauth_url.trim_end_matches('/').to_string(),
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            client_id: config.github_client_id.clone(),
            client_secret: config.github_client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        })
    }
}

#[async_trait]
impl AuthProvider for GithubClient {
    fn authorization_url(&self) -> Result<Url, AuthError> {
        if self.client_id.is_empty() {
            return Err(AuthError::Login("GitHub client ID is not configured".into()));
        }

        let base = format!("{}/login/oauth/authorize", self.oauth_url);
        let mut url = Url::parse(&base)
            .map_err(|e| AuthError::Login(format!("Invalid OAuth URL {}: {}", base, e)))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", OAUTH_SCOPE);

        Ok(url)
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let secret = self
            .client_secret
            .as_deref()
            .ok_or_else(|| AuthError::Exchange("GitHub client secret is not configured".into()))?;

        let response = self
            .http
            .post(format!("{}/login/oauth/access_token", self.oauth_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", secret),
                ("code", code),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Exchange(format!("HTTP {}: {}", status, body)));
        }

        let TokenResponse {
            access_token,
            scope,
            error,
            error_description,
        } = response
            .json()
            .await
            .map_err(|e| AuthError::Exchange(format!("JSON parse error: {}", e)))?;

        if let Some(error) = error {
            tracing::warn!(error = %error, "GitHub rejected authorization code");
            return Err(AuthError::Exchange(match error_description {
                Some(description) => format!("{}: {}", error, description),
                None => error,
            }));
        }

        match access_token {
            Some(token) if !token.is_empty() => {
                tracing::info!(scope = scope.as_deref().unwrap_or(""), "Code exchanged");
                Ok(token)
            }
            _ => Err(AuthError::Exchange("Failed to get access token".into())),
        }
    }

    async fn fetch_user(&self, access_token: &str) -> Result<User, AuthError> {
        let response = self
            .http
            .get(format!("{}/user", self.api_url))
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(AuthError::Auth("GitHub returned 401".into()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Network(format!("HTTP {}: {}", status, body)));
        }

        let profile: GithubProfile = response
            .json()
            .await
            .map_err(|e| AuthError::Network(format!("JSON parse error: {}", e)))?;

        Ok(profile.into())
    }
}

/// Access token response from GitHub. GitHub reports a bad code with a
/// 200 and an `error` field.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}
