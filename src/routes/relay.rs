// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth redirect relay.
//!
//! GitHub redirects the browser to `/auth-success`; this endpoint bounces it
//! to the desktop app's custom scheme. No state, no token exchange.

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth-success", get(auth_success))
}

/// Reason forwarded when the provider sent neither a code nor an error.
pub const NO_CODE: &str = "no_code";

/// Query parameters GitHub appends to the redirect URI.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RedirectParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

impl RedirectParams {
    /// Parse a raw query string. Repeated keys keep their first value;
    /// malformed input never fails.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "code" if params.code.is_none() => params.code = Some(value.into_owned()),
                "error" if params.error.is_none() => params.error = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    /// Provider-reported error, if non-empty.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().filter(|s| !s.is_empty())
    }

    /// Authorization code, if non-empty.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|s| !s.is_empty())
    }
}

/// Deep link the browser is sent to for these redirect parameters.
pub fn deep_link_for(scheme: &str, params: &RedirectParams) -> String {
    if let Some(error) = params.error() {
        return format!("{}://auth-error?error={}", scheme, urlencoding::encode(error));
    }

    match params.code() {
        Some(code) => format!("{}://auth-success?code={}", scheme, urlencoding::encode(code)),
        None => format!("{}://auth-error?error={}", scheme, NO_CODE),
    }
}

/// OAuth callback - forward code or error to the custom scheme.
async fn auth_success(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let params = RedirectParams::from_query(query.as_deref().unwrap_or_default());

    if let Some(error) = params.error() {
        tracing::warn!(error = %error, "OAuth error from GitHub");
    } else if params.code().is_none() {
        tracing::warn!("No code received");
    } else {
        tracing::info!("Forwarding authorization code to desktop app");
    }

    let location = deep_link_for(&state.config.deep_link_scheme, &params);
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
