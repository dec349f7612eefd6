// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authorization code receivers.
//!
//! Two entry points hand a code to [`SessionStore::handle_auth_callback`]:
//! - the callback view, reading `?code=` from its own location
//! - the deep-link handler, reading `<scheme>://auth-success?code=` from an
//!   OS "URL opened" event
//!
//! Both end on `/dashboard` on success and `/login` on failure, replacing the
//! history entry so back-navigation never returns to the callback.

use crate::error::AuthError;
use crate::navigation::{Navigation, Route};
use crate::services::session::SessionStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

/// Base used to resolve relative callback locations.
const LOCAL_ORIGIN: &str = "http://localhost/";

/// Native window hooks used when a deep link arrives.
pub trait HostWindow: Send + Sync {
    /// Show, unminimize and focus the main window.
    fn reveal(&self);
}

/// Window stand-in for headless runs.
pub struct HeadlessWindow;

impl HostWindow for HeadlessWindow {
    fn reveal(&self) {
        tracing::debug!("No host window to focus");
    }
}

/// Result of processing one callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub navigation: Navigation,
    pub error: Option<AuthError>,
}

impl CallbackOutcome {
    fn completed() -> Self {
        Self {
            navigation: Navigation::replace(Route::Dashboard),
            error: None,
        }
    }

    fn failed(error: AuthError) -> Self {
        Self {
            navigation: Navigation::replace(Route::Login),
            error: Some(error),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Pull the authorization code out of a callback URL.
///
/// A provider-reported `error` wins over any code.
pub fn extract_code(url: &Url) -> Result<String, AuthError> {
    let mut code = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.trim().to_string()),
            "error" => error = Some(value.trim().to_string()),
            _ => {}
        }
    }

    if let Some(error) = error.filter(|e| !e.is_empty()) {
        return Err(AuthError::Denied(error));
    }
    code.filter(|c| !c.is_empty()).ok_or(AuthError::MissingCode)
}

/// Parse the callback view's location, absolute or relative.
pub fn parse_location(location: &str) -> Result<Url, AuthError> {
    let location = location.trim();
    Url::parse(location)
        .or_else(|_| Url::parse(LOCAL_ORIGIN).and_then(|base| base.join(location)))
        .map_err(|e| {
            tracing::warn!(error = %e, "Unparseable callback location");
            AuthError::MissingCode
        })
}

/// Parse a deep link for `scheme` and return its code.
///
/// Accepts both `scheme://auth-success?code=..` and the opaque
/// `scheme:auth-success?code=..` form.
pub fn parse_deep_link(link: &str, scheme: &str) -> Result<String, AuthError> {
    let url = Url::parse(link.trim()).map_err(|e| {
        tracing::warn!(error = %e, "Unparseable deep link");
        AuthError::MissingCode
    })?;

    if !url.scheme().eq_ignore_ascii_case(scheme) {
        tracing::warn!(scheme = url.scheme(), expected = scheme, "Deep link for another scheme");
        return Err(AuthError::MissingCode);
    }

    extract_code(&url)
}

/// Feeds codes from either transport into the session store.
pub struct CallbackReceiver {
    store: Arc<SessionStore>,
    scheme: String,
    window: Arc<dyn HostWindow>,
}

impl CallbackReceiver {
    pub fn new(
        store: Arc<SessionStore>,
        scheme: impl Into<String>,
        window: Arc<dyn HostWindow>,
    ) -> Self {
        Self {
            store,
            scheme: scheme.into(),
            window,
        }
    }

    /// Callback view mounted at `location`.
    pub async fn on_callback_view(&self, location: &str) -> CallbackOutcome {
        match parse_location(location).and_then(|url| extract_code(&url)) {
            Ok(code) => {
                tracing::info!(transport = "query", "Found code in callback location");
                self.complete(&code).await
            }
            Err(err) => self.reject(err),
        }
    }

    /// OS delivered a batch of opened URLs. Only the first one is used.
    pub async fn on_open_url(&self, urls: &[String]) -> CallbackOutcome {
        let Some(link) = urls.first() else {
            return self.reject(AuthError::MissingCode);
        };

        match parse_deep_link(link, &self.scheme) {
            Ok(code) => {
                tracing::info!(transport = "deep_link", "Found code in deep link");
                self.window.reveal();
                self.complete(&code).await
            }
            Err(err) => self.reject(err),
        }
    }

    async fn complete(&self, code: &str) -> CallbackOutcome {
        match self.store.handle_auth_callback(code).await {
            Ok(()) => CallbackOutcome::completed(),
            Err(err) => CallbackOutcome::failed(err),
        }
    }

    fn reject(&self, err: AuthError) -> CallbackOutcome {
        self.store.record_error(&err);
        CallbackOutcome::failed(err)
    }
}

/// Process deep-link batches one at a time until `events` closes.
pub fn spawn_deep_link_listener(
    receiver: Arc<CallbackReceiver>,
    mut events: mpsc::Receiver<Vec<String>>,
    outcomes: mpsc::Sender<CallbackOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(urls) = events.recv().await {
            let outcome = receiver.on_open_url(&urls).await;
            if outcomes.send(outcome).await.is_err() {
                tracing::debug!("Outcome channel closed, stopping deep-link listener");
                break;
            }
        }
    })
}
