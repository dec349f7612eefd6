// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store: the single owner of the signed-in user's session.
//!
//! State lives in a `watch` channel so the shell can observe transitions.
//! Callback handling, the startup session check and logout run one at a
//! time behind an in-flight guard, so the query-string and deep-link
//! receivers can both fire for the same redirect without racing.

use crate::db::TokenStore;
use crate::error::{AuthError, Result};
use crate::models::{AuthSnapshot, AuthStatus, Session};
use crate::services::github::AuthProvider;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use url::Url;

/// Notice shown on the login screen after a dead persisted token was purged.
pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please sign in again.";

/// Bookkeeping held while an operation is in flight.
#[derive(Default)]
struct Flight {
    /// Authorization code that produced the current session.
    last_code: Option<String>,
}

/// Owns the session and the persisted token.
pub struct SessionStore {
    provider: Arc<dyn AuthProvider>,
    tokens: TokenStore,
    state: watch::Sender<AuthSnapshot>,
    in_flight: Mutex<Flight>,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn AuthProvider>, tokens: TokenStore) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::default());
        Self {
            provider,
            tokens,
            state,
            in_flight: Mutex::new(Flight::default()),
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    /// Compute the authorization URL for the caller to open in an external
    /// browser. Never navigates by itself.
    pub fn login(&self) -> Result<Url> {
        self.state.send_modify(|s| {
            s.status = AuthStatus::Loading;
            s.notice = None;
        });

        match self.provider.authorization_url() {
            Ok(url) => {
                tracing::info!("Starting OAuth flow, opening GitHub authorization");
                self.settle();
                Ok(url)
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Exchange an authorization code for a session.
    ///
    /// A failure leaves any existing session untouched and is returned to
    /// the caller after being recorded in the `Error` state.
    pub async fn handle_auth_callback(&self, code: &str) -> Result<()> {
        let code = code.trim();
        if code.is_empty() {
            let err = AuthError::MissingCode;
            self.record_error(&err);
            return Err(err);
        }

        let mut flight = self.in_flight.lock().await;

        // Same redirect delivered by both receivers; the code is single-use.
        if flight.last_code.as_deref() == Some(code) && self.state.borrow().session.is_some() {
            tracing::debug!("Authorization code already consumed, keeping current session");
            self.state.send_modify(|s| {
                s.status = AuthStatus::Authenticated;
                s.notice = None;
            });
            return Ok(());
        }

        self.state.send_modify(|s| {
            s.status = AuthStatus::Loading;
            s.notice = None;
        });

        let session = match self.authenticate(code).await {
            Ok(session) => session,
            Err(err) => {
                self.record_error(&err);
                return Err(err);
            }
        };

        if let Err(e) = self.tokens.save_token(&session.access_token).await {
            tracing::warn!(error = %e, "Failed to persist access token, session is memory-only");
        }

        tracing::info!(
            user_id = %session.user.id,
            name = %session.user.name,
            "OAuth successful, session stored"
        );

        flight.last_code = Some(code.to_string());
        self.state.send_modify(|s| {
            s.session = Some(session);
            s.status = AuthStatus::Authenticated;
        });

        Ok(())
    }

    /// Restore the session from the persisted token, validating it against
    /// the provider. A token that fails validation is deleted.
    pub async fn check_session(&self) {
        let mut flight = self.in_flight.lock().await;

        self.state.send_modify(|s| {
            s.status = AuthStatus::Loading;
            s.notice = None;
        });

        let token = self.tokens.load_token().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read persisted token, treating as absent");
            None
        });

        let Some(token) = token else {
            tracing::debug!("No persisted token");
            self.state.send_modify(|s| {
                s.session = None;
                s.status = AuthStatus::Unauthenticated;
            });
            return;
        };

        match self.provider.fetch_user(&token).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Persisted session is valid");
                self.state.send_modify(|s| {
                    s.session = Some(Session {
                        access_token: token,
                        user,
                    });
                    s.status = AuthStatus::Authenticated;
                });
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    token_rejected = err.is_auth_error(),
                    "Persisted session is no longer valid, purging token"
                );
                if let Err(e) = self.tokens.delete_token().await {
                    tracing::error!(error = %e, "Failed to delete persisted token");
                }
                flight.last_code = None;
                self.state.send_modify(|s| {
                    s.session = None;
                    s.status = AuthStatus::Unauthenticated;
                    s.notice = Some(SESSION_EXPIRED_NOTICE.to_string());
                });
            }
        }
    }

    /// Drop the session and the persisted token. Idempotent.
    pub async fn logout(&self) {
        let mut flight = self.in_flight.lock().await;

        if let Err(e) = self.tokens.delete_token().await {
            tracing::error!(error = %e, "Failed to delete persisted token on logout");
        }
        flight.last_code = None;

        self.state.send_modify(|s| {
            s.session = None;
            s.status = AuthStatus::Unauthenticated;
            s.notice = None;
        });
        tracing::info!("Logged out");
    }

    /// Leave the `Error` state. No other side effects.
    pub fn clear_error(&self) {
        if self.state.borrow().error().is_some() {
            self.settle();
        }
    }

    /// Log `err` and move to `Error` with its user-facing message.
    pub fn record_error(&self, err: &AuthError) {
        tracing::warn!(error = %err, "Authentication error");
        let message = err.user_message();
        self.state.send_modify(|s| s.status = AuthStatus::Error(message));
    }

    async fn authenticate(&self, code: &str) -> Result<Session> {
        let access_token = self.provider.exchange_code(code).await?;
        let user = self.provider.fetch_user(&access_token).await?;
        Ok(Session { access_token, user })
    }

    /// Resting state matching whether a session is held.
    fn settle(&self) {
        self.state.send_modify(|s| {
            s.status = if s.session.is_some() {
                AuthStatus::Authenticated
            } else {
                AuthStatus::Unauthenticated
            };
        });
    }
}
