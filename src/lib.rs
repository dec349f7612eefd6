// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! WTF Today: GitHub sign-in for the daily briefing desktop app.
//!
//! This crate provides the authentication core (session store, GitHub
//! client, callback receivers, navigation gate) and the stateless relay
//! that bounces browser OAuth redirects into the app's custom URL scheme.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod services;

use config::Config;
use db::TokenStore;
use navigation::{Navigation, Route};
use services::{AuthProvider, CallbackReceiver, GithubClient, HostWindow, SessionStore};
use std::sync::Arc;

/// Shared relay state.
pub struct AppState {
    pub config: Config,
}

/// Desktop-side context, built once at startup and handed to every consumer.
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub callbacks: Arc<CallbackReceiver>,
}

impl AppContext {
    /// Wire the GitHub client and the file-backed token store from `config`.
    pub fn new(config: Config, window: Arc<dyn HostWindow>) -> error::Result<Self> {
        let provider = Arc::new(GithubClient::new(&config)?);
        let tokens = TokenStore::new(config.token_file());
        Ok(Self::with_parts(config, provider, tokens, window))
    }

    pub fn with_parts(
        config: Config,
        provider: Arc<dyn AuthProvider>,
        tokens: TokenStore,
        window: Arc<dyn HostWindow>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(provider, tokens));
        let callbacks = Arc::new(CallbackReceiver::new(
            session.clone(),
            config.deep_link_scheme.clone(),
            window,
        ));
        Self {
            config,
            session,
            callbacks,
        }
    }

    /// Gate a location against the current session.
    pub fn navigate(&self, location: &str) -> Navigation {
        navigation::gate(&Route::parse(location), &self.session.snapshot())
    }
}
