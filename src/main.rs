// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! WTF Today auth relay
//!
//! Bridges browser-based GitHub OAuth redirects into the desktop app's
//! custom URL scheme.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wtf_today::{config::Config, error::RelayError, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        scheme = %config.deep_link_scheme,
        "Starting WTF Today auth relay"
    );

    let port = config.port;
    let state = Arc::new(AppState { config });

    // Build router
    let app = wtf_today::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| RelayError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(address = %addr, "Relay listening");

    axum::serve(listener, app).await.map_err(RelayError::Serve)?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wtf_today=debug,info")),
        )
        .with(format)
        .init();
}
