// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Headless desktop shell.
//!
//! The OS launches this binary with the opened deep link as its argument
//! (`wtf-today wtftodaydev://auth-success?code=...`). Without one it
//! restores the persisted session, or prints the GitHub sign-in URL.
//!
//! `wtf-today --logout` drops the saved session; `wtf-today --status`
//! prints the auth state as JSON.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wtf_today::config::Config;
use wtf_today::navigation::Navigation;
use wtf_today::services::HeadlessWindow;
use wtf_today::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env()?;
    let ctx = AppContext::new(config, Arc::new(HeadlessWindow))?;

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--logout") {
        ctx.session.logout().await;
        println!("Signed out.");
        return Ok(());
    }

    ctx.session.check_session().await;

    if arg.as_deref() == Some("--status") {
        println!("{}", serde_json::to_string_pretty(&ctx.session.snapshot().view())?);
        return Ok(());
    }

    if let Some(link) = arg {
        let outcome = ctx.callbacks.on_open_url(&[link]).await;
        if let Some(err) = &outcome.error {
            eprintln!("{}", err.user_message());
        }
        report(&ctx, &outcome.navigation);
        return Ok(());
    }

    let snapshot = ctx.session.snapshot();
    if let Some(notice) = &snapshot.notice {
        eprintln!("{}", notice);
    }

    if snapshot.is_authenticated() {
        report(&ctx, &ctx.navigate("/"));
    } else {
        match ctx.session.login() {
            Ok(url) => println!("Sign in with GitHub: {}", url),
            Err(err) => eprintln!("{}", err.user_message()),
        }
    }

    Ok(())
}

fn report(ctx: &AppContext, navigation: &Navigation) {
    let snapshot = ctx.session.snapshot();
    if let Some(user) = snapshot.user() {
        println!("Signed in as {} <{}>", user.name, user.email);
    }
    if let Some(route) = navigation.target() {
        println!("-> {}", route);
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
