// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end sign-in lifecycle against a mock GitHub and an on-disk
//! token store.

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wtf_today::db::{keys, TokenStore};
use wtf_today::models::AuthStatus;
use wtf_today::navigation::{Navigation, Route};
use wtf_today::services::session::SESSION_EXPIRED_NOTICE;

mod common;

#[tokio::test]
async fn test_callback_survives_restart() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    common::mock_exchange(&server, "abc123", "gho_token").await;
    common::mock_user(&server, "gho_token").await;

    let ctx = common::test_context(&server, dir.path());
    ctx.session.check_session().await;
    assert_eq!(ctx.navigate("/"), Navigation::redirect(Route::Login));

    let outcome = ctx
        .callbacks
        .on_callback_view("http://localhost:1420/auth-success?code=abc123")
        .await;
    assert_eq!(outcome.navigation, Navigation::replace(Route::Dashboard));
    let signed_in = ctx.session.snapshot();
    assert_eq!(signed_in.status, AuthStatus::Authenticated);

    // The token is on disk under the fixed key.
    let raw = std::fs::read_to_string(dir.path().join("auth.json")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[keys::AUTH_TOKEN], "gho_token");

    // Fresh process: same identity from the persisted token.
    let restarted = common::test_context(&server, dir.path());
    restarted.session.check_session().await;
    assert_eq!(restarted.session.snapshot().user(), signed_in.user());
    assert_eq!(
        restarted.navigate("/login"),
        Navigation::redirect(Route::Dashboard)
    );
}

#[tokio::test]
async fn test_deep_link_drives_same_transition() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    common::mock_exchange(&server, "xyz", "gho_token").await;
    common::mock_user(&server, "gho_token").await;

    let ctx = common::test_context(&server, dir.path());
    let outcome = ctx
        .callbacks
        .on_open_url(&["wtftodaydev://auth-success?code=xyz".to_string()])
        .await;

    assert!(outcome.succeeded());
    assert_eq!(ctx.session.snapshot().user().unwrap().name, "The Octocat");
}

#[tokio::test]
async fn test_check_session_without_token_never_fetches_profile() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::octocat()))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = common::test_context(&server, dir.path());
    ctx.session.check_session().await;

    assert_eq!(ctx.session.snapshot().status, AuthStatus::Unauthenticated);
    server.verify().await;
}

#[tokio::test]
async fn test_expired_token_is_purged() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;

    let tokens = TokenStore::new(dir.path().join("auth.json"));
    tokens.save_token("gho_revoked").await.unwrap();

    let ctx = common::test_context(&server, dir.path());
    ctx.session.check_session().await;

    let snapshot = ctx.session.snapshot();
    assert_eq!(snapshot.status, AuthStatus::Unauthenticated);
    assert_eq!(snapshot.notice.as_deref(), Some(SESSION_EXPIRED_NOTICE));
    assert_eq!(tokens.load_token().await.unwrap(), None);
}

#[tokio::test]
async fn test_rejected_code_routes_to_login() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "bad_verification_code"})),
        )
        .mount(&server)
        .await;

    let ctx = common::test_context(&server, dir.path());
    let outcome = ctx.callbacks.on_callback_view("/auth-success?code=used").await;

    assert_eq!(outcome.navigation, Navigation::replace(Route::Login));
    assert!(ctx.session.snapshot().error().is_some());
    assert!(!dir.path().join("auth.json").exists());

    ctx.session.clear_error();
    assert_eq!(ctx.session.snapshot().status, AuthStatus::Unauthenticated);
}

#[tokio::test]
async fn test_logout_clears_disk_and_memory() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    common::mock_exchange(&server, "abc", "gho_token").await;
    common::mock_user(&server, "gho_token").await;

    let ctx = common::test_context(&server, dir.path());
    ctx.session.handle_auth_callback("abc").await.unwrap();

    ctx.session.logout().await;
    ctx.session.logout().await;

    assert_eq!(ctx.session.snapshot().status, AuthStatus::Unauthenticated);
    let tokens = TokenStore::new(dir.path().join("auth.json"));
    assert_eq!(tokens.load_token().await.unwrap(), None);
    assert_eq!(ctx.navigate("/settings"), Navigation::redirect(Route::Login));
}

#[tokio::test]
async fn test_login_without_client_id_is_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = wtf_today::config::Config {
        github_client_id: String::new(),
        ..common::test_config(&server, dir.path())
    };
    let ctx = wtf_today::AppContext::new(
        config,
        std::sync::Arc::new(wtf_today::services::HeadlessWindow),
    )
    .unwrap();

    let err = ctx.session.login().unwrap_err();
    assert!(matches!(err, wtf_today::error::AuthError::Login(_)));
    assert!(ctx.session.snapshot().error().is_some());
}

#[tokio::test]
async fn test_token_store_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("nested").join("auth.json"));

    assert_eq!(store.load_token().await.unwrap(), None);
    store.remove("never-set").await.unwrap();

    store.set("other_key", "keep").await.unwrap();
    store.save_token("gho_1").await.unwrap();
    store.delete_token().await.unwrap();

    assert_eq!(store.load_token().await.unwrap(), None);
    assert_eq!(store.get("other_key").await.unwrap().as_deref(), Some("keep"));
}

#[tokio::test]
async fn test_corrupt_token_file_reads_as_signed_out() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("auth.json"), "{not json").unwrap();

    let ctx = common::test_context(&server, dir.path());
    ctx.session.check_session().await;

    assert_eq!(ctx.session.snapshot().status, AuthStatus::Unauthenticated);
}
