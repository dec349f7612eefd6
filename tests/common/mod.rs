// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wtf_today::config::Config;
use wtf_today::routes::create_router;
use wtf_today::services::HeadlessWindow;
use wtf_today::{AppContext, AppState};

/// Config pointing both GitHub bases at a mock server and the token file
/// into `data_dir`.
#[allow(dead_code)]
pub fn test_config(server: &MockServer, data_dir: &Path) -> Config {
    Config {
        github_oauth_url: server.uri(),
        github_api_url: server.uri(),
        data_dir: data_dir.to_path_buf(),
        http_timeout: Duration::from_secs(2),
        ..Config::default()
    }
}

/// Desktop context backed by a mock GitHub and an on-disk token store.
#[allow(dead_code)]
pub fn test_context(server: &MockServer, data_dir: &Path) -> AppContext {
    AppContext::new(test_config(server, data_dir), Arc::new(HeadlessWindow))
        .expect("context should build")
}

/// Create a relay app with the default test config.
#[allow(dead_code)]
pub fn create_test_relay() -> axum::Router {
    let state = Arc::new(AppState {
        config: Config::default(),
    });
    create_router(state)
}

/// GitHub accepts `code` once and returns `token`.
#[allow(dead_code)]
pub async fn mock_exchange(server: &MockServer, code: &str, token: &str) {
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(wiremock::matchers::body_string_contains(format!("code={}", code)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "bearer",
            "scope": "read:user,user:email"
        })))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

/// `GET /user` succeeds for `token` with the octocat profile.
#[allow(dead_code)]
pub async fn mock_user(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(octocat()))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn octocat() -> serde_json::Value {
    json!({
        "login": "octocat",
        "id": 583231,
        "name": "The Octocat",
        "email": "octocat@github.com",
        "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4"
    })
}
