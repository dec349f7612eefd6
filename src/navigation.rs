// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Navigation gate: which screen to show for a requested path.
//!
//! Stateless. Recomputed from a session snapshot on every render.

use crate::models::AuthSnapshot;
use std::fmt;

/// Application screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    AuthSuccess,
    Login,
    Onboarding,
    Dashboard,
    Settings,
    NotFound(String),
}

impl Route {
    /// Parse a location path. Query string, fragment and trailing slash are
    /// ignored.
    pub fn parse(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        match path {
            "" => Route::Root,
            "/auth-success" => Route::AuthSuccess,
            "/login" => Route::Login,
            "/onboarding" => Route::Onboarding,
            "/dashboard" => Route::Dashboard,
            "/settings" => Route::Settings,
            other => Route::NotFound(other.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Root => "/",
            Route::AuthSuccess => "/auth-success",
            Route::Login => "/login",
            Route::Onboarding => "/onboarding",
            Route::Dashboard => "/dashboard",
            Route::Settings => "/settings",
            Route::NotFound(path) => path.as_str(),
        }
    }

    /// Screens that need a signed-in user.
    pub fn requires_user(&self) -> bool {
        matches!(self, Route::Onboarding | Route::Dashboard | Route::Settings)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of gating a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Show the loading indicator.
    Loading,
    /// Render the screen for this route.
    Render(Route),
    /// Navigate elsewhere. `replace` drops the current history entry.
    Redirect { to: Route, replace: bool },
}

impl Navigation {
    pub fn redirect(to: Route) -> Self {
        Navigation::Redirect { to, replace: false }
    }

    pub fn replace(to: Route) -> Self {
        Navigation::Redirect { to, replace: true }
    }

    /// Route that will end up displayed, if any.
    pub fn target(&self) -> Option<&Route> {
        match self {
            Navigation::Loading => None,
            Navigation::Render(route) | Navigation::Redirect { to: route, .. } => Some(route),
        }
    }
}

/// Decide what to show for `requested` given the current auth state.
pub fn gate(requested: &Route, snapshot: &AuthSnapshot) -> Navigation {
    if snapshot.is_loading() {
        return Navigation::Loading;
    }

    let signed_in = snapshot.user().is_some();
    match requested {
        Route::AuthSuccess | Route::NotFound(_) => Navigation::Render(requested.clone()),
        Route::Login if signed_in => Navigation::redirect(Route::Dashboard),
        Route::Login => Navigation::Render(Route::Login),
        Route::Root if signed_in => Navigation::redirect(Route::Dashboard),
        Route::Root => Navigation::redirect(Route::Login),
        route if route.requires_user() && !signed_in => Navigation::redirect(Route::Login),
        route => Navigation::Render(route.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthStatus, Session, User};

    fn signed_out() -> AuthSnapshot {
        AuthSnapshot {
            status: AuthStatus::Unauthenticated,
            session: None,
            notice: None,
        }
    }

    fn signed_in() -> AuthSnapshot {
        AuthSnapshot {
            status: AuthStatus::Authenticated,
            session: Some(Session {
                access_token: "gho_1".into(),
                user: User {
                    id: "1".into(),
                    name: "Mona".into(),
                    email: String::new(),
                    avatar_url: String::new(),
                },
            }),
            notice: None,
        }
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Route::Root);
        assert_eq!(Route::parse(""), Route::Root);
        assert_eq!(Route::parse("/dashboard/"), Route::Dashboard);
        assert_eq!(Route::parse("/auth-success?code=abc"), Route::AuthSuccess);
        assert_eq!(
            Route::parse("/nope"),
            Route::NotFound("/nope".to_string())
        );
    }

    #[test]
    fn test_loading_blocks_everything() {
        let snapshot = AuthSnapshot::default();
        assert_eq!(gate(&Route::Dashboard, &snapshot), Navigation::Loading);
        assert_eq!(gate(&Route::Login, &snapshot), Navigation::Loading);
    }

    #[test]
    fn test_signed_out_routes() {
        let s = signed_out();
        assert_eq!(gate(&Route::Login, &s), Navigation::Render(Route::Login));
        assert_eq!(gate(&Route::Root, &s), Navigation::redirect(Route::Login));
        for route in [Route::Dashboard, Route::Settings, Route::Onboarding] {
            assert_eq!(gate(&route, &s), Navigation::redirect(Route::Login));
        }
        assert_eq!(
            gate(&Route::AuthSuccess, &s),
            Navigation::Render(Route::AuthSuccess)
        );
    }

    #[test]
    fn test_signed_in_routes() {
        let s = signed_in();
        assert_eq!(gate(&Route::Login, &s), Navigation::redirect(Route::Dashboard));
        assert_eq!(gate(&Route::Root, &s), Navigation::redirect(Route::Dashboard));
        for route in [Route::Dashboard, Route::Settings, Route::Onboarding] {
            assert_eq!(gate(&route, &s), Navigation::Render(route.clone()));
        }
    }

    #[test]
    fn test_error_state_with_session_still_gates_as_signed_in() {
        let mut s = signed_in();
        s.status = AuthStatus::Error("boom".into());
        assert_eq!(gate(&Route::Settings, &s), Navigation::Render(Route::Settings));
    }

    #[test]
    fn test_unknown_route_renders_not_found() {
        let route = Route::parse("/missing");
        assert_eq!(gate(&route, &signed_out()), Navigation::Render(route.clone()));
    }
}
