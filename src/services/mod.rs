// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - authentication logic.

pub mod callback;
pub mod github;
pub mod session;

pub use callback::{CallbackOutcome, CallbackReceiver, HeadlessWindow, HostWindow};
pub use github::{AuthProvider, GithubClient};
pub use session::SessionStore;
