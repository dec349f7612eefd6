// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod session;
pub mod user;

pub use session::{AuthSnapshot, AuthStatus, AuthView, Session};
pub use user::{GithubProfile, User};
