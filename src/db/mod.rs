//! Local persistence layer.

pub mod token_store;

pub use token_store::TokenStore;

/// Storage keys as constants.
pub mod keys {
    /// Raw GitHub access token of the signed-in user.
    pub const AUTH_TOKEN: &str = "wtftoday_auth_token";
}
