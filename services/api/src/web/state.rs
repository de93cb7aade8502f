//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::auth::AuthService;
use crate::config::{Config, MAX_TOKEN_TTL_SECS};
use crate::token::TokenKeys;
use blog_summary_core::ports::UserRepository;
use chrono::Duration;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the auth service to `users`, deriving token keys from the configured secret.
    pub fn new(users: Arc<dyn UserRepository>, config: Arc<Config>) -> Self {
        let tokens = Arc::new(TokenKeys::new(
            config.jwt_secret.as_bytes(),
            Duration::seconds(config.token_ttl_secs.clamp(1, MAX_TOKEN_TTL_SECS)),
        ));
        Self {
            auth: AuthService::new(users, tokens),
            config,
        }
    }

    pub fn tokens(&self) -> &TokenKeys {
        self.auth.tokens()
    }
}
