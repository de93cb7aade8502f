//! services/api/src/web/middleware.rs
//!
//! Bearer-token guard for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;
use crate::web::state::AppState;

/// The identity of the caller, inserted into request extensions by `require_auth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
fn bearer_token(value: &str) -> Result<&str, AuthError> {
    if value.trim() == "Bearer" {
        return Err(AuthError::MissingToken);
    }
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Middleware that validates the bearer token and extracts the user id.
///
/// If valid, inserts an `AuthUser` into request extensions for handlers to use.
/// If invalid or missing, the request ends here with 401 Unauthorized.
/// Only the token's signature and expiry are consulted; the user store is not.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // 1. Extract the authorization header
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    // 2. Parse the bearer token
    let token = bearer_token(header_value)?;

    // 3. Verify signature and expiry
    let claims = state.tokens().verify(token).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        AuthError::InvalidToken
    })?;

    // 4. Insert the caller into request extensions
    req.extensions_mut().insert(AuthUser {
        user_id: claims.user_id,
    });

    // 5. Continue to the handler
    Ok(next.run(req).await)
}
