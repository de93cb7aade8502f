//! services/api/src/auth.rs
//!
//! Registration and login. The HTTP layer only translates requests into calls
//! here and turns the outcome (or `AuthError`) into a response.

use blog_summary_core::domain::{NewUser, User};
use blog_summary_core::ports::UserRepository;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::password::{hash_password, verify_against_dummy, verify_password};
use crate::error::AuthError;
use crate::token::TokenKeys;

/// A freshly issued token and the public fields of the user it belongs to.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenKeys>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenKeys>) -> Self {
        Self { users, tokens }
    }

    pub fn tokens(&self) -> &TokenKeys {
        &self.tokens
    }

    /// Creates an account and signs the new user in.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, AuthError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.trim().is_empty() {
            return Err(AuthError::Validation(
                "Name, email and password are required".to_string(),
            ));
        }

        if self.users.find_by_email(email).await?.is_some() {
            info!("Registration refused: email already registered");
            return Err(AuthError::DuplicateUser);
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| AuthError::Internal(format!("failed to hash password: {}", e)))?;

        // The store enforces uniqueness too, so a concurrent registration still conflicts.
        let user = self
            .users
            .create(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;
        info!(user_id = %user.id, "Registered new user");

        let token = self.issue_token(&user)?;
        Ok(AuthOutcome { token, user })
    }

    /// Signs an existing user in.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let credentials = self.users.find_by_email(email).await?;
        let password = password.to_string();

        let Some(credentials) = credentials else {
            tokio::task::spawn_blocking(move || verify_against_dummy(&password))
                .await
                .map_err(|e| AuthError::Internal(format!("hashing task failed: {}", e)))?;
            warn!("Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        let stored_hash = credentials.password_hash;
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {}", e)))?;
        if !valid {
            warn!("Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let user = credentials.user;
        info!(user_id = %user.id, "User logged in");
        let token = self.issue_token(&user)?;
        Ok(AuthOutcome { token, user })
    }

    fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        self.tokens
            .issue(user.id)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}
