//! crates/blog_summary_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, so the core
//! stays independent of the concrete database, HTTP client or client storage.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::{NewUser, SiteOutcome, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Invalid(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks up a user and their password hash by email.
    async fn find_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>>;

    /// Persists a new user. Fails with `PortError::Conflict` when the email is taken.
    async fn create(&self, new_user: NewUser) -> PortResult<User>;
}

#[async_trait]
pub trait SummaryService: Send + Sync {
    /// Asks the summary service for a per-site summary of `topic`.
    async fn scrape_and_summarize(
        &self,
        topic: &str,
        sites: &[String],
    ) -> PortResult<BTreeMap<String, SiteOutcome>>;
}

/// Key/value storage that outlives the process, holding the client session.
pub trait SessionStorage: Send + Sync {
    fn load(&self, key: &str) -> PortResult<Option<String>>;
    fn save(&self, key: &str, value: &str) -> PortResult<()>;
    fn remove(&self, key: &str) -> PortResult<()>;
}
