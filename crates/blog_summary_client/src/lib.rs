//! crates/blog_summary_client/src/lib.rs
//!
//! Client-side access to the blog summary system: the auth backend, the external
//! summary service, and a session store that persists between runs.

pub mod auth;
pub mod config;
pub mod error;
pub mod storage;
pub mod summary;

pub use auth::AuthClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use storage::FileSessionStorage;
pub use summary::SummaryClient;
