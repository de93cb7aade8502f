//! crates/blog_summary_client/src/error.rs

use blog_summary_core::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout, bad body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a failure status. `message` is what to show the user.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<ClientError> for PortError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Port(inner) => inner,
            ClientError::Api { status: 401, .. } => PortError::Unauthorized,
            other => PortError::Unexpected(other.to_string()),
        }
    }
}
