//! Error types for the remote crate.

use thiserror::Error;
use wealthplan_core::errors::PersistenceError;

/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Ways a call to the plan service can fail.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a response (connect, timeout, broken body).
    #[error("plan service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("plan service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A response or record did not have the expected entity shape.
    #[error("unreadable plan service payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client settings cannot form a request (base URL, token).
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl RemoteError {
    /// HTTP status associated with the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Rejected { status, .. } => Some(*status),
            Self::Decode(_) | Self::Config(_) => None,
        }
    }

    /// Converts into the transport-agnostic core error for `operation` on `resource`.
    ///
    /// A rejection keeps the service's own message as the detail.
    pub fn into_persistence(
        self,
        resource: impl Into<String>,
        operation: impl Into<String>,
    ) -> PersistenceError {
        let status = self.status();
        let detail = match self {
            Self::Rejected { message, .. } => message,
            other => other.to_string(),
        };
        PersistenceError::new(resource, operation, status, detail)
    }
}
