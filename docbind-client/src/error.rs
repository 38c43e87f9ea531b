//! Remote-client error types.

use thiserror::Error;

/// Result type for remote-client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors a remote client can report.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("type error: {0}")]
    Types(#[from] docbind_types::Error),
}

impl ClientError {
    /// Returns true if the store reported the target as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}
