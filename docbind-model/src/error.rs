//! Error types for the mapper.

use docbind_client::ClientError;
use thiserror::Error;

/// Result type for mapper operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by the mapper.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A field declaration is invalid: reserved, duplicate or empty name,
    /// or a malformed path.
    #[error("invalid field: {0}")]
    InvalidField(String),

    /// The operation is not allowed in the instance's current state.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A value, field name or resource does not have the expected shape.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The remote client failed; the error is passed through untouched.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A typed accessor could not convert a value.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
