//! Core type definitions for docbind.
//!
//! This crate defines the small set of types every other docbind crate
//! speaks in:
//! - [`Ref`]: the identity reference naming a class or a persisted instance
//! - [`Timestamp`]: the server-assigned modification time of an instance
//! - [`Document`]: the JSON object shape stored remotely
//!
//! The reserved top-level attribute names of a persisted resource are
//! exported as constants so the mapper, the query builder and clients agree
//! on them.

mod reference;
mod timestamp;

pub use reference::Ref;
pub use timestamp::Timestamp;

/// A JSON object as stored by the remote document store.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Top-level attribute holding an instance's identity reference.
pub const REF_KEY: &str = "ref";

/// Top-level attribute holding an instance's modification timestamp.
pub const TS_KEY: &str = "ts";

/// Top-level attribute holding the reference of the class an instance belongs to.
pub const CLASS_KEY: &str = "class";

/// Top-level attribute under which user data lives by default.
pub const DATA_KEY: &str = "data";

/// Name of the collection that class references live in.
pub const CLASSES: &str = "classes";

/// Server-managed top-level attributes. Never user data, never diffed.
pub const RESERVED_KEYS: [&str; 3] = [REF_KEY, TS_KEY, CLASS_KEY];

/// Returns true if `key` is a server-managed top-level attribute.
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid reference: {0}")]
    InvalidRef(String),
}
