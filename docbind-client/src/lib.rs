//! Remote-client capability for docbind.
//!
//! The mapper never talks to the network itself. It consumes a
//! [`RemoteClient`] that evaluates query expressions, fetches instances by
//! reference and posts raw documents, and it propagates whatever
//! [`ClientError`] the client reports unchanged.
//!
//! [`mock::MemoryClient`] is an in-memory store implementing the capability,
//! used by tests and by hosts that want to exercise entities without a
//! server.

mod client;
mod config;
mod error;
pub mod mock;

pub use client::RemoteClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_MS};
pub use error::{ClientError, ClientResult};
