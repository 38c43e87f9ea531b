//! Client configuration.

use crate::error::{ClientError, ClientResult};
use serde::Deserialize;
use std::fmt;

/// Default store endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8443";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Configuration shared by remote-client implementations.
///
/// Hosts usually load this from the `[client]` table of their own TOML
/// configuration; every field has a default.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the document store.
    pub endpoint: String,
    /// Access key sent with every request.
    pub secret: Option<String>,
    /// Per-request timeout (ms).
    pub timeout_ms: u64,
    /// Artificial latency added to every request (ms). Only honoured by
    /// the in-memory client.
    pub latency_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            secret: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            latency_ms: 0,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("latency_ms", &self.latency_ms)
            .finish()
    }
}

impl ClientConfig {
    /// Parses a configuration from TOML, filling unset fields with defaults.
    pub fn from_toml_str(s: &str) -> ClientResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations no client can honour.
    pub fn validate(&self) -> ClientResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ClientError::Config("endpoint must not be empty".into()));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::Config("timeout_ms must be positive".into()));
        }
        Ok(())
    }

    /// Sets the access key.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the artificial latency.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}
