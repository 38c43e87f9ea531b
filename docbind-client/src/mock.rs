//! An in-memory document store for testing.
//!
//! [`MemoryClient`] evaluates the write and read calls the mapper issues
//! (`create`, `update`, `replace`, `delete`, `get`) against a map of
//! resources held in memory. Ids are UUID v7 strings and timestamps are
//! strictly increasing per client.

use crate::client::RemoteClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use docbind_query::Expr;
use docbind_types::{CLASS_KEY, Document, REF_KEY, Ref, TS_KEY, Timestamp, is_reserved_key};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct Store {
    resources: BTreeMap<Ref, Document>,
    last_ts: Option<Timestamp>,
    issued: Vec<Expr>,
    fail_next: Option<ClientError>,
}

impl Store {
    fn next_ts(&mut self) -> Timestamp {
        let ts = match self.last_ts {
            Some(last) => last.next(),
            None => Timestamp::now(),
        };
        self.last_ts = Some(ts);
        ts
    }
}

/// An in-memory [`RemoteClient`].
pub struct MemoryClient {
    config: ClientConfig,
    store: Mutex<Store>,
}

impl MemoryClient {
    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Creates an empty store with an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            store: Mutex::new(Store::default()),
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Every expression evaluated so far, oldest first.
    pub fn issued(&self) -> Vec<Expr> {
        self.lock().issued.clone()
    }

    /// Number of resources currently stored.
    pub fn len(&self) -> usize {
        self.lock().resources.len()
    }

    /// Whether the store holds no resources.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the stored resource at `r` without recording a call.
    pub fn peek(&self, r: &Ref) -> Option<Value> {
        self.lock().resources.get(r).cloned().map(Value::Object)
    }

    /// Makes the next call fail with `error` instead of being evaluated.
    pub fn fail_next(&self, error: ClientError) {
        self.lock().fail_next = Some(error);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn evaluate(&self, expr: &Expr) -> ClientResult<Value> {
        let mut store = self.lock();
        store.issued.push(expr.clone());
        if let Some(error) = store.fail_next.take() {
            debug!("memory client failing {} on request", expr);
            return Err(error);
        }

        let op = expr
            .operation()
            .ok_or_else(|| ClientError::BadRequest(format!("not a call: {expr}")))?;
        let target = expr
            .target()
            .ok_or_else(|| ClientError::BadRequest(format!("{op} expects a reference")))?;
        debug!("memory client evaluating {} on {}", op, target);

        match op {
            "create" => {
                let params = user_attributes(expr)?;
                let r = target.instance(Uuid::now_v7().to_string())?;
                let ts = store.next_ts();
                let mut resource = params;
                resource.insert(REF_KEY.to_string(), r.to_value());
                resource.insert(CLASS_KEY.to_string(), target.to_value());
                resource.insert(TS_KEY.to_string(), ts.into());
                store.resources.insert(r, resource.clone());
                Ok(Value::Object(resource))
            }
            "update" => {
                let params = user_attributes(expr)?;
                let ts = store.next_ts();
                let resource = store
                    .resources
                    .get_mut(&target)
                    .ok_or_else(|| ClientError::NotFound(target.to_string()))?;
                merge(resource, params);
                resource.insert(TS_KEY.to_string(), ts.into());
                Ok(Value::Object(resource.clone()))
            }
            "replace" => {
                let params = user_attributes(expr)?;
                let ts = store.next_ts();
                let resource = store
                    .resources
                    .get_mut(&target)
                    .ok_or_else(|| ClientError::NotFound(target.to_string()))?;
                resource.retain(|key, _| is_reserved_key(key));
                resource.extend(params.into_iter().filter(|(_, v)| !v.is_null()));
                resource.insert(TS_KEY.to_string(), ts.into());
                Ok(Value::Object(resource.clone()))
            }
            "delete" => store
                .resources
                .remove(&target)
                .map(Value::Object)
                .ok_or_else(|| ClientError::NotFound(target.to_string())),
            "get" => store
                .resources
                .get(&target)
                .cloned()
                .map(Value::Object)
                .ok_or_else(|| ClientError::NotFound(target.to_string())),
            other => Err(ClientError::BadRequest(format!(
                "memory client does not evaluate {other}"
            ))),
        }
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteClient for MemoryClient {
    async fn query(&self, expr: &Expr) -> ClientResult<Value> {
        let timeout_ms = self.config.timeout_ms;
        let latency = Duration::from_millis(self.config.latency_ms);
        tokio::time::timeout(Duration::from_millis(timeout_ms), async {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            self.evaluate(expr)
        })
        .await
        .map_err(|_| ClientError::Timeout { timeout_ms })?
    }
}

/// The call's params as a document, with server-managed attributes dropped.
fn user_attributes(expr: &Expr) -> ClientResult<Document> {
    match expr.params() {
        Some(Value::Object(mut params)) => {
            params.retain(|key, _| !is_reserved_key(key));
            Ok(params)
        }
        Some(other) => Err(ClientError::BadRequest(format!(
            "params must be an object, got {other}"
        ))),
        None => Ok(Document::new()),
    }
}

/// Deep-merges `patch` into `target`. Objects merge key by key, `null`
/// removes a key, anything else overwrites.
fn merge(target: &mut Document, patch: Document) {
    for (key, value) in patch {
        match value {
            Value::Null => {
                target.remove(&key);
            }
            Value::Object(inner) => match target.get_mut(&key) {
                Some(Value::Object(existing)) => merge(existing, inner),
                _ => {
                    let mut fresh = Document::new();
                    merge(&mut fresh, inner);
                    target.insert(key, Value::Object(fresh));
                }
            },
            other => {
                target.insert(key, other);
            }
        }
    }
}
