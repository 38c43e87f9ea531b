//! Per-instance document state: the persisted snapshot, the working copy
//! and the decoded-value cache.

use docbind_types::Document;
use serde_json::Value;
use std::collections::HashMap;

/// Per-instance mutable state.
///
/// `original` is the last document known to match the store (empty until
/// the instance is first persisted or fetched). `current` is the working
/// copy, always an independent deep copy of `original` after a reset.
/// `cache` holds decoded values of codec-bearing fields.
#[derive(Debug, Clone, Default)]
pub struct InstanceState {
    original: Document,
    current: Document,
    cache: HashMap<String, Value>,
}

impl InstanceState {
    /// State of an instance that has never been persisted.
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose original is `original`, with `current` copied from it.
    pub fn from_original(original: Document) -> Self {
        let mut state = Self {
            original,
            current: Document::new(),
            cache: HashMap::new(),
        };
        state.init_state();
        state
    }

    /// Resets `current` to a copy of `original` and clears the cache.
    pub fn init_state(&mut self) {
        self.current = self.original.clone();
        self.cache.clear();
    }

    /// Replaces `original` and resets.
    pub fn reset(&mut self, original: Document) {
        self.original = original;
        self.init_state();
    }

    pub fn original(&self) -> &Document {
        &self.original
    }

    pub fn current(&self) -> &Document {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut Document {
        &mut self.current
    }

    /// The decoded value cached for `field`, if any.
    pub fn cached(&self, field: &str) -> Option<&Value> {
        self.cache.get(field)
    }

    pub fn cache_insert(&mut self, field: impl Into<String>, value: Value) {
        self.cache.insert(field.into(), value);
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
