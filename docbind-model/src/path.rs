//! Nested document paths.
//!
//! A [`FieldPath`] is a non-empty sequence of object keys. [`get`] walks it
//! and reports absence as `None`; [`set`] walks it, creating intermediate
//! objects on the way, and assigns at the last key.

use crate::error::{ModelError, ModelResult};
use docbind_types::{DATA_KEY, Document};
use serde_json::Value;
use std::fmt;

/// The location of a field's value inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Creates a path from its segments. Fails on an empty path or an empty
    /// segment.
    pub fn new<I, S>(segments: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(ModelError::InvalidField("field path must not be empty".into()));
        }
        if segments.iter().any(String::is_empty) {
            return Err(ModelError::InvalidField(format!(
                "field path {segments:?} has an empty segment"
            )));
        }
        Ok(Self(segments))
    }

    /// Parses a dotted path such as `data.address.city`.
    pub fn parse(dotted: &str) -> ModelResult<Self> {
        Self::new(dotted.split('.'))
    }

    /// The default path of a field: `["data", name]`.
    #[must_use]
    pub fn data(name: &str) -> Self {
        Self(vec![DATA_KEY.to_string(), name.to_string()])
    }

    /// The path's segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The top-level key the path starts at.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.0[0]
    }

    /// Number of segments (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, since a path has at least one segment. Exists to pair
    /// with [`len`](Self::len).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Returns the value at `path` in `doc`, or `None` if any segment is missing
/// or an intermediate value is not an object.
#[must_use]
pub fn get<'a>(path: &FieldPath, doc: &'a Document) -> Option<&'a Value> {
    let (first, rest) = path.0.split_first()?;
    let mut node = doc.get(first)?;
    for segment in rest {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}

/// Stores `value` at `path` in `doc`, creating intermediate objects as
/// needed. An intermediate non-object value is replaced by an object.
pub fn set(path: &FieldPath, value: Value, doc: &mut Document) {
    set_in(&path.0, value, doc);
}

fn set_in(segments: &[String], value: Value, node: &mut Document) {
    match segments {
        [] => {}
        [last] => {
            node.insert(last.clone(), value);
        }
        [head, rest @ ..] => {
            let child = node
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Document::new()));
            if !child.is_object() {
                *child = Value::Object(Document::new());
            }
            if let Value::Object(map) = child {
                set_in(rest, value, map);
            }
        }
    }
}
