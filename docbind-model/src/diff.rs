//! Structural document diff.
//!
//! [`diff`] computes the smallest document that, deep-merged onto
//! `original`, yields every changed leaf of `current` outside the top-level
//! server-managed attributes. Nested objects are
//! compared key by key; any other value (scalars and arrays alike) is
//! compared whole.
//!
//! Keys present in `original` but missing from `current` do not appear in
//! the result. A partial update therefore never removes attributes;
//! removals go through a full replace.

use docbind_types::{Document, is_reserved_key};
use serde_json::Value;

/// Returns the keys of `current` whose values differ from `original`,
/// recursing into objects present on both sides.
///
/// Top-level server-managed attributes (`ref`, `ts`, `class`) never appear
/// in the result. Below the top level those names are ordinary keys.
#[must_use]
pub fn diff(original: &Document, current: &Document) -> Document {
    let mut patch = diff_objects(original, current);
    patch.retain(|key, _| !is_reserved_key(key));
    patch
}

/// The changes a partial update carries; the same as [`diff`].
#[must_use]
pub fn update_diff(original: &Document, current: &Document) -> Document {
    diff(original, current)
}

fn diff_objects(original: &Document, current: &Document) -> Document {
    let mut patch = Document::new();
    for (key, value) in current {
        match (original.get(key), value) {
            (Some(Value::Object(before)), Value::Object(after)) => {
                let nested = diff_objects(before, after);
                if !nested.is_empty() {
                    patch.insert(key.clone(), Value::Object(nested));
                }
            }
            (Some(before), after) if before == after => {}
            _ => {
                patch.insert(key.clone(), value.clone());
            }
        }
    }
    patch
}
