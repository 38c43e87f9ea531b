//! Diff engine tests.
//!
//! Besides concrete cases, the property tests check the two guarantees a
//! partial update relies on:
//! - a document diffed against itself yields nothing
//! - deep-merging the diff onto the original reproduces every leaf of the
//!   current document

use docbind_model::diff::{diff, update_diff};
use docbind_types::Document;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};

fn doc(value: Value) -> Document {
    match value {
        Value::Object(obj) => obj,
        other => panic!("expected object, got {other}"),
    }
}

/// Partial-update semantics: objects merge key by key, anything else
/// overwrites.
fn merge(target: &mut Document, patch: &Document) {
    for (key, value) in patch {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(inner)) => merge(existing, inner),
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Every leaf of `expected` appears with the same value in `actual`.
fn covers(actual: &Document, expected: &Document) -> bool {
    expected.iter().all(|(key, value)| match (actual.get(key), value) {
        (Some(Value::Object(a)), Value::Object(e)) => covers(a, e),
        (Some(a), e) => a == e,
        (None, _) => false,
    })
}

// ── Concrete cases ───────────────────────────────────────────────

#[test]
fn identical_documents_have_empty_diff() {
    let d = doc(json!({"data": {"x": 1, "tags": ["a"]}, "ts": 5}));
    assert!(diff(&d, &d).is_empty());
}

#[test]
fn changed_scalar_is_reported() {
    let original = doc(json!({"data": {"x": 5, "y": 1}}));
    let current = doc(json!({"data": {"x": 7, "y": 1}}));
    assert_eq!(diff(&original, &current), doc(json!({"data": {"x": 7}})));
}

#[test]
fn added_key_is_reported_whole() {
    let original = doc(json!({"data": {}}));
    let current = doc(json!({"data": {"addr": {"city": "Oslo", "zip": "0150"}}}));
    assert_eq!(
        diff(&original, &current),
        doc(json!({"data": {"addr": {"city": "Oslo", "zip": "0150"}}}))
    );
}

#[test]
fn added_top_level_object_is_reported_whole() {
    let current = doc(json!({"data": {"x": 5}}));
    assert_eq!(diff(&Document::new(), &current), current);
}

#[test]
fn removed_key_is_not_represented() {
    let original = doc(json!({"data": {"x": 1, "y": 2}}));
    let current = doc(json!({"data": {"x": 1}}));
    assert!(diff(&original, &current).is_empty());
}

#[test]
fn nested_changes_keep_only_changed_leaves() {
    let original = doc(json!({"data": {"a": {"b": 1, "c": 2}, "d": 3}}));
    let current = doc(json!({"data": {"a": {"b": 1, "c": 9}, "d": 3}}));
    assert_eq!(
        diff(&original, &current),
        doc(json!({"data": {"a": {"c": 9}}}))
    );
}

#[test]
fn arrays_compare_whole() {
    let original = doc(json!({"data": {"tags": ["a", "b"]}}));
    let current = doc(json!({"data": {"tags": ["a", "c"]}}));
    assert_eq!(
        diff(&original, &current),
        doc(json!({"data": {"tags": ["a", "c"]}}))
    );

    let same = doc(json!({"data": {"tags": ["a", "b"]}}));
    assert!(diff(&original, &same).is_empty());
}

#[test]
fn type_change_reports_current_value() {
    let original = doc(json!({"data": {"x": {"nested": 1}}}));
    let current = doc(json!({"data": {"x": 1}}));
    assert_eq!(diff(&original, &current), doc(json!({"data": {"x": 1}})));

    let back = diff(&current, &original);
    assert_eq!(back, doc(json!({"data": {"x": {"nested": 1}}})));
}

#[test]
fn null_is_a_value() {
    let original = doc(json!({"data": {"x": 1}}));
    let current = doc(json!({"data": {"x": null}}));
    assert_eq!(diff(&original, &current), doc(json!({"data": {"x": null}})));
}

#[test]
fn integer_and_float_are_distinct() {
    let original = doc(json!({"n": 1}));
    let current = doc(json!({"n": 1.0}));
    assert_eq!(diff(&original, &current), doc(json!({"n": 1.0})));
}

#[test]
fn server_attributes_are_never_diffed() {
    let original = doc(json!({
        "ref": {"@ref": "classes/users/1"},
        "ts": 1,
        "class": {"@ref": "classes/users"},
        "data": {"x": 1}
    }));
    let current = doc(json!({
        "ref": {"@ref": "classes/users/2"},
        "ts": 2,
        "class": {"@ref": "classes/users"},
        "data": {"x": 1}
    }));
    assert!(diff(&original, &current).is_empty());
    assert!(diff(&Document::new(), &current).get("ts").is_none());
}

#[test]
fn reserved_names_below_top_level_are_user_keys() {
    let original = doc(json!({"data": {"ts": 1, "ref": "a"}}));
    let current = doc(json!({"data": {"ts": 2, "ref": "a"}}));
    assert_eq!(diff(&original, &current), doc(json!({"data": {"ts": 2}})));
}

// ── update_diff ──────────────────────────────────────────────────

#[test]
fn update_diff_drops_reserved_attributes() {
    let original = doc(json!({"data": {"x": 1}}));
    let current = doc(json!({
        "ref": {"@ref": "classes/users/1"},
        "ts": 10,
        "class": {"@ref": "classes/users"},
        "data": {"x": 2}
    }));
    assert_eq!(update_diff(&original, &current), doc(json!({"data": {"x": 2}})));
}

#[test]
fn update_diff_keeps_non_data_attributes() {
    let original = doc(json!({"data": {}, "meta": {"v": 1}}));
    let current = doc(json!({"data": {}, "meta": {"v": 2}}));
    assert_eq!(update_diff(&original, &current), doc(json!({"meta": {"v": 2}})));
}

// ── Properties ───────────────────────────────────────────────────

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-5i64..5).prop_map(Value::from),
        "[ab]{0,2}".prop_map(Value::from),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
            prop::collection::btree_map("[a-c]", inner, 0..3)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::btree_map("[a-c]", value_strategy(), 0..4)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn self_diff_is_empty(d in document_strategy()) {
        prop_assert!(diff(&d, &d).is_empty());
    }

    #[test]
    fn merged_diff_covers_current(
        original in document_strategy(),
        current in document_strategy(),
    ) {
        let patch = diff(&original, &current);
        let mut merged = original.clone();
        merge(&mut merged, &patch);
        prop_assert!(covers(&merged, &current));
    }

    #[test]
    fn diff_only_names_changed_keys(
        original in document_strategy(),
        current in document_strategy(),
    ) {
        let patch = diff(&original, &current);
        for key in patch.keys() {
            prop_assert!(current.contains_key(key));
            prop_assert_ne!(original.get(key), current.get(key));
        }
    }

    #[test]
    fn diff_skips_top_level_server_attributes(
        original in document_strategy(),
        mut current in document_strategy(),
        ts in any::<i64>(),
    ) {
        current.insert("ts".to_string(), Value::from(ts));
        current.insert("ref".to_string(), json!({"@ref": "classes/users/1"}));
        let patch = diff(&original, &current);
        prop_assert!(!patch.contains_key("ts"));
        prop_assert!(!patch.contains_key("ref"));
    }

    #[test]
    fn diff_is_deterministic(
        original in document_strategy(),
        current in document_strategy(),
    ) {
        prop_assert_eq!(diff(&original, &current), diff(&original, &current));
    }
}
