use docbind_types::Ref;
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;
use std::str::FromStr;

// ── Construction ─────────────────────────────────────────────────

#[test]
fn new_keeps_class_and_id() {
    let r = Ref::new("classes/users", "42");
    assert_eq!(r.class(), "classes/users");
    assert_eq!(r.id(), "42");
}

#[test]
fn class_ref_lives_in_classes() {
    let r = Ref::class_ref("users").unwrap();
    assert_eq!(r.class(), "classes");
    assert_eq!(r.id(), "users");
    assert_eq!(r.to_string(), "classes/users");
}

#[test]
fn instance_nests_under_class_ref() {
    let class = Ref::class_ref("users").unwrap();
    let r = class.instance("42").unwrap();
    assert_eq!(r.class(), "classes/users");
    assert_eq!(r.id(), "42");
    assert_eq!(r.to_string(), "classes/users/42");
}

#[test]
fn try_new_rejects_parts_that_do_not_round_trip() {
    assert!(Ref::try_new("", "42").is_err());
    assert!(Ref::try_new("classes/users", "").is_err());
    assert!(Ref::try_new("classes/users", "a/b").is_err());
    assert!(Ref::class_ref("a/b").is_err());
    assert!(Ref::class_ref("").is_err());
}

#[test]
fn instance_rejects_nested_id() {
    let class = Ref::class_ref("users").unwrap();
    assert!(class.instance("a/b").is_err());
    assert!(class.instance("").is_err());
}

// ── Parsing ──────────────────────────────────────────────────────

#[test]
fn parse_splits_at_last_separator() {
    let r = Ref::parse("classes/users/42").unwrap();
    assert_eq!(r, Ref::new("classes/users", "42"));
}

#[test]
fn from_str_matches_parse() {
    let r = Ref::from_str("classes/users").unwrap();
    assert_eq!(r, Ref::class_ref("users").unwrap());
}

#[test]
fn parse_rejects_missing_separator() {
    assert!(Ref::parse("users").is_err());
}

#[test]
fn parse_rejects_empty_parts() {
    assert!(Ref::parse("/42").is_err());
    assert!(Ref::parse("classes/").is_err());
    assert!(Ref::parse("").is_err());
}

// ── Equality ─────────────────────────────────────────────────────

#[test]
fn equality_is_structural() {
    assert_eq!(Ref::class_ref("users").unwrap(), Ref::new("classes", "users"));
    assert_ne!(Ref::class_ref("users").unwrap(), Ref::class_ref("posts").unwrap());
    assert_ne!(Ref::new("classes/users", "1"), Ref::new("classes/posts", "1"));
}

#[test]
fn hash_dedups_equal_refs() {
    let mut set = HashSet::new();
    set.insert(Ref::class_ref("users").unwrap());
    set.insert(Ref::parse("classes/users").unwrap());
    assert_eq!(set.len(), 1);
}

// ── Wire form ────────────────────────────────────────────────────

#[test]
fn to_value_wraps_string_form() {
    let r = Ref::new("classes/users", "42");
    assert_eq!(r.to_value(), json!({"@ref": "classes/users/42"}));
}

#[test]
fn from_value_reads_wire_form() {
    let v = json!({"@ref": "classes/users/42"});
    assert_eq!(Ref::from_value(&v), Some(Ref::new("classes/users", "42")));
}

#[test]
fn from_value_rejects_other_shapes() {
    assert_eq!(Ref::from_value(&json!("classes/users/42")), None);
    assert_eq!(Ref::from_value(&json!({"ref": "classes/users/42"})), None);
    assert_eq!(Ref::from_value(&json!({"@ref": 42})), None);
    assert_eq!(Ref::from_value(&json!({"@ref": "users"})), None);
    assert_eq!(
        Ref::from_value(&json!({"@ref": "classes/users", "extra": true})),
        None
    );
}

#[test]
fn serde_uses_wire_form() {
    let r = Ref::new("classes/users", "42");
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json, json!({"@ref": "classes/users/42"}));
    let back: Ref = serde_json::from_value(json).unwrap();
    assert_eq!(back, r);
}

#[test]
fn deserialize_rejects_malformed_ref() {
    let result: Result<Ref, _> = serde_json::from_value(json!({"@ref": "nope"}));
    assert!(result.is_err());
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn display_then_parse_is_identity(
        class in "[a-z]{1,8}(/[a-z]{1,8}){0,2}",
        id in "[a-z0-9]{1,12}",
    ) {
        let r = Ref::new(class, id);
        prop_assert_eq!(Ref::parse(&r.to_string()).unwrap(), r);
    }

    #[test]
    fn instance_survives_string_form(
        class in "[a-z]{1,8}",
        id in "[^/]{1,16}",
    ) {
        let r = Ref::class_ref(class).unwrap().instance(id).unwrap();
        prop_assert_eq!(Ref::parse(&r.to_string()).unwrap(), r.clone());
        prop_assert_eq!(Ref::from_value(&r.to_value()), Some(r));
    }

    #[test]
    fn try_new_accepts_exactly_round_trippable_ids(
        id in "[a-z/]{0,6}",
    ) {
        let built = Ref::try_new("classes/users", id.clone());
        let round_trips = Ref::parse(&format!("classes/users/{id}"))
            .is_ok_and(|r| r.id() == id);
        prop_assert_eq!(built.is_ok(), round_trips);
    }
}
