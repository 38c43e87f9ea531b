//! The query-expression type and its constructors.

use docbind_types::{Document, Ref};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Function names an expression may be keyed by, in the order they are
/// checked when classifying an expression.
pub const OPERATIONS: [&str; 11] = [
    "create", "update", "replace", "delete", "get", "paginate", "match", "lambda", "map",
    "select", "var",
];

/// Key quoting a literal object.
const OBJECT: &str = "object";

/// An opaque query expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expr(Value);

impl Expr {
    fn call(name: &str, arg: Value, named: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
        let mut obj = Map::new();
        obj.insert(name.to_string(), arg);
        for (key, value) in named {
            obj.insert(key.to_string(), value);
        }
        Self(Value::Object(obj))
    }

    /// Wraps an arbitrary JSON value as a literal, quoting nested objects.
    #[must_use]
    pub fn value(value: Value) -> Self {
        Self(quote(value))
    }

    /// Wraps a literal object.
    #[must_use]
    pub fn object(doc: Document) -> Self {
        Self(quote(Value::Object(doc)))
    }

    /// Wraps a reference.
    #[must_use]
    pub fn reference(r: &Ref) -> Self {
        Self(r.to_value())
    }

    /// Creates an instance of the class named by `class_ref`.
    #[must_use]
    pub fn create(class_ref: &Ref, params: Expr) -> Self {
        Self::call("create", class_ref.to_value(), [("params", params.0)])
    }

    /// Partially updates the instance at `r`; `params` is deep-merged by the store.
    #[must_use]
    pub fn update(r: &Ref, params: Expr) -> Self {
        Self::call("update", r.to_value(), [("params", params.0)])
    }

    /// Replaces the user attributes of the instance at `r` with `params`.
    #[must_use]
    pub fn replace(r: &Ref, params: Expr) -> Self {
        Self::call("replace", r.to_value(), [("params", params.0)])
    }

    /// Deletes the instance at `r`.
    #[must_use]
    pub fn delete(r: &Ref) -> Self {
        Self::call("delete", r.to_value(), [])
    }

    /// Reads the instance at `r`.
    #[must_use]
    pub fn get(r: &Ref) -> Self {
        Self::call("get", r.to_value(), [])
    }

    /// Reads any expression that evaluates to a reference.
    #[must_use]
    pub fn get_expr(target: Expr) -> Self {
        Self::call("get", target.0, [])
    }

    /// Pages through a set.
    #[must_use]
    pub fn paginate(set: Expr) -> Self {
        Self::call("paginate", set.0, [])
    }

    /// The set of instances an index yields for `terms`.
    #[must_use]
    pub fn match_index(index: &Ref, terms: Expr) -> Self {
        Self::call("match", index.to_value(), [("terms", terms.0)])
    }

    /// A one-parameter function binding `var` in `body`.
    #[must_use]
    pub fn lambda(var: &str, body: Expr) -> Self {
        Self::call("lambda", Value::String(var.to_string()), [("expr", body.0)])
    }

    /// A reference to a variable bound by [`Expr::lambda`].
    #[must_use]
    pub fn var(name: &str) -> Self {
        Self::call("var", Value::String(name.to_string()), [])
    }

    /// Applies `lambda` to every element of `collection`.
    #[must_use]
    pub fn map(collection: Expr, lambda: Expr) -> Self {
        Self::call("map", lambda.0, [("collection", collection.0)])
    }

    /// Extracts the value at `path` from `from`.
    #[must_use]
    pub fn select(path: &[&str], from: Expr) -> Self {
        let path = path.iter().map(|s| Value::String((*s).to_string())).collect();
        Self::call("select", Value::Array(path), [("from", from.0)])
    }

    /// Returns the function name this expression calls, if it is a call.
    #[must_use]
    pub fn operation(&self) -> Option<&'static str> {
        let obj = self.0.as_object()?;
        OPERATIONS.iter().copied().find(|op| obj.contains_key(*op))
    }

    /// Returns a named argument (or the function's primary argument when
    /// `name` is the function name).
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.0.as_object()?.get(name)
    }

    /// Returns the reference the call targets, if its primary argument is one.
    #[must_use]
    pub fn target(&self) -> Option<Ref> {
        let op = self.operation()?;
        self.argument(op).and_then(Ref::from_value)
    }

    /// Returns the call's `params` argument with literal quoting removed.
    #[must_use]
    pub fn params(&self) -> Option<Value> {
        self.argument("params").map(unquote)
    }

    /// Borrows the wire representation.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the expression, returning its wire representation.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        expr.0
    }
}

fn quote(value: Value) -> Value {
    match value {
        Value::Object(obj) if is_ref_literal(&obj) => Value::Object(obj),
        Value::Object(obj) => {
            let quoted = obj.into_iter().map(|(k, v)| (k, quote(v))).collect();
            let mut wrapper = Map::with_capacity(1);
            wrapper.insert(OBJECT.to_string(), Value::Object(quoted));
            Value::Object(wrapper)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(quote).collect()),
        other => other,
    }
}

fn is_ref_literal(obj: &Map<String, Value>) -> bool {
    obj.len() == 1 && obj.get("@ref").is_some_and(Value::is_string)
}

/// Removes `{"object": ...}` quoting from a literal, recursively.
#[must_use]
pub fn unquote(value: &Value) -> Value {
    match value {
        Value::Object(obj) => match obj.get(OBJECT) {
            Some(Value::Object(inner)) if obj.len() == 1 => Value::Object(
                inner
                    .iter()
                    .map(|(k, v)| (k.clone(), unquote(v)))
                    .collect(),
            ),
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(unquote).collect()),
        other => other.clone(),
    }
}
