//! Identity references.
//!
//! A reference names something in the remote store by the collection it
//! lives in plus an id within that collection. Classes are themselves
//! referenced from the `classes` collection, so the instance `42` of the
//! class `users` is `classes/users/42` and its class is `classes/users`.

use crate::{CLASSES, Error, Result};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Wire key wrapping a reference inside a JSON document.
const WIRE_KEY: &str = "@ref";

/// An identity reference: a class tag and an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ref {
    class: String,
    id: String,
}

impl Ref {
    /// Creates a reference from a class tag and an id without checking them.
    ///
    /// The parts must satisfy the rules [`Ref::try_new`] enforces, or the
    /// reference will not survive its `class/id` string form.
    #[must_use]
    pub fn new(class: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            id: id.into(),
        }
    }

    /// Creates a reference, rejecting an empty class tag, an empty id or an
    /// id containing `/`.
    pub fn try_new(class: impl Into<String>, id: impl Into<String>) -> Result<Self> {
        let r = Self::new(class, id);
        if r.class.is_empty() || r.id.is_empty() || r.id.contains('/') {
            return Err(Error::InvalidRef(format!("{:?}/{:?}", r.class, r.id)));
        }
        Ok(r)
    }

    /// Returns the reference of a user class, e.g. `classes/users`.
    pub fn class_ref(name: impl Into<String>) -> Result<Self> {
        Self::try_new(CLASSES, name)
    }

    /// Returns the reference of the instance `id` living under this reference.
    pub fn instance(&self, id: impl Into<String>) -> Result<Self> {
        Self::try_new(self.to_string(), id)
    }

    /// The class tag (everything before the last `/`).
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The id (everything after the last `/`).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parses a reference from its `class/id` string form.
    pub fn parse(s: &str) -> Result<Self> {
        match s.rsplit_once('/') {
            Some((class, id)) if !class.is_empty() && !id.is_empty() => Ok(Self::new(class, id)),
            _ => Err(Error::InvalidRef(s.to_string())),
        }
    }

    /// Reads a reference out of its wire form `{"@ref": "class/id"}`.
    ///
    /// Returns `None` for any value that is not a well-formed reference.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        if obj.len() != 1 {
            return None;
        }
        obj.get(WIRE_KEY)?.as_str().and_then(|s| Self::parse(s).ok())
    }

    /// Returns the wire form `{"@ref": "class/id"}`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut obj = serde_json::Map::with_capacity(1);
        obj.insert(WIRE_KEY.to_string(), Value::String(self.to_string()));
        Value::Object(obj)
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.class, self.id)
    }
}

impl FromStr for Ref {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Ref> for Value {
    fn from(r: Ref) -> Self {
        r.to_value()
    }
}

impl Serialize for Ref {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(WIRE_KEY, &self.to_string())?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Ref {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Wire {
            #[serde(rename = "@ref")]
            reference: String,
        }

        let wire = Wire::deserialize(deserializer)?;
        Self::parse(&wire.reference).map_err(de::Error::custom)
    }
}
