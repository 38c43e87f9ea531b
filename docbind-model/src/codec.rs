//! Field codecs.
//!
//! A codec maps between the value a caller reads and writes and the value
//! stored in the document.

use crate::entity::Entity;
use crate::error::{ModelError, ModelResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Converts a field's exposed value to and from its stored representation.
///
/// `decode(encode(v))` must equal `v`: the mapper hands out the value a
/// caller set without re-decoding it, so the two directions have to agree.
/// Both directions see the owning instance, for codecs whose stored form
/// depends on other fields.
pub trait Codec: Send + Sync {
    /// Exposed value → stored value.
    fn encode(&self, value: &Value, owner: &Entity) -> ModelResult<Value>;

    /// Stored value → exposed value.
    fn decode(&self, stored: &Value, owner: &Entity) -> ModelResult<Value>;
}

/// A codec built from a pair of closures.
pub struct FnCodec<E, D> {
    encode: E,
    decode: D,
}

impl<E, D> FnCodec<E, D>
where
    E: Fn(&Value, &Entity) -> ModelResult<Value> + Send + Sync,
    D: Fn(&Value, &Entity) -> ModelResult<Value> + Send + Sync,
{
    pub fn new(encode: E, decode: D) -> Self {
        Self { encode, decode }
    }
}

impl<E, D> Codec for FnCodec<E, D>
where
    E: Fn(&Value, &Entity) -> ModelResult<Value> + Send + Sync,
    D: Fn(&Value, &Entity) -> ModelResult<Value> + Send + Sync,
{
    fn encode(&self, value: &Value, owner: &Entity) -> ModelResult<Value> {
        (self.encode)(value, owner)
    }

    fn decode(&self, stored: &Value, owner: &Entity) -> ModelResult<Value> {
        (self.decode)(stored, owner)
    }
}

impl<E, D> fmt::Debug for FnCodec<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnCodec")
    }
}

/// A codec that passes values through `T`'s serde representation in both
/// directions, rejecting values `T` cannot represent.
pub struct SerdeCodec<T>(PhantomData<fn() -> T>);

impl<T> SerdeCodec<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for SerdeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SerdeCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SerdeCodec<{}>", std::any::type_name::<T>())
    }
}

impl<T: Serialize + DeserializeOwned> SerdeCodec<T> {
    fn normalize(value: &Value) -> ModelResult<Value> {
        let typed: T = serde_json::from_value(value.clone()).map_err(|e| {
            ModelError::InvalidValue(format!(
                "{value} is not a valid {}: {e}",
                std::any::type_name::<T>()
            ))
        })?;
        Ok(serde_json::to_value(typed)?)
    }
}

impl<T: Serialize + DeserializeOwned> Codec for SerdeCodec<T> {
    fn encode(&self, value: &Value, _owner: &Entity) -> ModelResult<Value> {
        Self::normalize(value)
    }

    fn decode(&self, stored: &Value, _owner: &Entity) -> ModelResult<Value> {
        Self::normalize(stored)
    }
}
