//! Entity instances.
//!
//! An [`Entity`] pairs a declared [`EntityClass`] with its [`InstanceState`].
//! Field access goes through the class's descriptor table; operation
//! builders derive store calls from the state without touching it; the
//! async wrappers execute those calls through a [`RemoteClient`] and
//! reconcile the state from the resource the store returns.

use crate::diff;
use crate::error::{ModelError, ModelResult};
use crate::field::FieldDescriptor;
use crate::path;
use crate::schema::EntityClass;
use crate::state::InstanceState;
use docbind_client::RemoteClient;
use docbind_query::Expr;
use docbind_types::{CLASS_KEY, Document, REF_KEY, Ref, TS_KEY, Timestamp, is_reserved_key};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// One instance of an entity class.
#[derive(Debug, Clone)]
pub struct Entity {
    class: Arc<EntityClass>,
    state: InstanceState,
}

impl Entity {
    /// A new, never persisted instance with no fields set.
    pub fn new(class: Arc<EntityClass>) -> Self {
        Self {
            class,
            state: InstanceState::new(),
        }
    }

    /// A new instance with the given fields set, in order.
    pub fn with_fields<I, K>(class: Arc<EntityClass>, fields: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut entity = Self::new(class);
        for (name, value) in fields {
            entity.set(name.as_ref(), value)?;
        }
        Ok(entity)
    }

    /// Wraps a resource already fetched from the store.
    pub fn from_resource(class: Arc<EntityClass>, resource: Value) -> ModelResult<Self> {
        let mut entity = Self::new(class);
        entity.init_from_resource(resource)?;
        Ok(entity)
    }

    pub fn class(&self) -> &Arc<EntityClass> {
        &self.class
    }

    pub fn state(&self) -> &InstanceState {
        &self.state
    }

    /// The last document known to match the store.
    pub fn original(&self) -> &Document {
        self.state.original()
    }

    /// The working document.
    pub fn current(&self) -> &Document {
        self.state.current()
    }

    fn descriptor<'c>(class: &'c EntityClass, name: &str) -> ModelResult<&'c FieldDescriptor> {
        class.field(name).ok_or_else(|| {
            ModelError::InvalidValue(format!("{} has no field {name}", class.name()))
        })
    }

    // ── Field access ─────────────────────────────────────────────

    /// Reads a field.
    ///
    /// Fields without a codec read straight from the working document.
    /// Codec fields return the cached decoded value, decoding and caching
    /// the stored value on first access. A missing stored value reads as
    /// `None` and is not cached.
    pub fn get(&mut self, name: &str) -> ModelResult<Option<Value>> {
        let class = Arc::clone(&self.class);
        let field = Self::descriptor(&class, name)?;

        let Some(codec) = field.codec() else {
            return Ok(path::get(field.path(), self.state.current()).cloned());
        };
        if let Some(cached) = self.state.cached(name) {
            return Ok(Some(cached.clone()));
        }
        let Some(stored) = path::get(field.path(), self.state.current()) else {
            return Ok(None);
        };

        let decoded = codec.decode(stored, self)?;
        self.state.cache_insert(name, decoded.clone());
        Ok(Some(decoded))
    }

    /// Reads a field and deserializes it into `T`.
    pub fn get_as<T: DeserializeOwned>(&mut self, name: &str) -> ModelResult<Option<T>> {
        Ok(self.get(name)?.map(serde_json::from_value).transpose()?)
    }

    /// Writes a field.
    ///
    /// Codec fields cache `value` as given and store its encoded form.
    pub fn set(&mut self, name: &str, value: Value) -> ModelResult<()> {
        let class = Arc::clone(&self.class);
        let field = Self::descriptor(&class, name)?;

        match field.codec() {
            None => path::set(field.path(), value, self.state.current_mut()),
            Some(codec) => {
                let encoded = codec.encode(&value, self)?;
                self.state.cache_insert(name, value);
                path::set(field.path(), encoded, self.state.current_mut());
            }
        }
        Ok(())
    }

    /// Serializes `value` and writes it to a field.
    pub fn set_as<T: Serialize>(&mut self, name: &str, value: T) -> ModelResult<()> {
        self.set(name, serde_json::to_value(value)?)
    }

    // ── Identity ─────────────────────────────────────────────────

    /// True until the instance has been created in, or fetched from, the store.
    pub fn is_new(&self) -> bool {
        !self.state.current().contains_key(REF_KEY)
    }

    /// The instance's identity reference.
    pub fn reference(&self) -> ModelResult<Ref> {
        let value = self.persisted_attribute(REF_KEY)?;
        Ref::from_value(value)
            .ok_or_else(|| ModelError::InvalidValue(format!("malformed ref {value}")))
    }

    /// The time of the instance's last write.
    pub fn modified_at(&self) -> ModelResult<Timestamp> {
        let value = self.persisted_attribute(TS_KEY)?;
        Timestamp::from_value(value)
            .ok_or_else(|| ModelError::InvalidValue(format!("malformed ts {value}")))
    }

    fn persisted_attribute(&self, key: &str) -> ModelResult<&Value> {
        if self.is_new() {
            return Err(ModelError::InvalidQuery(format!(
                "new {} instance has no {key}",
                self.class.name()
            )));
        }
        self.state
            .current()
            .get(key)
            .ok_or_else(|| ModelError::InvalidValue(format!("resource has no {key}")))
    }

    // ── Operations ───────────────────────────────────────────────

    /// The changes a partial update of this instance would carry.
    pub fn update_diff(&self) -> Document {
        diff::update_diff(self.state.original(), self.state.current())
    }

    fn user_attributes(&self) -> Document {
        self.state
            .current()
            .iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Creates this instance with its whole working document.
    pub fn create_op(&self) -> ModelResult<Expr> {
        if !self.is_new() {
            return Err(ModelError::InvalidQuery(format!(
                "{} instance is already persisted",
                self.class.name()
            )));
        }
        Ok(Expr::create(
            self.class.class_ref(),
            Expr::object(self.user_attributes()),
        ))
    }

    /// Applies the changes since the last reconcile as a partial update.
    pub fn update_op(&self) -> ModelResult<Expr> {
        let r = self.reference()?;
        Ok(Expr::update(&r, Expr::object(self.update_diff())))
    }

    /// Overwrites the stored instance with the whole working document.
    pub fn replace_op(&self) -> ModelResult<Expr> {
        let r = self.reference()?;
        Ok(Expr::replace(&r, Expr::object(self.user_attributes())))
    }

    pub fn delete_op(&self) -> ModelResult<Expr> {
        let r = self.reference()?;
        Ok(Expr::delete(&r))
    }

    /// Create for new instances; replace or update otherwise.
    pub fn save_op(&self, replace: bool) -> ModelResult<Expr> {
        if self.is_new() {
            self.create_op()
        } else if replace {
            self.replace_op()
        } else {
            self.update_op()
        }
    }

    // ── Reconciliation ───────────────────────────────────────────

    /// Adopts `resource` as the instance's persisted state.
    ///
    /// The resource must be an object carrying a well-formed `ref` and a
    /// `class` equal to this instance's class reference.
    pub fn init_from_resource(&mut self, resource: Value) -> ModelResult<()> {
        let doc = match resource {
            Value::Object(doc) => doc,
            other => {
                warn!("Rejecting non-object resource for {}: {}", self.class.name(), other);
                return Err(ModelError::InvalidValue(format!(
                    "expected a resource, got {other}"
                )));
            }
        };

        match doc.get(CLASS_KEY).and_then(Ref::from_value) {
            Some(class) if &class == self.class.class_ref() => {}
            Some(class) => {
                warn!("Rejecting {} resource for {}", class, self.class.class_ref());
                return Err(ModelError::InvalidValue(format!(
                    "resource belongs to {class}, expected {}",
                    self.class.class_ref()
                )));
            }
            None => {
                return Err(ModelError::InvalidValue(
                    "resource has no class reference".into(),
                ));
            }
        }
        let Some(r) = doc.get(REF_KEY).and_then(Ref::from_value) else {
            return Err(ModelError::InvalidValue("resource has no ref".into()));
        };

        debug!("Reconciled {} from store", r);
        self.state.reset(doc);
        Ok(())
    }

    // ── Remote ───────────────────────────────────────────────────

    /// Persists the instance: creates it if new, otherwise updates it (or
    /// replaces it when `replace` is set), then adopts the stored resource.
    ///
    /// On failure the instance state is left exactly as it was.
    pub async fn save<C>(&mut self, client: &C, replace: bool) -> ModelResult<()>
    where
        C: RemoteClient + ?Sized,
    {
        let op = self.save_op(replace)?;
        debug!("Saving {} with {}", self, op.operation().unwrap_or("query"));
        let resource = client.query(&op).await?;
        self.init_from_resource(resource)
    }

    /// Deletes the instance from the store, returning the removed resource.
    /// The in-memory state is not modified.
    pub async fn delete<C>(&self, client: &C) -> ModelResult<Value>
    where
        C: RemoteClient + ?Sized,
    {
        let op = self.delete_op()?;
        debug!("Deleting {}", self);
        Ok(client.query(&op).await?)
    }

    /// Fetches the instance at `r`.
    pub async fn fetch<C>(class: Arc<EntityClass>, client: &C, r: &Ref) -> ModelResult<Self>
    where
        C: RemoteClient + ?Sized,
    {
        debug!("Fetching {}", r);
        let resource = client.get(r).await?;
        Self::from_resource(class, resource)
    }

    /// Fetches the instance of `class` with the given id.
    pub async fn fetch_by_id<C>(
        class: Arc<EntityClass>,
        client: &C,
        id: &str,
    ) -> ModelResult<Self>
    where
        C: RemoteClient + ?Sized,
    {
        let r = class.instance_ref(id)?;
        Self::fetch(class, client, &r).await
    }

    /// Builds an instance from `fields` and creates it in the store.
    pub async fn create<C, I, K>(class: Arc<EntityClass>, client: &C, fields: I) -> ModelResult<Self>
    where
        C: RemoteClient + ?Sized,
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut entity = Self::with_fields(class, fields)?;
        entity.save(client, false).await?;
        Ok(entity)
    }

    /// Creates an instance from a raw document, bypassing field
    /// declarations, and wraps the stored resource.
    pub async fn create_from_raw<C>(
        class: Arc<EntityClass>,
        client: &C,
        raw: Value,
    ) -> ModelResult<Self>
    where
        C: RemoteClient + ?Sized,
    {
        let resource = client.post(class.class_ref(), &raw).await?;
        Self::from_resource(class, resource)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reference() {
            Ok(r) => write!(f, "{}({})", self.class.name(), r),
            Err(_) => write!(f, "{}(<new>)", self.class.name()),
        }
    }
}
