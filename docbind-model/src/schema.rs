//! Entity class declarations.

use crate::error::{ModelError, ModelResult};
use crate::field::{Field, FieldDescriptor};
use docbind_types::{Ref, is_reserved_key};
use std::collections::HashMap;
use std::sync::Arc;

/// Names no field may take: they are the identity reference and the
/// modification timestamp every persisted instance carries.
pub const RESERVED_FIELDS: [&str; 2] = ["ref", "ts"];

/// The declared shape of an entity class: its reference in the store and a
/// closed table of fields.
#[derive(Debug)]
pub struct EntityClass {
    name: String,
    class_ref: Ref,
    fields: Vec<FieldDescriptor>,
    by_name: HashMap<String, usize>,
}

impl EntityClass {
    /// Starts declaring the class stored as `classes/<name>`.
    pub fn builder(name: impl Into<String>) -> EntityClassBuilder {
        EntityClassBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class's own reference, which every instance carries as `class`.
    pub fn class_ref(&self) -> &Ref {
        &self.class_ref
    }

    /// The reference of the instance `id` of this class. Fails on an empty
    /// id or one containing `/`.
    pub fn instance_ref(&self, id: impl Into<String>) -> ModelResult<Ref> {
        self.class_ref
            .instance(id)
            .map_err(|e| ModelError::InvalidValue(e.to_string()))
    }

    /// Looks up a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Whether `name` is a declared field.
    pub fn has_field(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }
}

/// Collects field declarations; validation happens in [`build`](Self::build).
#[derive(Debug)]
pub struct EntityClassBuilder {
    name: String,
    fields: Vec<(String, Field)>,
}

impl EntityClassBuilder {
    /// Declares a field.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    /// Validates the declarations and freezes the class.
    pub fn build(self) -> ModelResult<Arc<EntityClass>> {
        if self.name.is_empty() || self.name.contains('/') {
            return Err(ModelError::InvalidValue(format!(
                "invalid class name {:?}",
                self.name
            )));
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        let mut by_name = HashMap::with_capacity(self.fields.len());
        for (name, field) in self.fields {
            if name.is_empty() {
                return Err(ModelError::InvalidField("field name must not be empty".into()));
            }
            if RESERVED_FIELDS.contains(&name.as_str()) {
                return Err(ModelError::InvalidField(format!(
                    "{name} is reserved for the instance's server-assigned attributes"
                )));
            }
            if by_name.contains_key(&name) {
                return Err(ModelError::InvalidField(format!("{name} is declared twice")));
            }

            let descriptor = field.resolve(&name);
            if is_reserved_key(descriptor.path().root()) {
                return Err(ModelError::InvalidField(format!(
                    "{name} is stored at {}, inside a server-managed attribute",
                    descriptor.path()
                )));
            }

            by_name.insert(name, fields.len());
            fields.push(descriptor);
        }

        let class_ref =
            Ref::class_ref(&self.name).map_err(|e| ModelError::InvalidValue(e.to_string()))?;
        Ok(Arc::new(EntityClass {
            class_ref,
            name: self.name,
            fields,
            by_name,
        }))
    }
}
