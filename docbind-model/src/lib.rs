//! Object-document mapper for docbind.
//!
//! Binds the fields an entity class declares to paths inside the JSON
//! document the remote store keeps for each instance, and derives the write
//! operations needed to persist an instance:
//! - [`EntityClass`]: a closed table of declared fields for one class
//! - [`Field`]: a field's storage path and optional [`Codec`]
//! - [`Entity`]: one instance, with typed field access, identity, operation
//!   builders and `save`/`delete`/`fetch` over a [`RemoteClient`]
//! - [`diff`]: the structural diff behind partial updates
//! - [`path`]: reads and writes at nested document paths
//!
//! # Example
//!
//! ```
//! use docbind_model::{Entity, EntityClass, Field};
//! use serde_json::json;
//!
//! let users = EntityClass::builder("users")
//!     .field("name", Field::new())
//!     .build()?;
//!
//! let mut user = Entity::with_fields(users, [("name", json!("Ada"))])?;
//! assert!(user.is_new());
//! assert_eq!(user.get("name")?, Some(json!("Ada")));
//! assert_eq!(user.current()["data"], json!({"name": "Ada"}));
//! # Ok::<(), docbind_model::ModelError>(())
//! ```
//!
//! [`RemoteClient`]: docbind_client::RemoteClient

mod codec;
pub mod diff;
mod entity;
mod error;
mod field;
pub mod path;
mod schema;
mod state;

pub use codec::{Codec, FnCodec, SerdeCodec};
pub use entity::Entity;
pub use error::{ModelError, ModelResult};
pub use field::{Field, FieldDescriptor};
pub use path::FieldPath;
pub use schema::{EntityClass, EntityClassBuilder, RESERVED_FIELDS};
pub use state::InstanceState;
