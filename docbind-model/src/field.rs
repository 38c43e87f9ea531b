//! Field declarations and their resolved descriptors.

use crate::codec::Codec;
use crate::path::FieldPath;
use std::fmt;
use std::sync::Arc;

/// A field declaration as written by the class author.
///
/// Both parts are optional: without a path the class places the field at
/// `data.<name>`, without a codec stored and exposed values are identical.
#[derive(Clone, Default)]
pub struct Field {
    path: Option<FieldPath>,
    codec: Option<Arc<dyn Codec>>,
}

impl Field {
    /// A field at the default path with no codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// A field stored at an explicit path.
    pub fn at(path: FieldPath) -> Self {
        Self {
            path: Some(path),
            codec: None,
        }
    }

    /// Attaches a codec.
    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    /// Attaches a codec shared with other fields.
    pub fn with_shared_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    pub(crate) fn resolve(self, name: &str) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            path: self.path.unwrap_or_else(|| FieldPath::data(name)),
            codec: self.codec,
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.path)
            .field("codec", &self.codec.is_some())
            .finish()
    }
}

/// A resolved field: its name, fixed storage path and optional codec.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    path: FieldPath,
    codec: Option<Arc<dyn Codec>>,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn codec(&self) -> Option<&dyn Codec> {
        self.codec.as_deref()
    }

    pub fn has_codec(&self) -> bool {
        self.codec.is_some()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("codec", &self.codec.is_some())
            .finish()
    }
}
