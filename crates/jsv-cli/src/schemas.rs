//! # Schema Set
//!
//! Schemas loaded by one CLI invocation. Every schema is compiled against
//! a shared [`SchemaRegistry`] and registered under the path it was given
//! with, its file name, and its root `id`, so `$ref: "address.json"` finds
//! a schema loaded from `common/address.json`.
//!
//! The registry holds weak handles; the set owns the schemas.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use jsv_schema::{Schema, SchemaOptions, SchemaRegistry};

use crate::document::load_document;

#[derive(Debug, Default)]
pub struct SchemaSet {
    registry: Arc<SchemaRegistry>,
    loaded: Vec<Arc<Schema>>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load, compile and register one schema file.
    pub fn load(&mut self, path: &Path, options: &SchemaOptions) -> Result<Arc<Schema>> {
        let document = load_document(path)?;
        let schema = Schema::compile_with(document, self.registry.clone(), options)
            .with_context(|| format!("schema {} rejected", path.display()))?;
        let schema = Arc::new(schema);

        let given = path.display().to_string();
        self.registry.register(given.as_str(), &schema);
        if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
            if file_name != given {
                self.registry.insert(file_name, &schema);
            }
        }

        tracing::info!(
            schema = %path.display(),
            nodes = schema.node_count(),
            "loaded schema"
        );
        self.loaded.push(Arc::clone(&schema));
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }
}
