//! # Reference Resolution
//!
//! `$ref` targets other than the schema itself are looked up through a
//! [`Resolver`] injected at compile time. Lookups happen lazily, on every
//! validation that reaches the reference, so a resolver may learn about a
//! schema after the schemas that refer to it were compiled.
//!
//! [`SchemaRegistry`] is the name-keyed implementation used by the CLI.
//! It holds weak handles: a schema compiled against a registry keeps the
//! registry alive, and the registry must not keep the schema alive in turn.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::schema::Schema;

/// Maps a `$ref` string to a compiled schema.
///
/// Shared by every schema compiled against it and called concurrently
/// when those schemas validate from several threads.
pub trait Resolver: Send + Sync {
    /// Look up `reference`; `None` leaves the reference unchecked.
    fn resolve(&self, reference: &str) -> Option<Arc<Schema>>;
}

impl<F> Resolver for F
where
    F: Fn(&str) -> Option<Arc<Schema>> + Send + Sync,
{
    fn resolve(&self, reference: &str) -> Option<Arc<Schema>> {
        self(reference)
    }
}

/// Resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl Resolver for NullResolver {
    fn resolve(&self, _reference: &str) -> Option<Arc<Schema>> {
        None
    }
}

/// Thread-safe name → schema table.
///
/// Entries hold weak handles. Names whose schema has been dropped are
/// pruned on the next write and never counted.
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Weak<Schema>>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `schema` resolvable as `name`, replacing any previous entry.
    pub fn insert(&self, name: impl Into<String>, schema: &Arc<Schema>) {
        let mut schemas = self.schemas.write();
        prune(&mut schemas);
        schemas.insert(name.into(), Arc::downgrade(schema));
    }

    /// Register `schema` under `name` and, when it declares one, its root `id`.
    pub fn register(&self, name: impl Into<String>, schema: &Arc<Schema>) {
        let name = name.into();
        let mut schemas = self.schemas.write();
        prune(&mut schemas);
        if let Some(id) = schema.id() {
            if id != name {
                schemas.insert(id.to_string(), Arc::downgrade(schema));
            }
        }
        tracing::debug!(name = %name, id = ?schema.id(), "registered schema");
        schemas.insert(name, Arc::downgrade(schema));
    }

    /// The live schema registered as `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.read().get(name).and_then(Weak::upgrade)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Forget `name`; `true` when it named a live schema.
    pub fn remove(&self, name: &str) -> bool {
        let mut schemas = self.schemas.write();
        let removed = schemas.remove(name).is_some_and(|schema| schema.strong_count() > 0);
        prune(&mut schemas);
        removed
    }

    /// Number of names that still resolve.
    pub fn len(&self) -> usize {
        self.schemas
            .read()
            .values()
            .filter(|schema| schema.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names that still resolve, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .schemas
            .read()
            .iter()
            .filter(|(_, schema)| schema.strong_count() > 0)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

fn prune(schemas: &mut HashMap<String, Weak<Schema>>) {
    schemas.retain(|_, schema| schema.strong_count() > 0);
}

impl Resolver for SchemaRegistry {
    fn resolve(&self, reference: &str) -> Option<Arc<Schema>> {
        self.get(reference)
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("names", &self.names())
            .finish()
    }
}
