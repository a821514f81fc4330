//! # Schema Facade
//!
//! [`Schema`] owns the node arena compiled from one schema document, the
//! document itself, and the [`Resolver`] used for `$ref`. It is immutable
//! once built and can validate from many threads at once.
//!
//! ## Construction
//!
//! 1. Unless disabled, a document without `$schema` (or declaring draft-03)
//!    is first checked against the embedded meta-schema. A failure is
//!    reported as [`Error::Document`]: the schema document is itself an
//!    invalid instance.
//! 2. The document is compiled; malformed keywords are reported as
//!    [`Error::Schema`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::compile::Compiler;
use crate::error::{Error, ParseError, SchemaError};
use crate::meta;
use crate::node::{Node, NodeArena, NodeId};
use crate::options::SchemaOptions;
use crate::resolver::{NullResolver, Resolver};
use crate::validate::{self, ValidationOutcome};

static NEXT_UID: AtomicU64 = AtomicU64::new(1);

/// A compiled schema document.
pub struct Schema {
    uid: u64,
    arena: NodeArena,
    root: NodeId,
    resolver: Arc<dyn Resolver>,
    document: Value,
}

impl Schema {
    /// Compile with default options and no external references.
    pub fn compile(document: Value) -> Result<Self, Error> {
        Self::compile_with(document, Arc::new(NullResolver), &SchemaOptions::default())
    }

    /// Parse and compile JSON text with default options.
    pub fn compile_str(text: &str) -> Result<Self, Error> {
        Self::compile_str_with(text, Arc::new(NullResolver), &SchemaOptions::default())
    }

    /// Compile `document`, resolving external `$ref`s through `resolver`.
    pub fn compile_with(
        document: Value,
        resolver: Arc<dyn Resolver>,
        options: &SchemaOptions,
    ) -> Result<Self, Error> {
        if options.check_meta_schema {
            check_against_meta_schema(&document)?;
        }
        Ok(Self::build(document, resolver)?)
    }

    pub fn compile_str_with(
        text: &str,
        resolver: Arc<dyn Resolver>,
        options: &SchemaOptions,
    ) -> Result<Self, Error> {
        let document = parse(text)?;
        Self::compile_with(document, resolver, options)
    }

    /// Compile without the meta-schema check.
    pub(crate) fn build(document: Value, resolver: Arc<dyn Resolver>) -> Result<Self, SchemaError> {
        let mut compiler = Compiler::new();
        let root = compiler.compile(&document, "/")?;
        let schema = Self {
            uid: NEXT_UID.fetch_add(1, Ordering::Relaxed),
            arena: compiler.finish(),
            root,
            resolver,
            document,
        };
        tracing::debug!(
            nodes = schema.node_count(),
            id = ?schema.id(),
            "compiled schema"
        );
        Ok(schema)
    }

    /// Check `instance`, returning the first violation.
    pub fn validate(&self, instance: &Value) -> ValidationOutcome {
        validate::validate(self, instance)
    }

    /// Parse and check JSON text.
    pub fn validate_str(&self, text: &str) -> Result<(), Error> {
        let instance = parse(text)?;
        self.check(&instance)
    }

    /// [`validate`](Self::validate) with the failure lifted into [`Error`].
    pub fn check(&self, instance: &Value) -> Result<(), Error> {
        self.validate(instance).map_err(Error::Document)
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_ok()
    }

    /// The root `id`, if declared.
    pub fn id(&self) -> Option<&str> {
        self.root_node().id()
    }

    /// The schema document this was compiled from.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        self.arena.get(self.root)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub(crate) fn uid(&self) -> u64 {
        self.uid
    }

    pub(crate) fn resolver(&self) -> &dyn Resolver {
        self.resolver.as_ref()
    }

    /// `#` and the root `id` refer to this schema's own root.
    pub(crate) fn is_self_reference(&self, reference: &str) -> bool {
        reference == "#" || self.id() == Some(reference)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("id", &self.id())
            .field("root", &self.root)
            .field("nodes", &self.arena.len())
            .finish_non_exhaustive()
    }
}

fn parse(text: &str) -> Result<Value, ParseError> {
    serde_json::from_str(text).map_err(|e| ParseError::from_json(&e, text))
}

fn check_against_meta_schema(document: &Value) -> Result<(), Error> {
    match document.get("$schema").and_then(Value::as_str) {
        Some(uri) if !meta::is_draft_03(uri) => {
            tracing::debug!(schema = uri, "meta-schema check skipped");
            return Ok(());
        }
        _ => {}
    }
    let meta_schema = meta::meta_schema()?;
    meta_schema.check(document)?;
    tracing::trace!("meta-schema check passed");
    Ok(())
}
