//! # jsv-schema — Draft-03 JSON Schema Compiler & Validator
//!
//! Compiles a JSON Schema (draft-03) document into an arena of typed
//! nodes and checks JSON instances against it, reporting the first
//! violated constraint with the JSON Pointer of the offending value.
//!
//! ## Pipeline
//!
//! ```text
//! schema text/value ──► meta-schema check ──► Compiler ──► NodeArena (owned by Schema)
//!                                                              │
//!                       instance ──► Schema::validate ─────────┴──► Ok | DocumentError
//! ```
//!
//! ```
//! use jsv_schema::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::compile(json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string", "minLength": 3, "required": true}}
//! }))
//! .unwrap();
//!
//! assert!(schema.is_valid(&json!({"name": "Ada"})));
//! let err = schema.validate(&json!({"name": "Al"})).unwrap_err();
//! assert_eq!(err.to_string(), "value length of /name must be >= 3");
//! ```
//!
//! ## Modules
//!
//! - [`value`] — JSON kind classification, numeric domains, structural equality.
//! - [`pattern`] — compiled `pattern` / `patternProperties` expressions.
//! - [`path`] — instance pointers and schema locations.
//! - [`error`] — schema, document and parse failures.
//! - [`node`] — the node arena and the ten node kinds.
//! - [`compile`] — schema document → node arena.
//! - [`validate`] — the validation walk.
//! - [`resolver`] — `$ref` lookup and the name-keyed registry.
//! - [`meta`] — the embedded draft-03 meta-schema.
//! - [`schema`] — the [`Schema`] facade.
//!
//! ## Crate Policy
//!
//! - Schema errors and document errors are separate types and never mixed.
//! - A compiled [`Schema`] is immutable; validation takes `&self`.
//! - `$ref` is resolved lazily, so self-referential and mutually
//!   referential schemas need no special construction order.

pub mod compile;
pub mod error;
pub mod meta;
pub mod node;
pub mod options;
pub mod path;
pub mod pattern;
pub mod resolver;
pub mod schema;
pub mod validate;
pub mod value;

pub use compile::TypeName;
pub use error::{DocumentError, DocumentErrorKind, Error, ParseError, SchemaError, SchemaErrorKind};
pub use meta::{meta_schema, DRAFT_03_URI};
pub use node::{Node, NodeId, NodeKind};
pub use options::SchemaOptions;
pub use path::{InstancePath, PathSegment};
pub use resolver::{NullResolver, Resolver, SchemaRegistry};
pub use schema::Schema;
pub use validate::ValidationOutcome;
pub use value::JsonKind;
