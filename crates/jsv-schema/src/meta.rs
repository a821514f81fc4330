//! # Draft-03 Meta-Schema
//!
//! The core meta-schema is embedded and compiled once per process, on
//! first use. Its `$ref: "#"` members resolve to its own root, so the
//! compiled graph is self-referential; validation through it terminates
//! because every reference descends into a strictly smaller part of the
//! document being checked.

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::error::{SchemaError, SchemaErrorKind};
use crate::resolver::NullResolver;
use crate::schema::Schema;

/// The `$schema` URI of draft-03.
pub const DRAFT_03_URI: &str = "http://json-schema.org/draft-03/schema#";

/// Whether a `$schema` value names draft-03, with or without the empty fragment.
pub fn is_draft_03(uri: &str) -> bool {
    uri.strip_suffix('#').unwrap_or(uri) == DRAFT_03_URI.trim_end_matches('#')
}

const DRAFT_03_META_SCHEMA: &str = r##"{
    "$schema": "http://json-schema.org/draft-03/schema#",
    "id": "http://json-schema.org/draft-03/schema#",
    "type": "object",

    "properties": {
        "type": {
            "type": ["string", "array", {"$ref": "#"}],
            "items": {"type": ["string", {"$ref": "#"}]},
            "uniqueItems": true,
            "default": "any"
        },
        "properties": {
            "type": "object",
            "additionalProperties": {"$ref": "#", "type": "object"},
            "default": {}
        },
        "patternProperties": {
            "type": "object",
            "additionalProperties": {"$ref": "#"},
            "default": {}
        },
        "additionalProperties": {
            "type": [{"$ref": "#"}, "boolean"],
            "default": {}
        },
        "items": {
            "type": [{"$ref": "#"}, "array"],
            "items": {"$ref": "#"},
            "default": {}
        },
        "additionalItems": {
            "type": [{"$ref": "#"}, "boolean"],
            "default": {}
        },
        "required": {"type": "boolean", "default": false},
        "dependencies": {
            "type": "object",
            "additionalProperties": {
                "type": ["string", "array", {"$ref": "#"}],
                "items": {"type": "string"}
            },
            "default": {}
        },
        "minimum": {"type": "number"},
        "maximum": {"type": "number"},
        "exclusiveMinimum": {"type": "boolean", "default": false},
        "exclusiveMaximum": {"type": "boolean", "default": false},
        "minItems": {"type": "integer", "minimum": 0, "default": 0},
        "maxItems": {"type": "integer", "minimum": 0},
        "uniqueItems": {"type": "boolean", "default": false},
        "pattern": {"type": "string", "format": "regex"},
        "minLength": {"type": "integer", "minimum": 0, "default": 0},
        "maxLength": {"type": "integer"},
        "enum": {"type": "array", "minItems": 1, "uniqueItems": true},
        "default": {"type": "any"},
        "title": {"type": "string"},
        "description": {"type": "string"},
        "format": {"type": "string"},
        "divisibleBy": {
            "type": "number",
            "minimum": 0,
            "exclusiveMinimum": true,
            "default": 1
        },
        "disallow": {
            "type": ["string", "array", {"$ref": "#"}],
            "items": {"type": ["string", {"$ref": "#"}]},
            "uniqueItems": true
        },
        "extends": {
            "type": [{"$ref": "#"}, "array"],
            "items": {"$ref": "#"},
            "default": {}
        },
        "id": {"type": "string"},
        "$ref": {"type": "string"},
        "$schema": {"type": "string", "format": "uri"}
    },

    "dependencies": {
        "exclusiveMinimum": "minimum",
        "exclusiveMaximum": "maximum"
    },

    "default": {}
}"##;

static META_SCHEMA: OnceLock<Result<Schema, SchemaError>> = OnceLock::new();

/// The compiled draft-03 meta-schema.
///
/// # Errors
///
/// Returns [`SchemaErrorKind::Unknown`] if the embedded document fails to
/// parse or compile; the failure is cached like a success.
pub fn meta_schema() -> Result<&'static Schema, SchemaError> {
    META_SCHEMA
        .get_or_init(compile_meta_schema)
        .as_ref()
        .map_err(Clone::clone)
}

/// The embedded meta-schema document.
pub fn meta_schema_document() -> Result<Value, SchemaError> {
    serde_json::from_str(DRAFT_03_META_SCHEMA).map_err(|e| {
        SchemaError::new(SchemaErrorKind::Unknown, "/")
            .with_detail(format!("embedded meta-schema is not valid json: {e}"))
    })
}

fn compile_meta_schema() -> Result<Schema, SchemaError> {
    let document = meta_schema_document()?;
    let schema = Schema::build(document, Arc::new(NullResolver)).map_err(|e| {
        SchemaError::new(SchemaErrorKind::Unknown, e.location.clone())
            .with_detail(format!("embedded meta-schema does not compile: {e}"))
    })?;
    tracing::debug!(nodes = schema.node_count(), "compiled draft-03 meta-schema");
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_03_uri_forms() {
        assert!(is_draft_03("http://json-schema.org/draft-03/schema#"));
        assert!(is_draft_03("http://json-schema.org/draft-03/schema"));
        assert!(!is_draft_03("http://json-schema.org/draft-04/schema#"));
    }

    #[test]
    fn meta_schema_compiles_once() {
        let first = meta_schema().unwrap();
        let second = meta_schema().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.id(), Some(DRAFT_03_URI));
    }

    #[test]
    fn meta_schema_validates_itself() {
        let meta = meta_schema().unwrap();
        assert!(meta.validate(&meta_schema_document().unwrap()).is_ok());
    }
}
