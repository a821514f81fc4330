//! # Error Types — Schema, Document, and Parse Failures
//!
//! Two disjoint families, never conflated:
//!
//! - [`SchemaError`] — the schema document itself is malformed. Always
//!   fatal: compilation stops at the first one and no partial schema is
//!   returned. Names the violated authoring rule and the schema location,
//!   never an instance path.
//! - [`DocumentError`] — an instance violates a well-formed constraint.
//!   Expected and recoverable; returned as data from `Schema::validate`.
//!   Carries the instance path, the schema location of the failing node,
//!   and a kind from which the human-readable detail is rendered.
//!
//! [`ParseError`] covers malformed JSON text handed to the string entry
//! points. [`Error`] wraps all three for callers that want a single type.

use std::fmt;

use thiserror::Error;

use crate::path::{InstancePath, PathSegment};
use crate::value::JsonKind;

/// What was wrong with a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaErrorKind {
    /// A schema (or nested schema) is not a JSON object.
    NotJsonObject,
    /// The `type` keyword is neither a string, an object, nor an array.
    CantDetectType,
    /// A `type`/`disallow` array element is neither an object nor a string.
    IncorrectType,
    /// A custom type's `type` member is not a schema object.
    IncorrectCustomType,
    /// `disallow` is neither an array, an object, nor a string.
    IncorrectDisallowType,
    /// A union schema's `type` is not a non-empty array.
    IncorrectUnionType,
    /// A keyword value has the wrong JSON kind or an unusable value.
    IncorrectMember,
    /// A `dependencies` entry is malformed.
    IncorrectDependencies,
    Unknown,
}

impl SchemaErrorKind {
    /// Stable identifier, matching the variant name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotJsonObject => "NotJsonObject",
            Self::CantDetectType => "CantDetectType",
            Self::IncorrectType => "IncorrectType",
            Self::IncorrectCustomType => "IncorrectCustomType",
            Self::IncorrectDisallowType => "IncorrectDisallowType",
            Self::IncorrectUnionType => "IncorrectUnionType",
            Self::IncorrectMember => "IncorrectMember",
            Self::IncorrectDependencies => "IncorrectDependencies",
            Self::Unknown => "Unknown",
        }
    }

    /// The schema-authoring rule that was violated.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NotJsonObject => "schema must be a json object",
            Self::CantDetectType => "cannot detect type of schema",
            Self::IncorrectType => "type element must be a schema object or a type name",
            Self::IncorrectCustomType => "custom type must be a schema object",
            Self::IncorrectDisallowType => "disallow must be an array, an object or a string",
            Self::IncorrectUnionType => "union type must be a non-empty array",
            Self::IncorrectMember => "incorrect member value",
            Self::IncorrectDependencies => "incorrect dependencies value",
            Self::Unknown => "unknown schema error",
        }
    }
}

impl fmt::Display for SchemaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A malformed schema document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at schema location {location}{}", detail_suffix(.detail))]
pub struct SchemaError {
    /// Violated authoring rule.
    pub kind: SchemaErrorKind,
    /// Location inside the schema document where the problem was found.
    pub location: String,
    /// Extra context, e.g. the offending keyword or regex error.
    pub detail: Option<String>,
}

impl SchemaError {
    pub fn new(kind: SchemaErrorKind, location: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

/// Which constraint an instance violated, with the data needed to describe it.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentErrorKind {
    EnumValue,
    MinimalLength { limit: usize },
    MaximalLength { limit: usize },
    Pattern { pattern: String },
    MinimumValue { limit: String, exclusive: bool },
    MaximumValue { limit: String, exclusive: bool },
    DivisibleValue { divisor: String },
    AdditionalProperty { property: String },
    DependenciesRestrictions { property: String, missing: String },
    RequiredProperty { property: String },
    MinimalItemsCount { limit: usize },
    MaximalItemsCount { limit: usize },
    UniqueItems { first: usize, second: usize },
    AdditionalItems { allowed: usize },
    DisallowType,
    /// No union alternative accepted the value. `causes` holds the first
    /// failure of each alternative, in declaration order.
    NeitherType { causes: Vec<DocumentError> },
    Type { expected: JsonKind, actual: JsonKind },
}

impl DocumentErrorKind {
    /// Stable identifier, matching the variant name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EnumValue => "EnumValue",
            Self::MinimalLength { .. } => "MinimalLength",
            Self::MaximalLength { .. } => "MaximalLength",
            Self::Pattern { .. } => "Pattern",
            Self::MinimumValue { .. } => "MinimumValue",
            Self::MaximumValue { .. } => "MaximumValue",
            Self::DivisibleValue { .. } => "DivisibleValue",
            Self::AdditionalProperty { .. } => "AdditionalProperty",
            Self::DependenciesRestrictions { .. } => "DependenciesRestrictions",
            Self::RequiredProperty { .. } => "RequiredProperty",
            Self::MinimalItemsCount { .. } => "MinimalItemsCount",
            Self::MaximalItemsCount { .. } => "MaximalItemsCount",
            Self::UniqueItems { .. } => "UniqueItems",
            Self::AdditionalItems { .. } => "AdditionalItems",
            Self::DisallowType => "DisallowType",
            Self::NeitherType { .. } => "NeitherType",
            Self::Type { .. } => "Type",
        }
    }
}

/// An instance that failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", self.detail())]
pub struct DocumentError {
    /// Violated constraint.
    pub kind: DocumentErrorKind,
    /// Location of the offending value in the instance.
    pub path: InstancePath,
    /// Location of the failing node in its schema document.
    pub schema_path: String,
}

impl DocumentError {
    /// An error raised at the value currently being checked.
    pub fn new(kind: DocumentErrorKind, schema_path: impl Into<String>) -> Self {
        Self {
            kind,
            path: InstancePath::root(),
            schema_path: schema_path.into(),
        }
    }

    /// Prefix the instance path while unwinding out of a nested value.
    ///
    /// Union causes are relative to the same value, so they are prefixed too.
    pub fn within(mut self, segment: PathSegment) -> Self {
        self.prepend(segment);
        self
    }

    fn prepend(&mut self, segment: PathSegment) {
        if let DocumentErrorKind::NeitherType { causes } = &mut self.kind {
            for cause in causes {
                cause.prepend(segment.clone());
            }
        }
        self.path.prepend(segment);
    }

    /// JSON Pointer of the offending value.
    pub fn pointer(&self) -> String {
        self.path.to_pointer()
    }

    /// Human-readable description naming the offending path.
    pub fn detail(&self) -> String {
        let p = self.path.to_pointer();
        match &self.kind {
            DocumentErrorKind::EnumValue => format!(
                "element {p} doesn't satisfy restriction on enumeration of all possible values"
            ),
            DocumentErrorKind::MinimalLength { limit } => {
                format!("value length of {p} must be >= {limit}")
            }
            DocumentErrorKind::MaximalLength { limit } => {
                format!("value length of {p} must be <= {limit}")
            }
            DocumentErrorKind::Pattern { pattern } => {
                format!("element {p} must match pattern '{pattern}'")
            }
            DocumentErrorKind::MinimumValue { limit, exclusive } => {
                let op = if *exclusive { ">" } else { ">=" };
                format!("value of {p} must be {op} {limit}")
            }
            DocumentErrorKind::MaximumValue { limit, exclusive } => {
                let op = if *exclusive { "<" } else { "<=" };
                format!("value of {p} must be {op} {limit}")
            }
            DocumentErrorKind::DivisibleValue { divisor } => {
                format!("element {p} must be divisible by {divisor}")
            }
            DocumentErrorKind::AdditionalProperty { property } => {
                format!("element {p} is an additional property '{property}', which is not allowed")
            }
            DocumentErrorKind::DependenciesRestrictions { property, missing } => format!(
                "element {p} doesn't satisfy dependency restriction of property '{property}': \
                 missing property '{missing}'"
            ),
            DocumentErrorKind::RequiredProperty { property } => {
                format!("element {p} must contain property '{property}'")
            }
            DocumentErrorKind::MinimalItemsCount { limit } => {
                format!("array {p} must contain >= {limit} items")
            }
            DocumentErrorKind::MaximalItemsCount { limit } => {
                format!("array {p} must contain <= {limit} items")
            }
            DocumentErrorKind::UniqueItems { first, second } => {
                format!("array {p} cannot contain equal items (positions {first} and {second})")
            }
            DocumentErrorKind::AdditionalItems { allowed } => {
                format!("array {p} cannot contain additional items beyond the first {allowed}")
            }
            DocumentErrorKind::DisallowType => {
                format!("element {p} satisfies one of disallowed types")
            }
            DocumentErrorKind::NeitherType { causes } => {
                let mut detail = format!("element {p} doesn't satisfy any allowed type");
                if !causes.is_empty() {
                    let reasons: Vec<String> = causes.iter().map(DocumentError::detail).collect();
                    detail.push_str(" (");
                    detail.push_str(&reasons.join("; "));
                    detail.push(')');
                }
                detail
            }
            DocumentErrorKind::Type { expected, actual } => {
                format!("element {p} has incorrect type: expected {expected}, found {actual}")
            }
        }
    }
}

/// Malformed JSON text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at byte {offset} (line {line}, column {column})")]
pub struct ParseError {
    /// Byte offset of the failure in the input text.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    pub message: String,
}

impl ParseError {
    /// Convert a `serde_json` error, computing the byte offset in `text`.
    pub fn from_json(error: &serde_json::Error, text: &str) -> Self {
        let line = error.line();
        let column = error.column();
        Self {
            offset: byte_offset(text, line, column),
            line,
            column,
            message: strip_position(&error.to_string()),
        }
    }
}

/// Byte offset of a 1-based (line, column) position, clamped to the text.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, content) in text.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let within = column.saturating_sub(1).min(content.len());
            return offset + within;
        }
        offset += content.len();
    }
    text.len()
}

/// `serde_json` appends " at line L column C"; the position is carried separately.
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message.to_string(),
    }
}

/// Any failure produced by the schema facade.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Input text is not valid JSON.
    #[error("json parse error: {0}")]
    Parse(#[from] ParseError),

    /// The schema document is malformed.
    #[error("incorrect schema: {0}")]
    Schema(#[from] SchemaError),

    /// A document failed validation.
    #[error("incorrect document: {0}")]
    Document(#[from] DocumentError),
}
