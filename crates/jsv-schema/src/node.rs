//! # Schema Nodes — Arena of Compiled Schema Objects
//!
//! Every schema (sub)object compiles into one [`Node`]: the attributes all
//! node kinds share ([`Common`]) plus a closed [`NodeKind`] carrying the
//! kind-specific constraints. Nodes live in a [`NodeArena`] owned by the
//! `Schema` and refer to each other by [`NodeId`], so nodes can be shared
//! (the seven primitive views of an `any` schema share one `extends`
//! list) without reference counting.
//!
//! `$ref` is stored unresolved and followed lazily at validation time,
//! which is what lets a schema refer to itself (or to its own root)
//! without building an ownership cycle.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::pattern::Pattern;
use crate::value::{self, JsonKind};

/// Stable handle of a node inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Attributes parsed for every node kind.
#[derive(Debug, Clone, Default)]
pub struct Common {
    /// `id` keyword.
    pub id: Option<String>,
    /// `$ref` target, resolved at validation time.
    pub reference: Option<String>,
    /// `required` keyword; consulted by the enclosing object's `properties`.
    pub required: bool,
    /// `extends` schemas, validated in order in addition to this node.
    pub extends: Vec<NodeId>,
    /// `enum` values; shared between the primitive views of an `any` node.
    pub enumeration: Option<Arc<[Value]>>,
    /// Location in the schema document.
    pub location: String,
}

/// One compiled schema object.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) common: Common,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn new(common: Common, kind: NodeKind) -> Self {
        Self { common, kind }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn id(&self) -> Option<&str> {
        self.common.id.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.common.reference.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.common.required
    }

    pub fn location(&self) -> &str {
        &self.common.location
    }
}

/// Kind-specific part of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    String(StringNode),
    Number(NumericNode<f64>),
    Integer(NumericNode<i128>),
    Boolean,
    Object(ObjectNode),
    Array(ArrayNode),
    Null,
    Any(AnyNode),
    Union(UnionNode),
    Custom(CustomNode),
}

impl NodeKind {
    /// Keyword-style name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Integer(_) => "integer",
            Self::Boolean => "boolean",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Null => "null",
            Self::Any(_) => "any",
            Self::Union(_) => "union",
            Self::Custom(_) => "custom",
        }
    }

    /// The single JSON kind a primitive node accepts; `None` for `any`,
    /// union and custom nodes, which accept every kind.
    pub fn accepted_kind(&self) -> Option<JsonKind> {
        match self {
            Self::String(_) => Some(JsonKind::String),
            Self::Number(_) => Some(JsonKind::Number),
            Self::Integer(_) => Some(JsonKind::Integer),
            Self::Boolean => Some(JsonKind::Boolean),
            Self::Object(_) => Some(JsonKind::Object),
            Self::Array(_) => Some(JsonKind::Array),
            Self::Null => Some(JsonKind::Null),
            Self::Any(_) | Self::Union(_) | Self::Custom(_) => None,
        }
    }

    /// Whether `actual` satisfies this node's type check.
    ///
    /// A `number` node accepts integers as well.
    pub fn accepts(&self, actual: JsonKind) -> bool {
        match self.accepted_kind() {
            None => true,
            Some(JsonKind::Number) => matches!(actual, JsonKind::Number | JsonKind::Integer),
            Some(expected) => expected == actual,
        }
    }
}

/// `string` constraints.
#[derive(Debug, Clone, Default)]
pub struct StringNode {
    pub min_length: usize,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
}

/// One of the two numeric domains: exact `i128` integers or tolerant `f64`
/// numbers.
pub trait Numeric: Copy + PartialOrd + fmt::Display + fmt::Debug {
    /// Read an instance value in this domain.
    fn from_instance(value: &Value) -> Option<Self>;

    /// Read a schema `minimum`, returning the bound and whether it is exclusive.
    fn lower_bound(value: &Value, exclusive: bool) -> Option<(Self, bool)>;

    /// Read a schema `maximum`, returning the bound and whether it is exclusive.
    fn upper_bound(value: &Value, exclusive: bool) -> Option<(Self, bool)>;

    /// Equality rule of the domain.
    fn same(self, other: Self) -> bool;

    /// Whether `self / divisor` is integral.
    fn is_multiple_of(self, divisor: f64) -> bool;
}

impl Numeric for f64 {
    fn from_instance(value: &Value) -> Option<Self> {
        value::as_float(value)
    }

    fn lower_bound(value: &Value, exclusive: bool) -> Option<(Self, bool)> {
        value::as_float(value).map(|bound| (bound, exclusive))
    }

    fn upper_bound(value: &Value, exclusive: bool) -> Option<(Self, bool)> {
        value::as_float(value).map(|bound| (bound, exclusive))
    }

    fn same(self, other: Self) -> bool {
        value::approx_eq(self, other)
    }

    fn is_multiple_of(self, divisor: f64) -> bool {
        value::is_approx_integral(self / divisor)
    }
}

impl Numeric for i128 {
    fn from_instance(value: &Value) -> Option<Self> {
        value::as_integer(value)
    }

    // A fractional bound is tightened to the nearest integer inside it; the
    // instance can never equal it, so exclusivity no longer matters.
    fn lower_bound(value: &Value, exclusive: bool) -> Option<(Self, bool)> {
        if let Some(bound) = value::as_integer(value) {
            return Some((bound, exclusive));
        }
        let bound = value::as_float(value)?;
        if bound.fract() == 0.0 {
            Some((bound as i128, exclusive))
        } else {
            Some((bound.ceil() as i128, false))
        }
    }

    fn upper_bound(value: &Value, exclusive: bool) -> Option<(Self, bool)> {
        if let Some(bound) = value::as_integer(value) {
            return Some((bound, exclusive));
        }
        let bound = value::as_float(value)?;
        if bound.fract() == 0.0 {
            Some((bound as i128, exclusive))
        } else {
            Some((bound.floor() as i128, false))
        }
    }

    fn same(self, other: Self) -> bool {
        self == other
    }

    // Integral divisors are exact. One beyond the i128 range exceeds every
    // instance in magnitude, so only zero is a multiple of it.
    fn is_multiple_of(self, divisor: f64) -> bool {
        if divisor.fract() == 0.0 && divisor != 0.0 {
            if divisor.abs() < i128::MAX as f64 {
                return self % (divisor as i128) == 0;
            }
            return self == 0;
        }
        value::is_approx_integral(self as f64 / divisor)
    }
}

/// `number` / `integer` constraints.
#[derive(Debug, Clone)]
pub struct NumericNode<T: Numeric> {
    pub minimum: Option<T>,
    pub maximum: Option<T>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    /// Always strictly positive.
    pub divisible_by: Option<f64>,
}

impl<T: Numeric> Default for NumericNode<T> {
    fn default() -> Self {
        Self {
            minimum: None,
            maximum: None,
            exclusive_minimum: false,
            exclusive_maximum: false,
            divisible_by: None,
        }
    }
}

/// Tri-state `additionalProperties` / `additionalItems`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Additional {
    #[default]
    Unrestricted,
    Forbidden,
    Schema(NodeId),
}

/// One `dependencies` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// The named properties must all be present.
    Properties(Vec<String>),
    /// The whole instance must validate against the schema.
    Schema(NodeId),
}

/// `object` constraints.
#[derive(Debug, Clone, Default)]
pub struct ObjectNode {
    pub properties: BTreeMap<String, NodeId>,
    pub pattern_properties: Vec<(Pattern, NodeId)>,
    pub additional_properties: Additional,
    pub dependencies: BTreeMap<String, Dependency>,
}

/// `items` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Items {
    /// One schema for every element.
    Single(NodeId),
    /// One schema per position; later elements fall to `additionalItems`.
    Tuple(Vec<NodeId>),
}

/// `array` constraints.
#[derive(Debug, Clone, Default)]
pub struct ArrayNode {
    pub min_items: usize,
    pub max_items: Option<usize>,
    pub unique_items: bool,
    pub items: Option<Items>,
    pub additional_items: Additional,
}

/// The primitive views of an `any` schema, one per runtime kind.
#[derive(Debug, Clone, Copy)]
pub struct Primitives {
    pub string: NodeId,
    pub number: NodeId,
    pub integer: NodeId,
    pub boolean: NodeId,
    pub object: NodeId,
    pub array: NodeId,
    pub null: NodeId,
}

impl Primitives {
    /// The view handling values of `kind`.
    pub fn for_kind(&self, kind: JsonKind) -> NodeId {
        match kind {
            JsonKind::String => self.string,
            JsonKind::Number => self.number,
            JsonKind::Integer => self.integer,
            JsonKind::Boolean => self.boolean,
            JsonKind::Object => self.object,
            JsonKind::Array => self.array,
            JsonKind::Null => self.null,
        }
    }
}

/// `any` (or untyped) schema.
#[derive(Debug, Clone)]
pub struct AnyNode {
    pub primitives: Primitives,
    /// The instance must fail every one of these.
    pub disallow: Vec<NodeId>,
}

/// `type: [...]` schema.
#[derive(Debug, Clone, Default)]
pub struct UnionNode {
    pub alternatives: Vec<NodeId>,
}

/// `type: {...}` schema.
#[derive(Debug, Clone)]
pub struct CustomNode {
    pub target: NodeId,
}

/// Owner of every node compiled from one schema document.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Look up a node. Ids are only handed out by this arena, so the
    /// lookup cannot miss.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}
