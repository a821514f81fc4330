//! # Schema Compiler
//!
//! Turns a raw schema document into a [`NodeArena`]. Compilation is
//! fail-fast: the first malformed keyword aborts with a [`SchemaError`]
//! naming the schema location, and no partial arena escapes.
//!
//! ## Type Dispatch
//!
//! | `type` value | Compiled as                                   |
//! |--------------|-----------------------------------------------|
//! | absent       | `any`                                         |
//! | string       | the named kind; unknown names fall to `any`   |
//! | object       | custom type wrapping the nested schema        |
//! | array        | union of the elements                         |
//! | other        | [`SchemaErrorKind::CantDetectType`]           |
//!
//! `type` and `disallow` array elements are either nested schema objects
//! or bare type names (`"string"` behaves as `{"type": "string"}`).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{SchemaError, SchemaErrorKind};
use crate::node::{
    Additional, AnyNode, ArrayNode, Common, CustomNode, Dependency, Items, Node, NodeArena,
    NodeId, NodeKind, Numeric, NumericNode, ObjectNode, Primitives, StringNode, UnionNode,
};
use crate::path::child_location;
use crate::pattern::Pattern;
use crate::value::JsonKind;

type Object = Map<String, Value>;

/// Built-in `type` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
    Any,
}

impl TypeName {
    /// Map a type keyword; names draft-03 does not define are treated as `any`.
    pub fn parse(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "object" => Self::Object,
            "array" => Self::Array,
            "null" => Self::Null,
            _ => Self::Any,
        }
    }

    /// The JSON kind a primitive type name checks for; `None` for `any`.
    pub fn primitive(self) -> Option<JsonKind> {
        match self {
            Self::String => Some(JsonKind::String),
            Self::Number => Some(JsonKind::Number),
            Self::Integer => Some(JsonKind::Integer),
            Self::Boolean => Some(JsonKind::Boolean),
            Self::Object => Some(JsonKind::Object),
            Self::Array => Some(JsonKind::Array),
            Self::Null => Some(JsonKind::Null),
            Self::Any => None,
        }
    }
}

/// Builds nodes into an arena, one schema document at a time.
#[derive(Debug, Default)]
pub(crate) struct Compiler {
    arena: NodeArena,
}

impl Compiler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn finish(self) -> NodeArena {
        self.arena
    }

    /// Compile the schema object `value` found at `location`.
    pub(crate) fn compile(&mut self, value: &Value, location: &str) -> Result<NodeId, SchemaError> {
        let Some(object) = value.as_object() else {
            return Err(SchemaError::new(SchemaErrorKind::NotJsonObject, location));
        };

        match object.get("type") {
            None => self.compile_named(TypeName::Any, object, location),
            Some(Value::String(name)) => self.compile_named(TypeName::parse(name), object, location),
            Some(Value::Object(_)) => self.compile_custom(object, location),
            Some(Value::Array(_)) => self.compile_union(object, location),
            Some(other) => Err(
                SchemaError::new(SchemaErrorKind::CantDetectType, location)
                    .with_detail(format!("type is {}", kind_label(other))),
            ),
        }
    }

    fn compile_named(
        &mut self,
        name: TypeName,
        object: &Object,
        location: &str,
    ) -> Result<NodeId, SchemaError> {
        let common = self.common(object, location)?;
        let kind = match name.primitive() {
            None => self.any_kind(object, &common)?,
            Some(primitive) => self.primitive_kind(primitive, object, location)?,
        };
        Ok(self.arena.push(Node::new(common, kind)))
    }

    fn compile_custom(&mut self, object: &Object, location: &str) -> Result<NodeId, SchemaError> {
        let common = self.common(object, location)?;
        let target_location = child_location(location, "type");
        let target = match object.get("type") {
            Some(value @ Value::Object(_)) => self.compile(value, &target_location)?,
            _ => {
                return Err(SchemaError::new(
                    SchemaErrorKind::IncorrectCustomType,
                    target_location,
                ))
            }
        };
        Ok(self
            .arena
            .push(Node::new(common, NodeKind::Custom(CustomNode { target }))))
    }

    fn compile_union(&mut self, object: &Object, location: &str) -> Result<NodeId, SchemaError> {
        let common = self.common(object, location)?;
        let union_location = child_location(location, "type");
        let elements = match object.get("type") {
            Some(Value::Array(elements)) if !elements.is_empty() => elements,
            _ => {
                return Err(SchemaError::new(
                    SchemaErrorKind::IncorrectUnionType,
                    union_location,
                ))
            }
        };

        let mut alternatives = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let element_location = child_location(&union_location, &index.to_string());
            alternatives.push(self.array_element(element, &element_location)?);
        }
        Ok(self
            .arena
            .push(Node::new(common, NodeKind::Union(UnionNode { alternatives }))))
    }

    /// Element of a `type` or `disallow` array.
    fn array_element(&mut self, element: &Value, location: &str) -> Result<NodeId, SchemaError> {
        match element {
            Value::Object(_) => self.compile(element, location),
            Value::String(name) => self.bare_type(name, location),
            other => Err(SchemaError::new(SchemaErrorKind::IncorrectType, location)
                .with_detail(format!("found {}", kind_label(other)))),
        }
    }

    fn bare_type(&mut self, name: &str, location: &str) -> Result<NodeId, SchemaError> {
        self.compile_named(TypeName::parse(name), &Object::new(), location)
    }

    /// Keywords every node kind accepts.
    fn common(&mut self, object: &Object, location: &str) -> Result<Common, SchemaError> {
        let id = optional_string(object, "id", location)?;
        let reference = optional_string(object, "$ref", location)?;
        let required = optional_bool(object, "required", location)?.unwrap_or(false);

        let extends = match object.get("extends") {
            None => Vec::new(),
            Some(single @ Value::Object(_)) => {
                vec![self.compile(single, &child_location(location, "extends"))?]
            }
            Some(Value::Array(schemas)) => {
                let base = child_location(location, "extends");
                let mut extends = Vec::with_capacity(schemas.len());
                for (index, schema) in schemas.iter().enumerate() {
                    extends.push(self.compile(schema, &child_location(&base, &index.to_string()))?);
                }
                extends
            }
            Some(_) => return Err(incorrect_member(location, "extends must be an object or an array")),
        };

        let enumeration = match object.get("enum") {
            None => None,
            Some(Value::Array(values)) => Some(Arc::from(values.as_slice())),
            Some(_) => return Err(incorrect_member(location, "enum must be an array")),
        };

        Ok(Common {
            id,
            reference,
            required,
            extends,
            enumeration,
            location: location.to_string(),
        })
    }

    /// `any` compiles one view per primitive kind from the same keywords;
    /// the instance's runtime kind picks the view.
    fn any_kind(&mut self, object: &Object, common: &Common) -> Result<NodeKind, SchemaError> {
        let location = common.location.as_str();
        let view = |compiler: &mut Self, primitive: JsonKind| -> Result<NodeId, SchemaError> {
            let kind = compiler.primitive_kind(primitive, object, location)?;
            Ok(compiler.arena.push(Node::new(common.clone(), kind)))
        };
        let primitives = Primitives {
            string: view(self, JsonKind::String)?,
            number: view(self, JsonKind::Number)?,
            integer: view(self, JsonKind::Integer)?,
            boolean: view(self, JsonKind::Boolean)?,
            object: view(self, JsonKind::Object)?,
            array: view(self, JsonKind::Array)?,
            null: view(self, JsonKind::Null)?,
        };

        let disallow_location = child_location(location, "disallow");
        let disallow = match object.get("disallow") {
            None => Vec::new(),
            Some(Value::String(name)) => vec![self.bare_type(name, &disallow_location)?],
            Some(schema @ Value::Object(_)) => vec![self.compile(schema, &disallow_location)?],
            Some(Value::Array(elements)) => {
                let mut disallow = Vec::with_capacity(elements.len());
                for (index, element) in elements.iter().enumerate() {
                    let element_location = child_location(&disallow_location, &index.to_string());
                    disallow.push(self.array_element(element, &element_location)?);
                }
                disallow
            }
            Some(other) => {
                return Err(
                    SchemaError::new(SchemaErrorKind::IncorrectDisallowType, disallow_location)
                        .with_detail(format!("found {}", kind_label(other))),
                )
            }
        };

        Ok(NodeKind::Any(AnyNode {
            primitives,
            disallow,
        }))
    }

    fn primitive_kind(
        &mut self,
        primitive: JsonKind,
        object: &Object,
        location: &str,
    ) -> Result<NodeKind, SchemaError> {
        Ok(match primitive {
            JsonKind::String => NodeKind::String(string_node(object, location)?),
            JsonKind::Number => NodeKind::Number(numeric_node(object, location)?),
            JsonKind::Integer => NodeKind::Integer(numeric_node(object, location)?),
            JsonKind::Boolean => NodeKind::Boolean,
            JsonKind::Null => NodeKind::Null,
            JsonKind::Object => NodeKind::Object(self.object_node(object, location)?),
            JsonKind::Array => NodeKind::Array(self.array_node(object, location)?),
        })
    }

    fn object_node(&mut self, object: &Object, location: &str) -> Result<ObjectNode, SchemaError> {
        let mut node = ObjectNode::default();

        match object.get("properties") {
            None => {}
            Some(Value::Object(properties)) => {
                for (name, schema) in properties {
                    let id = self.compile(schema, &child_location(location, name))?;
                    node.properties.insert(name.clone(), id);
                }
            }
            Some(_) => return Err(incorrect_member(location, "properties must be an object")),
        }

        match object.get("patternProperties") {
            None => {}
            Some(Value::Object(patterns)) => {
                let base = child_location(location, "patternProperties");
                for (source, schema) in patterns {
                    let pattern = compile_pattern(source, location)?;
                    let id = self.compile(schema, &child_location(&base, source))?;
                    node.pattern_properties.push((pattern, id));
                }
            }
            Some(_) => {
                return Err(incorrect_member(location, "patternProperties must be an object"))
            }
        }

        node.additional_properties = self.additional(object, "additionalProperties", location)?;

        match object.get("dependencies") {
            None => {}
            Some(Value::Object(dependencies)) => {
                node.dependencies = self.dependencies(dependencies, location)?;
            }
            Some(_) => {
                return Err(SchemaError::new(SchemaErrorKind::IncorrectDependencies, location)
                    .with_detail("dependencies must be an object"))
            }
        }

        Ok(node)
    }

    fn dependencies(
        &mut self,
        dependencies: &Object,
        location: &str,
    ) -> Result<BTreeMap<String, Dependency>, SchemaError> {
        let base = child_location(location, "dependencies");
        let mut compiled = BTreeMap::new();
        for (property, value) in dependencies {
            let entry_location = child_location(&base, property);
            let dependency = match value {
                Value::String(name) => Dependency::Properties(vec![name.clone()]),
                Value::Array(names) => {
                    let mut properties: Vec<String> = Vec::with_capacity(names.len());
                    for name in names {
                        let Some(name) = name.as_str() else {
                            return Err(SchemaError::new(
                                SchemaErrorKind::IncorrectDependencies,
                                entry_location,
                            )
                            .with_detail("dependency names must be strings"));
                        };
                        if properties.iter().any(|seen| seen == name) {
                            return Err(SchemaError::new(
                                SchemaErrorKind::IncorrectDependencies,
                                entry_location,
                            )
                            .with_detail(format!("duplicate dependency '{name}'")));
                        }
                        properties.push(name.to_string());
                    }
                    Dependency::Properties(properties)
                }
                Value::Object(_) => Dependency::Schema(self.compile(value, &entry_location)?),
                other => {
                    return Err(
                        SchemaError::new(SchemaErrorKind::IncorrectDependencies, entry_location)
                            .with_detail(format!("found {}", kind_label(other))),
                    )
                }
            };
            compiled.insert(property.clone(), dependency);
        }
        Ok(compiled)
    }

    fn array_node(&mut self, object: &Object, location: &str) -> Result<ArrayNode, SchemaError> {
        let items = match object.get("items") {
            None => None,
            Some(schema @ Value::Object(_)) => {
                Some(Items::Single(self.compile(schema, &child_location(location, "items"))?))
            }
            Some(Value::Array(schemas)) => {
                let base = child_location(location, "items");
                let mut tuple = Vec::with_capacity(schemas.len());
                for (index, schema) in schemas.iter().enumerate() {
                    tuple.push(self.compile(schema, &child_location(&base, &index.to_string()))?);
                }
                Some(Items::Tuple(tuple))
            }
            Some(_) => return Err(incorrect_member(location, "items must be an object or an array")),
        };

        Ok(ArrayNode {
            min_items: optional_count(object, "minItems", location)?.unwrap_or(0),
            max_items: optional_count(object, "maxItems", location)?,
            unique_items: optional_bool(object, "uniqueItems", location)?.unwrap_or(false),
            items,
            additional_items: self.additional(object, "additionalItems", location)?,
        })
    }

    /// Tri-state `additionalProperties` / `additionalItems`.
    fn additional(
        &mut self,
        object: &Object,
        keyword: &str,
        location: &str,
    ) -> Result<Additional, SchemaError> {
        match object.get(keyword) {
            None | Some(Value::Bool(true)) => Ok(Additional::Unrestricted),
            Some(Value::Bool(false)) => Ok(Additional::Forbidden),
            Some(schema @ Value::Object(_)) => Ok(Additional::Schema(
                self.compile(schema, &child_location(location, keyword))?,
            )),
            Some(_) => Err(incorrect_member(
                location,
                format!("{keyword} must be a boolean or an object"),
            )),
        }
    }
}

fn string_node(object: &Object, location: &str) -> Result<StringNode, SchemaError> {
    let pattern = match object.get("pattern") {
        None => None,
        Some(Value::String(source)) => Some(compile_pattern(source, location)?),
        Some(_) => return Err(incorrect_member(location, "pattern must be a string")),
    };
    Ok(StringNode {
        min_length: optional_count(object, "minLength", location)?.unwrap_or(0),
        max_length: optional_count(object, "maxLength", location)?,
        pattern,
    })
}

fn numeric_node<T: Numeric>(object: &Object, location: &str) -> Result<NumericNode<T>, SchemaError> {
    let exclusive_minimum = optional_bool(object, "exclusiveMinimum", location)?.unwrap_or(false);
    let exclusive_maximum = optional_bool(object, "exclusiveMaximum", location)?.unwrap_or(false);

    let mut node = NumericNode::<T>::default();
    if let Some(value) = object.get("minimum") {
        let (bound, exclusive) = T::lower_bound(value, exclusive_minimum)
            .ok_or_else(|| incorrect_member(location, "minimum must be a number"))?;
        node.minimum = Some(bound);
        node.exclusive_minimum = exclusive;
    }
    if let Some(value) = object.get("maximum") {
        let (bound, exclusive) = T::upper_bound(value, exclusive_maximum)
            .ok_or_else(|| incorrect_member(location, "maximum must be a number"))?;
        node.maximum = Some(bound);
        node.exclusive_maximum = exclusive;
    }
    if let Some(value) = object.get("divisibleBy") {
        match value.as_f64() {
            Some(divisor) if divisor > 0.0 && divisor.is_finite() => {
                node.divisible_by = Some(divisor)
            }
            _ => {
                return Err(incorrect_member(
                    location,
                    "divisibleBy must be a number greater than 0",
                ))
            }
        }
    }
    Ok(node)
}

fn compile_pattern(source: &str, location: &str) -> Result<Pattern, SchemaError> {
    Pattern::new(source)
        .map_err(|e| incorrect_member(location, format!("invalid pattern '{source}': {e}")))
}

fn optional_string(
    object: &Object,
    keyword: &str,
    location: &str,
) -> Result<Option<String>, SchemaError> {
    match object.get(keyword) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(incorrect_member(location, format!("{keyword} must be a string"))),
    }
}

fn optional_bool(object: &Object, keyword: &str, location: &str) -> Result<Option<bool>, SchemaError> {
    match object.get(keyword) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(incorrect_member(location, format!("{keyword} must be a boolean"))),
    }
}

fn optional_count(
    object: &Object,
    keyword: &str,
    location: &str,
) -> Result<Option<usize>, SchemaError> {
    match object.get(keyword) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|count| usize::try_from(count).ok())
            .map(Some)
            .ok_or_else(|| {
                incorrect_member(location, format!("{keyword} must be a non-negative integer"))
            }),
    }
}

fn incorrect_member(location: &str, detail: impl Into<String>) -> SchemaError {
    SchemaError::new(SchemaErrorKind::IncorrectMember, location).with_detail(detail)
}

fn kind_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
