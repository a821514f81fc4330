//! # Validation Walk
//!
//! Recursive descent over a compiled [`Schema`] and a JSON instance.
//! Each node check returns a [`ValidationOutcome`]; the first failure
//! short-circuits and is prefixed with the member name or array index of
//! every structural step as it propagates back to the root.
//!
//! ## Order of Checks
//!
//! For every node except `any`:
//!
//! 1. `$ref` target, when it resolves.
//! 2. `extends` schemas, in declaration order.
//! 3. Type check (skipped by union and custom nodes).
//! 4. `enum` membership.
//! 5. Kind-specific constraints.
//!
//! An `any` node first requires the instance to fail every `disallow`
//! schema, then delegates entirely to the primitive view matching the
//! instance's runtime kind. That view carries the `$ref`, `extends` and
//! `enum` of the `any` schema, so they run exactly once.
//!
//! ## Reference Cycles
//!
//! `$ref` may lead back to a node already being checked against the same
//! value (`{"$ref": "#"}` at a root, mutually referring schemas). The
//! walker keeps the active `(schema, node, value)` triples entered through
//! references; re-entering one makes no progress and is treated as
//! satisfied.

use serde_json::{Map, Value};

use crate::error::{DocumentError, DocumentErrorKind};
use crate::node::{
    Additional, AnyNode, ArrayNode, Dependency, Items, Node, NodeId, NodeKind, Numeric,
    NumericNode, ObjectNode, StringNode, UnionNode,
};
use crate::path::PathSegment;
use crate::schema::Schema;
use crate::value::{json_equal, JsonKind};

/// Result of checking one instance: `Ok` or the first violation found.
pub type ValidationOutcome = Result<(), DocumentError>;

/// Validate `instance` against the root of `schema`.
pub(crate) fn validate(schema: &Schema, instance: &Value) -> ValidationOutcome {
    Walker::default().enter(schema, schema.root(), instance)
}

type ActiveRef = (u64, NodeId, usize);

#[derive(Debug, Default)]
struct Walker {
    active: Vec<ActiveRef>,
}

impl Walker {
    /// Check a node reached through a reference, guarding against cycles.
    fn enter(&mut self, schema: &Schema, id: NodeId, instance: &Value) -> ValidationOutcome {
        let key = (schema.uid(), id, instance as *const Value as usize);
        if self.active.contains(&key) {
            tracing::trace!(
                schema_path = schema.arena().get(id).location(),
                "reference cycle short-circuited"
            );
            return Ok(());
        }
        self.active.push(key);
        let outcome = self.node(schema, id, instance);
        self.active.pop();
        outcome
    }

    fn node(&mut self, schema: &Schema, id: NodeId, instance: &Value) -> ValidationOutcome {
        let node = schema.arena().get(id);
        if let NodeKind::Any(any) = node.kind() {
            return self.any(schema, node, any, instance);
        }

        self.reference(schema, node, instance)?;
        for base in &node.common().extends {
            self.node(schema, *base, instance)?;
        }

        let actual = JsonKind::of(instance);
        if let Some(expected) = node.kind().accepted_kind() {
            if !node.kind().accepts(actual) {
                return Err(fail(node, DocumentErrorKind::Type { expected, actual }));
            }
        }

        if let Some(values) = &node.common().enumeration {
            if !values.iter().any(|candidate| json_equal(candidate, instance)) {
                return Err(fail(node, DocumentErrorKind::EnumValue));
            }
        }

        match (node.kind(), instance) {
            (NodeKind::String(string), Value::String(text)) => check_string(node, string, text),
            (NodeKind::Number(number), _) => check_numeric(node, number, instance),
            (NodeKind::Integer(integer), _) => check_numeric(node, integer, instance),
            (NodeKind::Object(object), Value::Object(members)) => {
                self.object(schema, node, object, members, instance)
            }
            (NodeKind::Array(array), Value::Array(elements)) => {
                self.array(schema, node, array, elements)
            }
            (NodeKind::Union(union), _) => self.union(schema, node, union, instance),
            (NodeKind::Custom(custom), _) => self.node(schema, custom.target, instance),
            _ => Ok(()),
        }
    }

    fn reference(&mut self, schema: &Schema, node: &Node, instance: &Value) -> ValidationOutcome {
        let Some(reference) = node.reference() else {
            return Ok(());
        };
        if schema.is_self_reference(reference) {
            return self.enter(schema, schema.root(), instance);
        }
        match schema.resolver().resolve(reference) {
            Some(target) => {
                tracing::trace!(reference, "resolved $ref");
                self.enter(&target, target.root(), instance)
            }
            None => {
                tracing::trace!(reference, "unresolved $ref ignored");
                Ok(())
            }
        }
    }

    /// Whether `instance` satisfies `id`; the failure itself is discarded.
    fn passes(&mut self, schema: &Schema, id: NodeId, instance: &Value) -> bool {
        self.node(schema, id, instance).is_ok()
    }

    fn any(
        &mut self,
        schema: &Schema,
        node: &Node,
        any: &AnyNode,
        instance: &Value,
    ) -> ValidationOutcome {
        for disallowed in &any.disallow {
            if self.passes(schema, *disallowed, instance) {
                return Err(fail(node, DocumentErrorKind::DisallowType));
            }
        }
        let view = any.primitives.for_kind(JsonKind::of(instance));
        self.node(schema, view, instance)
    }

    fn union(
        &mut self,
        schema: &Schema,
        node: &Node,
        union: &UnionNode,
        instance: &Value,
    ) -> ValidationOutcome {
        let mut causes = Vec::with_capacity(union.alternatives.len());
        for alternative in &union.alternatives {
            match self.node(schema, *alternative, instance) {
                Ok(()) => return Ok(()),
                Err(cause) => causes.push(cause),
            }
        }
        Err(fail(node, DocumentErrorKind::NeitherType { causes }))
    }

    fn object(
        &mut self,
        schema: &Schema,
        node: &Node,
        object: &ObjectNode,
        members: &Map<String, Value>,
        instance: &Value,
    ) -> ValidationOutcome {
        for (name, value) in members {
            let mut matched = false;

            if let Some(property) = object.properties.get(name) {
                matched = true;
                self.node(schema, *property, value)
                    .map_err(|e| e.within(PathSegment::member(name)))?;
            }

            for (pattern, property) in &object.pattern_properties {
                if pattern.matches(name) {
                    matched = true;
                    self.node(schema, *property, value)
                        .map_err(|e| e.within(PathSegment::member(name)))?;
                }
            }

            if !matched {
                match object.additional_properties {
                    Additional::Unrestricted => {}
                    Additional::Forbidden => {
                        let kind = DocumentErrorKind::AdditionalProperty {
                            property: name.clone(),
                        };
                        return Err(fail(node, kind).within(PathSegment::member(name)));
                    }
                    Additional::Schema(additional) => {
                        self.node(schema, additional, value)
                            .map_err(|e| e.within(PathSegment::member(name)))?;
                    }
                }
            }

            match object.dependencies.get(name) {
                None => {}
                Some(Dependency::Properties(required)) => {
                    if let Some(missing) = required.iter().find(|dep| !members.contains_key(*dep)) {
                        let kind = DocumentErrorKind::DependenciesRestrictions {
                            property: name.clone(),
                            missing: missing.clone(),
                        };
                        return Err(fail(node, kind));
                    }
                }
                Some(Dependency::Schema(dependency)) => {
                    self.node(schema, *dependency, instance)?;
                }
            }
        }

        for (name, property) in &object.properties {
            if schema.arena().get(*property).is_required() && !members.contains_key(name) {
                let kind = DocumentErrorKind::RequiredProperty {
                    property: name.clone(),
                };
                return Err(fail(node, kind));
            }
        }

        Ok(())
    }

    fn array(
        &mut self,
        schema: &Schema,
        node: &Node,
        array: &ArrayNode,
        elements: &[Value],
    ) -> ValidationOutcome {
        if elements.len() < array.min_items {
            let kind = DocumentErrorKind::MinimalItemsCount {
                limit: array.min_items,
            };
            return Err(fail(node, kind));
        }
        if let Some(limit) = array.max_items {
            if elements.len() > limit {
                return Err(fail(node, DocumentErrorKind::MaximalItemsCount { limit }));
            }
        }

        if array.unique_items {
            for (first, left) in elements.iter().enumerate() {
                for (offset, right) in elements[first + 1..].iter().enumerate() {
                    if json_equal(left, right) {
                        let second = first + 1 + offset;
                        return Err(fail(node, DocumentErrorKind::UniqueItems { first, second }));
                    }
                }
            }
        }

        match &array.items {
            None => Ok(()),
            Some(Items::Single(item)) => {
                for (index, element) in elements.iter().enumerate() {
                    self.node(schema, *item, element)
                        .map_err(|e| e.within(PathSegment::Index(index)))?;
                }
                Ok(())
            }
            Some(Items::Tuple(items)) => {
                for (index, element) in elements.iter().enumerate() {
                    let item = match items.get(index) {
                        Some(item) => *item,
                        None => match array.additional_items {
                            Additional::Unrestricted => break,
                            Additional::Forbidden => {
                                let kind = DocumentErrorKind::AdditionalItems {
                                    allowed: items.len(),
                                };
                                return Err(fail(node, kind));
                            }
                            Additional::Schema(additional) => additional,
                        },
                    };
                    self.node(schema, item, element)
                        .map_err(|e| e.within(PathSegment::Index(index)))?;
                }
                Ok(())
            }
        }
    }
}

fn fail(node: &Node, kind: DocumentErrorKind) -> DocumentError {
    DocumentError::new(kind, node.location())
}

fn check_string(node: &Node, string: &StringNode, text: &str) -> ValidationOutcome {
    let length = text.chars().count();
    if length < string.min_length {
        let kind = DocumentErrorKind::MinimalLength {
            limit: string.min_length,
        };
        return Err(fail(node, kind));
    }
    if let Some(limit) = string.max_length {
        if length > limit {
            return Err(fail(node, DocumentErrorKind::MaximalLength { limit }));
        }
    }
    if let Some(pattern) = &string.pattern {
        if !pattern.matches(text) {
            let kind = DocumentErrorKind::Pattern {
                pattern: pattern.to_string(),
            };
            return Err(fail(node, kind));
        }
    }
    Ok(())
}

fn check_numeric<T: Numeric>(node: &Node, numeric: &NumericNode<T>, instance: &Value) -> ValidationOutcome {
    let Some(value) = T::from_instance(instance) else {
        return Ok(());
    };

    if let Some(minimum) = numeric.minimum {
        let equal = value.same(minimum);
        if (value < minimum && !equal) || (numeric.exclusive_minimum && equal) {
            let kind = DocumentErrorKind::MinimumValue {
                limit: minimum.to_string(),
                exclusive: numeric.exclusive_minimum,
            };
            return Err(fail(node, kind));
        }
    }

    if let Some(maximum) = numeric.maximum {
        let equal = value.same(maximum);
        if (value > maximum && !equal) || (numeric.exclusive_maximum && equal) {
            let kind = DocumentErrorKind::MaximumValue {
                limit: maximum.to_string(),
                exclusive: numeric.exclusive_maximum,
            };
            return Err(fail(node, kind));
        }
    }

    if let Some(divisor) = numeric.divisible_by {
        if !value.is_multiple_of(divisor) {
            let kind = DocumentErrorKind::DivisibleValue {
                divisor: divisor.to_string(),
            };
            return Err(fail(node, kind));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(document: Value) -> Schema {
        Schema::compile(document).unwrap()
    }

    fn kind_of(document: Value, instance: Value) -> Option<&'static str> {
        schema(document)
            .validate(&instance)
            .err()
            .map(|e| e.kind.name())
    }

    #[test]
    fn root_self_reference_terminates() {
        let s = schema(json!({"$ref": "#"}));
        assert!(s.validate(&json!({"anything": [1, 2]})).is_ok());
    }

    #[test]
    fn recursive_self_reference_descends() {
        let s = schema(json!({
            "type": "object",
            "properties": {"child": {"$ref": "#"}, "n": {"type": "integer"}}
        }));
        assert!(s.validate(&json!({"child": {"child": {"n": 1}}})).is_ok());
        let err = s.validate(&json!({"child": {"child": {"n": "x"}}})).unwrap_err();
        assert_eq!(err.pointer(), "/child/child/n");
    }

    #[test]
    fn ref_runs_before_own_checks() {
        let s = schema(json!({
            "id": "root",
            "type": "object",
            "properties": {
                "limited": {"type": "string", "maxLength": 1},
                "inner": {"$ref": "root", "type": "object", "maxProperties": 0}
            }
        }));
        let err = s.validate(&json!({"inner": {"limited": "long"}})).unwrap_err();
        assert_eq!(err.kind.name(), "MaximalLength");
        assert_eq!(err.pointer(), "/inner/limited");
    }

    #[test]
    fn extends_applies_in_addition() {
        let doc = json!({"type": "integer", "extends": {"minimum": 10}});
        assert_eq!(kind_of(doc.clone(), json!(11)), None);
        assert_eq!(kind_of(doc, json!(9)), Some("MinimumValue"));
    }

    #[test]
    fn type_mismatch_reports_both_kinds() {
        let err = schema(json!({"type": "integer"})).validate(&json!(2.5)).unwrap_err();
        assert_eq!(
            err.kind,
            DocumentErrorKind::Type {
                expected: JsonKind::Integer,
                actual: JsonKind::Number
            }
        );
        assert_eq!(err.schema_path, "/");
    }

    #[test]
    fn any_views_carry_enum() {
        let doc = json!({"enum": [1, "a", [true]]});
        assert_eq!(kind_of(doc.clone(), json!("a")), None);
        assert_eq!(kind_of(doc.clone(), json!([true])), None);
        assert_eq!(kind_of(doc.clone(), json!(1.0)), None);
        assert_eq!(kind_of(doc.clone(), json!([false])), Some("EnumValue"));
        assert_eq!(kind_of(doc, json!(null)), Some("EnumValue"));
    }

    #[test]
    fn union_keeps_alternative_failures() {
        let err = schema(json!({"type": [{"type": "string", "minLength": 3}, "null"]}))
            .validate(&json!("ab"))
            .unwrap_err();
        let DocumentErrorKind::NeitherType { causes } = &err.kind else {
            panic!("expected NeitherType");
        };
        assert_eq!(causes.len(), 2);
        assert_eq!(causes[0].kind.name(), "MinimalLength");
        assert_eq!(causes[1].kind.name(), "Type");
    }

    #[test]
    fn custom_type_delegates() {
        let doc = json!({"type": {"type": "string", "pattern": "^x"}});
        assert_eq!(kind_of(doc.clone(), json!("xy")), None);
        assert_eq!(kind_of(doc, json!("yx")), Some("Pattern"));
    }

    #[test]
    fn string_length_counts_characters() {
        let doc = json!({"type": "string", "maxLength": 2});
        assert_eq!(kind_of(doc.clone(), json!("żó")), None);
        assert_eq!(kind_of(doc, json!("żół")), Some("MaximalLength"));
    }

    #[test]
    fn tuple_items_and_additional_items() {
        let doc = json!({
            "type": "array",
            "items": [{"type": "string"}, {"type": "integer"}],
            "additionalItems": false
        });
        assert_eq!(kind_of(doc.clone(), json!(["a", 1])), None);
        assert_eq!(kind_of(doc.clone(), json!(["a"])), None);
        assert_eq!(kind_of(doc.clone(), json!(["a", 1, 2])), Some("AdditionalItems"));
        let err = schema(doc).validate(&json!(["a", "b"])).unwrap_err();
        assert_eq!(err.pointer(), "/1");

        let doc = json!({
            "type": "array",
            "items": [{"type": "string"}],
            "additionalItems": {"type": "boolean"}
        });
        assert_eq!(kind_of(doc.clone(), json!(["a", true, false])), None);
        let err = schema(doc).validate(&json!(["a", true, 3])).unwrap_err();
        assert_eq!(err.pointer(), "/2");
    }

    #[test]
    fn schema_dependency_checks_whole_instance() {
        let doc = json!({
            "type": "object",
            "dependencies": {"card": {"properties": {"billing": {"type": "string", "required": true}}}}
        });
        assert_eq!(kind_of(doc.clone(), json!({"card": 1, "billing": "x"})), None);
        assert_eq!(kind_of(doc.clone(), json!({"other": 1})), None);
        let err = schema(doc).validate(&json!({"card": 1})).unwrap_err();
        assert_eq!(err.kind.name(), "RequiredProperty");
        assert_eq!(err.pointer(), "/");
    }

    #[test]
    fn property_dependencies_name_missing_member() {
        let err = schema(json!({"type": "object", "dependencies": {"a": ["b", "c"]}}))
            .validate(&json!({"a": 1, "b": 2}))
            .unwrap_err();
        assert_eq!(
            err.kind,
            DocumentErrorKind::DependenciesRestrictions {
                property: "a".into(),
                missing: "c".into()
            }
        );
    }

    #[test]
    fn pattern_properties_all_apply() {
        let doc = json!({
            "type": "object",
            "patternProperties": {"^a": {"type": "integer"}, "b$": {"minimum": 10}},
            "additionalProperties": false
        });
        assert_eq!(kind_of(doc.clone(), json!({"ab": 12})), None);
        assert_eq!(kind_of(doc.clone(), json!({"ab": 2})), Some("MinimumValue"));
        assert_eq!(kind_of(doc, json!({"c": 2})), Some("AdditionalProperty"));
    }

    #[test]
    fn disallow_union_elements() {
        let doc = json!({"disallow": ["null", {"type": "integer", "minimum": 5}]});
        assert_eq!(kind_of(doc.clone(), json!(null)), Some("DisallowType"));
        assert_eq!(kind_of(doc.clone(), json!(7)), Some("DisallowType"));
        assert_eq!(kind_of(doc, json!(3)), None);
    }
}
