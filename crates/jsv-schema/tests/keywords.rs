//! Integration test: per-keyword behavior of compiled schemas.
//!
//! Each test compiles a schema through the public facade (meta-schema
//! check included) and asserts the outcome kind and instance pointer.

use jsv_schema::{DocumentErrorKind, Error, Schema, SchemaErrorKind, SchemaOptions};
use serde_json::{json, Value};

fn schema(document: Value) -> Schema {
    Schema::compile(document).unwrap()
}

/// Kind name and pointer of the failure, or `None` when valid.
fn failure(schema: &Schema, instance: &Value) -> Option<(&'static str, String)> {
    schema
        .validate(instance)
        .err()
        .map(|e| (e.kind.name(), e.pointer()))
}

fn fails_with(schema: &Schema, instance: Value, kind: &str, pointer: &str) {
    let (actual_kind, actual_pointer) = failure(schema, &instance)
        .unwrap_or_else(|| panic!("expected {kind} for {instance}, but it validated"));
    assert_eq!(actual_kind, kind, "instance {instance}");
    assert_eq!(actual_pointer, pointer, "instance {instance}");
}

// ── Strings ──────────────────────────────────────────────────────────

#[test]
fn string_length_bounds() {
    let s = schema(json!({"type": "string", "minLength": 2, "maxLength": 4}));
    assert!(s.is_valid(&json!("ab")));
    assert!(s.is_valid(&json!("abcd")));
    fails_with(&s, json!("a"), "MinimalLength", "/");
    fails_with(&s, json!("abcde"), "MaximalLength", "/");
    fails_with(&s, json!(12), "Type", "/");
}

#[test]
fn minimal_length_detail_names_the_path() {
    let s = schema(json!({
        "type": "object",
        "properties": {"foo": {"type": "string", "minLength": 3}}
    }));
    let err = s.validate(&json!({"foo": "ab"})).unwrap_err();
    assert_eq!(err.to_string(), "value length of /foo must be >= 3");
    assert_eq!(err.schema_path, "/foo");
}

#[test]
fn string_pattern_is_a_search() {
    let s = schema(json!({"type": "string", "pattern": "[0-9]+"}));
    assert!(s.is_valid(&json!("abc123def")));
    fails_with(&s, json!("abc"), "Pattern", "/");
}

// ── Numbers ──────────────────────────────────────────────────────────

#[test]
fn integer_exclusive_minimum() {
    let s = schema(json!({"type": "integer", "minimum": 5, "exclusiveMinimum": true}));
    fails_with(&s, json!(5), "MinimumValue", "/");
    assert!(s.is_valid(&json!(6)));
}

#[test]
fn number_exclusive_minimum() {
    let s = schema(json!({"type": "number", "minimum": 5.0, "exclusiveMinimum": true}));
    fails_with(&s, json!(5.0), "MinimumValue", "/");
    assert!(s.is_valid(&json!(5.000_000_1)));
}

#[test]
fn number_bounds_are_inclusive_by_default() {
    let s = schema(json!({"type": "number", "minimum": 1.5, "maximum": 2.5}));
    assert!(s.is_valid(&json!(1.5)));
    assert!(s.is_valid(&json!(2)));
    assert!(s.is_valid(&json!(2.5)));
    fails_with(&s, json!(1.4), "MinimumValue", "/");
    fails_with(&s, json!(2.6), "MaximumValue", "/");
}

#[test]
fn exclusive_maximum_detail() {
    let s = schema(json!({"type": "integer", "maximum": 10, "exclusiveMaximum": true}));
    let err = s.validate(&json!(10)).unwrap_err();
    assert_eq!(err.to_string(), "value of / must be < 10");
    assert!(s.is_valid(&json!(9)));
}

#[test]
fn integer_rejects_floats_number_accepts_integers() {
    let integer = schema(json!({"type": "integer"}));
    fails_with(&integer, json!(1.5), "Type", "/");
    fails_with(&integer, json!(1.0), "Type", "/");
    let number = schema(json!({"type": "number"}));
    assert!(number.is_valid(&json!(1)));
    assert!(number.is_valid(&json!(1.5)));
}

#[test]
fn integer_divisible_by() {
    let s = schema(json!({"type": "integer", "divisibleBy": 3}));
    assert!(s.is_valid(&json!(9)));
    fails_with(&s, json!(10), "DivisibleValue", "/");
}

#[test]
fn integer_divisible_by_large_divisor_is_exact() {
    let s = schema(json!({"type": "integer", "divisibleBy": 1e19}));
    fails_with(&s, json!(5), "DivisibleValue", "/");
    assert!(s.is_valid(&json!(0)));
}

#[test]
fn number_divisible_by_tolerates_rounding() {
    let s = schema(json!({"type": "number", "divisibleBy": 0.01}));
    assert!(s.is_valid(&json!(0.07)));
    assert!(s.is_valid(&json!(19.99)));
    fails_with(&s, json!(0.075), "DivisibleValue", "/");
}

#[test]
fn integer_bounds_cover_unsigned_range() {
    let s = schema(json!({"type": "integer", "minimum": 0}));
    assert!(s.is_valid(&json!(u64::MAX)));
    fails_with(&s, json!(-1), "MinimumValue", "/");
}

#[test]
fn divisible_by_zero_is_rejected_by_meta_schema() {
    let err = Schema::compile(json!({"type": "number", "divisibleBy": 0})).unwrap_err();
    assert!(matches!(err, Error::Document(ref e) if e.pointer() == "/divisibleBy"));

    let options = SchemaOptions::default().with_meta_check(false);
    let err = Schema::compile_with(
        json!({"type": "number", "divisibleBy": 0}),
        std::sync::Arc::new(jsv_schema::NullResolver),
        &options,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Schema(ref e) if e.kind == SchemaErrorKind::IncorrectMember));
}

// ── Arrays ───────────────────────────────────────────────────────────

#[test]
fn array_items_unique() {
    let s = schema(json!({"type": "array", "items": {"type": "integer"}, "uniqueItems": true}));
    assert!(s.is_valid(&json!([1, 2, 3])));
    let err = s.validate(&json!([1, 2, 2])).unwrap_err();
    assert_eq!(err.kind, DocumentErrorKind::UniqueItems { first: 1, second: 2 });
    fails_with(&s, json!([1, "2"]), "Type", "/1");
}

#[test]
fn unique_items_compares_structurally() {
    let s = schema(json!({"type": "array", "uniqueItems": true}));
    fails_with(&s, json!([{"a": 1, "b": 2}, {"b": 2, "a": 1}]), "UniqueItems", "/");
    fails_with(&s, json!([1, 1.0]), "UniqueItems", "/");
    assert!(s.is_valid(&json!([true, false])));
    assert!(s.is_valid(&json!([[1, 2], [2, 1]])));
    assert!(s.is_valid(&json!([1, "1", null])));
}

#[test]
fn array_size_bounds() {
    let s = schema(json!({"type": "array", "minItems": 1, "maxItems": 2}));
    fails_with(&s, json!([]), "MinimalItemsCount", "/");
    fails_with(&s, json!([1, 2, 3]), "MaximalItemsCount", "/");
    assert!(s.is_valid(&json!([1])));
}

#[test]
fn size_bounds_are_checked_before_items() {
    let s = schema(json!({"type": "array", "maxItems": 1, "items": {"type": "string"}}));
    fails_with(&s, json!([1, 2]), "MaximalItemsCount", "/");
}

// ── Unions, disallow, enum ───────────────────────────────────────────

#[test]
fn union_of_type_names() {
    let s = schema(json!({"type": ["string", "integer"]}));
    assert!(s.is_valid(&json!("x")));
    assert!(s.is_valid(&json!(3)));
    fails_with(&s, json!(3.5), "NeitherType", "/");
}

#[test]
fn union_with_schema_alternatives() {
    let s = schema(json!({
        "type": [
            {"type": "string", "maxLength": 1},
            {"type": "array", "items": {"type": "null"}}
        ]
    }));
    assert!(s.is_valid(&json!("x")));
    assert!(s.is_valid(&json!([null, null])));
    let err = s.validate(&json!("xy")).unwrap_err();
    assert!(err.to_string().contains("value length of / must be <= 1"));
}

#[test]
fn disallow_type_name() {
    let s = schema(json!({"disallow": "string"}));
    fails_with(&s, json!("x"), "DisallowType", "/");
    assert!(s.is_valid(&json!(5)));
}

#[test]
fn disallow_schema_object() {
    let s = schema(json!({"disallow": {"type": "string", "maxLength": 2}}));
    fails_with(&s, json!("ab"), "DisallowType", "/");
    assert!(s.is_valid(&json!("abc")));
    assert!(s.is_valid(&json!(["ab"])));
}

#[test]
fn custom_type_schema() {
    let s = schema(json!({"type": {"type": "string", "pattern": "^x"}}));
    assert!(s.is_valid(&json!("xy")));
    fails_with(&s, json!("yx"), "Pattern", "/");
    fails_with(&s, json!(1), "Type", "/");

    let s = schema(json!({
        "type": "object",
        "properties": {"id": {"type": {"type": "integer", "minimum": 1}}}
    }));
    assert!(s.is_valid(&json!({"id": 3})));
    fails_with(&s, json!({"id": 0}), "MinimumValue", "/id");
}

#[test]
fn enum_membership() {
    let s = schema(json!({"type": "string", "enum": ["red", "green"]}));
    assert!(s.is_valid(&json!("red")));
    fails_with(&s, json!("blue"), "EnumValue", "/");

    let s = schema(json!({"type": "boolean", "enum": [true]}));
    assert!(s.is_valid(&json!(true)));
    fails_with(&s, json!(false), "EnumValue", "/");

    let s = schema(json!({"type": "number", "enum": [0.3]}));
    assert!(s.is_valid(&json!(0.1 + 0.2)));
}

#[test]
fn null_and_boolean_type_checks() {
    let s = schema(json!({"type": "null"}));
    assert!(s.is_valid(&json!(null)));
    fails_with(&s, json!(false), "Type", "/");
    let s = schema(json!({"type": "boolean"}));
    assert!(s.is_valid(&json!(false)));
    fails_with(&s, json!(0), "Type", "/");
}

#[test]
fn type_any_accepts_everything() {
    let s = schema(json!({"type": "any"}));
    for instance in [json!(null), json!(1), json!("x"), json!([]), json!({}), json!(1.5)] {
        assert!(s.is_valid(&instance), "{instance}");
    }
}

#[test]
fn untyped_schema_applies_keywords_by_runtime_kind() {
    let s = schema(json!({"minLength": 2, "minimum": 10, "minItems": 1}));
    fails_with(&s, json!("a"), "MinimalLength", "/");
    fails_with(&s, json!(3), "MinimumValue", "/");
    fails_with(&s, json!(3.5), "MinimumValue", "/");
    fails_with(&s, json!([]), "MinimalItemsCount", "/");
    assert!(s.is_valid(&json!({})));
    assert!(s.is_valid(&json!(null)));
}

// ── Objects ──────────────────────────────────────────────────────────

#[test]
fn object_required_and_additional_properties() {
    let s = schema(json!({
        "type": "object",
        "properties": {"a": {"type": "integer", "required": true}},
        "additionalProperties": false
    }));
    assert!(s.is_valid(&json!({"a": 1})));
    fails_with(&s, json!({"a": 1, "b": 2}), "AdditionalProperty", "/b");
    fails_with(&s, json!({}), "RequiredProperty", "/");
}

#[test]
fn member_failures_come_before_required_check() {
    let s = schema(json!({
        "type": "object",
        "properties": {
            "a": {"type": "integer", "required": true},
            "b": {"type": "string"}
        }
    }));
    fails_with(&s, json!({"b": 1}), "Type", "/b");
}

#[test]
fn additional_properties_schema() {
    let s = schema(json!({
        "type": "object",
        "properties": {"id": {"type": "integer"}},
        "additionalProperties": {"type": "string"}
    }));
    assert!(s.is_valid(&json!({"id": 1, "name": "x", "tag": "y"})));
    fails_with(&s, json!({"id": 1, "name": 2}), "Type", "/name");
}

#[test]
fn pattern_properties_exempt_from_additional() {
    let s = schema(json!({
        "type": "object",
        "patternProperties": {"^x-": {"type": "string"}},
        "additionalProperties": false
    }));
    assert!(s.is_valid(&json!({"x-trace": "abc"})));
    fails_with(&s, json!({"x-trace": 1}), "Type", "/x-trace");
    fails_with(&s, json!({"trace": "abc"}), "AdditionalProperty", "/trace");
}

#[test]
fn simple_dependencies() {
    let s = schema(json!({
        "type": "object",
        "dependencies": {"credit_card": "billing_address", "bank": ["iban", "bic"]}
    }));
    assert!(s.is_valid(&json!({"credit_card": 1, "billing_address": "x"})));
    assert!(s.is_valid(&json!({"billing_address": "x"})));
    fails_with(&s, json!({"credit_card": 1}), "DependenciesRestrictions", "/");
    fails_with(&s, json!({"bank": 1, "iban": 2}), "DependenciesRestrictions", "/");
}

#[test]
fn nested_paths_join_members_and_indices() {
    let s = schema(json!({
        "type": "object",
        "properties": {
            "orders": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {"qty": {"type": "integer", "minimum": 1}}
                }
            }
        }
    }));
    let err = s
        .validate(&json!({"orders": [{"qty": 1}, {"qty": 0}]}))
        .unwrap_err();
    assert_eq!(err.pointer(), "/orders/1/qty");
    assert_eq!(err.to_string(), "value of /orders/1/qty must be >= 1");
    assert_eq!(err.schema_path, "/orders/items/qty");
}

#[test]
fn member_names_are_escaped_in_pointers() {
    let s = schema(json!({"type": "object", "additionalProperties": false}));
    fails_with(&s, json!({"a/b": 1}), "AdditionalProperty", "/a~1b");
}
