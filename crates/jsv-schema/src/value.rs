//! # Value Access — Typed View over `serde_json::Value`
//!
//! Thin helpers the compiler and validator use to classify JSON values,
//! read numbers in the two numeric domains, and compare values
//! structurally.
//!
//! ## Numeric Domains
//!
//! JSON draft-03 distinguishes `integer` from `number`. A value is an
//! integer when the JSON parser produced an integral representation
//! (`5`, `-3`, `18446744073709551615`); `5.0` is a number, never an
//! integer. Integers are read into `i128` so that the full `i64` and `u64`
//! ranges compare exactly. Numbers are read as `f64` and compared with a
//! relative tolerance.

use std::fmt;

use serde_json::Value;

/// Relative tolerance used for floating-point equality.
pub const RELATIVE_TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// Runtime kind of a JSON value.
///
/// `Integer` and `Number` are disjoint: a number with an integral
/// representation is an `Integer`, everything else is a `Number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl JsonKind {
    /// Classify a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
        }
    }

    /// The draft-03 type keyword naming this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read an integral JSON number exactly.
///
/// Returns `None` for floats (including `5.0`) and non-numbers.
pub fn as_integer(value: &Value) -> Option<i128> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Read any JSON number as `f64`.
pub fn as_float(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Floating-point equality within [`RELATIVE_TOLERANCE`].
pub fn approx_eq(left: f64, right: f64) -> bool {
    if left == right {
        return true;
    }
    let scale = left.abs().max(right.abs()).max(1.0);
    (left - right).abs() <= RELATIVE_TOLERANCE * scale
}

/// Whether `quotient` lies within tolerance of its nearest integer.
pub fn is_approx_integral(quotient: f64) -> bool {
    if !quotient.is_finite() {
        return false;
    }
    approx_eq(quotient, quotient.round())
}

/// Structural equality used by `uniqueItems` and `enum`.
///
/// - objects: same member names with pairwise equal values, order-independent;
/// - arrays: same length with positionally equal elements;
/// - integers compare exactly, any comparison involving a float uses
///   [`approx_eq`];
/// - `true` and `false` are distinct.
pub fn json_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter()
                    .all(|(name, lv)| r.get(name).is_some_and(|rv| json_equal(lv, rv)))
        }
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(lv, rv)| json_equal(lv, rv))
        }
        (Value::String(l), Value::String(r)) => l == r,
        (Value::Number(_), Value::Number(_)) => match (as_integer(left), as_integer(right)) {
            (Some(l), Some(r)) => l == r,
            _ => match (as_float(left), as_float(right)) {
                (Some(l), Some(r)) => approx_eq(l, r),
                _ => false,
            },
        },
        (Value::Bool(l), Value::Bool(r)) => l == r,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}
