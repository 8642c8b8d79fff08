//! Pass/fail judgment between normalized actual output and expected output.
//!
//! Comparison is tolerant where the text pipeline loses precision: numbers
//! match within an absolute tolerance, and a numeric string is coerced
//! before being declared a mismatch.

use proctor_common::DiagnosticKind;
use serde_json::Value;
use std::fmt;

/// Absolute tolerance for numeric comparison.
pub const FLOAT_TOLERANCE: f64 = 1e-9;

/// Equality under numeric tolerance and best-effort string→number coercion.
pub fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a.as_f64(), b.as_f64()),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            match s.trim().parse::<f64>() {
                Ok(parsed) => numbers_equal(Some(parsed), n.as_f64()),
                Err(_) => false,
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
        }
        _ => false,
    }
}

fn numbers_equal(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() <= FLOAT_TOLERANCE,
        _ => false,
    }
}

/// Structured explanation of a mismatch, produced only when
/// [`values_equal`] is false. Downstream feedback generation phrases each
/// case differently, so the four cases stay distinct.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Type { note: String },
    Length { expected_len: usize, actual_len: usize },
    Content { index: usize, expected: Value, actual: Value },
    Value { expected: Value, actual: Value },
}

impl Mismatch {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Mismatch::Type { .. } => DiagnosticKind::TypeMismatch,
            Mismatch::Length { .. } => DiagnosticKind::LengthMismatch,
            Mismatch::Content { .. } => DiagnosticKind::ContentMismatch,
            Mismatch::Value { .. } => DiagnosticKind::ValueMismatch,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Type { note } => write!(f, "type mismatch: {}", note),
            Mismatch::Length {
                expected_len,
                actual_len,
            } => write!(
                f,
                "length mismatch: expected {} elements, got {}",
                expected_len, actual_len
            ),
            Mismatch::Content {
                index,
                expected,
                actual,
            } => write!(
                f,
                "content mismatch at index {}: expected {}, got {}",
                index, expected, actual
            ),
            Mismatch::Value { expected, actual } => {
                write!(f, "value mismatch: expected {}, got {}", expected, actual)
            }
        }
    }
}

/// Explain why `actual` does not equal `expected`. Callers check
/// [`values_equal`] first; on an equal pair this degrades to a generic
/// value mismatch.
pub fn explain(actual: &Value, expected: &Value) -> Mismatch {
    match (actual, expected) {
        (Value::Null, _) => Mismatch::Type {
            note: format!("expected {}, got no value", shape_name(expected)),
        },
        (_, Value::Null) => Mismatch::Type {
            note: format!("expected no value, got {} ({})", shape_name(actual), actual),
        },
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Mismatch::Length {
                    expected_len: b.len(),
                    actual_len: a.len(),
                };
            }
            for (index, (x, y)) in a.iter().zip(b.iter()).enumerate() {
                if !values_equal(x, y) {
                    return Mismatch::Content {
                        index,
                        expected: y.clone(),
                        actual: x.clone(),
                    };
                }
            }
            Mismatch::Value {
                expected: expected.clone(),
                actual: actual.clone(),
            }
        }
        (Value::Array(_), _) => Mismatch::Type {
            note: format!("expected {}, got an array", shape_name(expected)),
        },
        (_, Value::Array(_)) => Mismatch::Type {
            note: format!("expected an array, got a bare value ({})", actual),
        },
        (Value::String(s), Value::Number(_)) => {
            if s.trim().parse::<f64>().is_ok() {
                Mismatch::Value {
                    expected: expected.clone(),
                    actual: actual.clone(),
                }
            } else {
                Mismatch::Type {
                    note: format!("expected a number, got non-numeric text ({:?})", s),
                }
            }
        }
        (a, b) if discriminant_name(a) != discriminant_name(b) => Mismatch::Type {
            note: format!("expected {}, got {}", shape_name(b), shape_name(a)),
        },
        _ => Mismatch::Value {
            expected: expected.clone(),
            actual: actual.clone(),
        },
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "no value",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn discriminant_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        // Numeric strings compare as numbers, so string-vs-number falls
        // through to the value arm above rather than this discriminant check.
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
