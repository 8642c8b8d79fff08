//! Turns raw driver stdout back into a typed value.
//!
//! Drivers print results in loose text form (space-joined sequences, bare
//! scalars, sometimes JSON), so parsing consults the shape of the expected
//! output to resolve ambiguity. This function never fails: unparseable
//! input degrades to a text value that the comparator then reports as a
//! type mismatch.

use serde_json::{Number, Value};

use crate::compare;

/// Parse raw stdout into a typed value under the expected shape.
pub fn normalize(raw_stdout: &str, expected: &Value) -> Value {
    let text = raw_stdout.trim();

    if text.is_empty() {
        return if expected.is_array() {
            Value::Array(Vec::new())
        } else {
            Value::Null
        };
    }

    if text == "null" {
        return Value::Null;
    }

    if let Ok(parsed) = serde_json::from_str::<Value>(text) {
        return reconcile_parsed(parsed, expected);
    }

    match expected {
        Value::Array(_) => parse_sequence_text(text),
        Value::Bool(_) => Value::Bool(text.eq_ignore_ascii_case("true")),
        Value::Number(_) => match text.parse::<f64>() {
            Ok(parsed) => Number::from_f64(parsed)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(text.to_string())),
            Err(_) => Value::String(text.to_string()),
        },
        _ => Value::String(text.to_string()),
    }
}

/// A driver that returns a single-element sequence often prints the bare
/// scalar; wrap it back up when it matches the sole expected element. An
/// empty expected sequence is never "compensated" into a wrap.
fn reconcile_parsed(parsed: Value, expected: &Value) -> Value {
    if parsed.is_array() || parsed.is_object() {
        return parsed;
    }
    if let Value::Array(expected_items) = expected {
        if expected_items.len() == 1 && compare::values_equal(&parsed, &expected_items[0]) {
            return Value::Array(vec![parsed]);
        }
    }
    parsed
}

/// Shape-directed text parsing for an expected sequence: bracketed syntax,
/// then whitespace-separated tokens, then comma-separated tokens, then a
/// lone token wrapped into a one-element sequence.
fn parse_sequence_text(text: &str) -> Value {
    let tokens: Vec<&str> = if text.starts_with('[') {
        let inner = text
            .trim_start_matches('[')
            .trim_end_matches(']')
            .trim();
        if inner.is_empty() {
            Vec::new()
        } else {
            inner.split(',').collect()
        }
    } else if text.contains(char::is_whitespace) {
        text.split_whitespace().collect()
    } else if text.contains(',') {
        text.split(',').collect()
    } else {
        vec![text]
    };

    Value::Array(tokens.iter().map(|tok| coerce_token(tok)).collect())
}

/// Numbers stay numbers; anything else stays text.
fn coerce_token(token: &str) -> Value {
    let token = token.trim();
    if let Ok(int) = token.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = token.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }
    Value::String(token.to_string())
}
