//! Positional, line-oriented encoding of structured test inputs.
//!
//! Every driver reads this format from stdin: lengths and values on separate
//! lines, sequences space-joined. It is a compatibility layer for the
//! no-driver fallback path, not a general serialization format: problems
//! should supply their own driver code instead of relying on shape
//! inference.

use serde_json::Value;

/// Encode a test-case input into the newline-separated token stream the
/// drivers consume positionally.
///
/// Recognized mapping shapes, checked in order:
/// 1. `{nums, target}`: length, values line, target.
/// 2. `{head}`: length, then values line only when non-empty.
/// 3. `{list1, list2}`: length/values pairs, values lines omitted when empty.
/// 4. Any other mapping: fields in their defined order; sequences as
///    length + optional values line, scalars as literal text.
///
/// Non-mapping inputs encode as their literal text plus a trailing newline.
pub fn encode(input: &Value) -> String {
    let Value::Object(fields) = input else {
        return format!("{}\n", token(input));
    };

    let mut out = String::new();

    if let (Some(Value::Array(nums)), Some(target)) = (fields.get("nums"), fields.get("target")) {
        if !target.is_array() {
            out.push_str(&nums.len().to_string());
            out.push('\n');
            out.push_str(&joined(nums));
            out.push('\n');
            out.push_str(&token(target));
            out.push('\n');
            return out;
        }
    }

    if fields.len() == 1 {
        if let Some(Value::Array(head)) = fields.get("head") {
            push_sequence(&mut out, head);
            return out;
        }
    }

    if let (Some(Value::Array(list1)), Some(Value::Array(list2))) =
        (fields.get("list1"), fields.get("list2"))
    {
        push_sequence(&mut out, list1);
        push_sequence(&mut out, list2);
        return out;
    }

    for (_, value) in fields {
        match value {
            Value::Array(items) => push_sequence(&mut out, items),
            scalar => {
                out.push_str(&token(scalar));
                out.push('\n');
            }
        }
    }
    out
}

/// Length line, then a values line unless the sequence is empty: drivers
/// must tolerate the missing line.
fn push_sequence(out: &mut String, items: &[Value]) {
    out.push_str(&items.len().to_string());
    out.push('\n');
    if !items.is_empty() {
        out.push_str(&joined(items));
        out.push('\n');
    }
}

fn joined(items: &[Value]) -> String {
    items.iter().map(token).collect::<Vec<_>>().join(" ")
}

/// Literal text form of one primitive: strings unquoted, everything else in
/// its JSON rendering.
fn token(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
