//! # Generic Dict Entries
//!
//! A generic dict is stored as a JSON object whose keys carry the types of
//! both halves of the entry:
//!
//! ```text
//! key text:  [key tag][value tag]<literal key>
//!
//!   "sbTrue"  -> key 'True' (str),  value read as bool
//!   "if2.5"   -> key 2.5 (float),   value read as int
//!   "bsFalse" -> key False (bool),  value read as str
//! ```
//!
//! | Tag | Key literal | Value node |
//! |-----|-------------|------------|
//! | `s` | UTF-8 text | string node |
//! | `b` | exactly `True` / `False` | truthiness |
//! | `i` | base-10 integer | number truncated to i64 |
//! | `f` | decimal float | number |
//!
//! Anything that does not fit these rules decodes to `Null` and leaves a
//! diagnostic; the rest of the dict is still decoded.
//!
//! A repeated key keeps its first position and takes the last value.

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use crate::parsing::JsonValue;
use crate::records::diagnostics::{DiagnosticKind, Diagnostics};
use crate::types::{DictKey, Value};

pub(crate) fn decode_entries(
    entries: &[(String, JsonValue)],
    position: usize,
    diag: &mut Diagnostics,
) -> Value {
    let mut out: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
    let mut index: HashMap<DictKey<'static>, usize> = HashMap::with_capacity(entries.len());
    for (key, node) in entries {
        let bytes = key.as_bytes();
        let (key_value, value) = match (bytes.first(), bytes.get(1), key.get(2..)) {
            (Some(&key_tag), Some(&value_tag), Some(literal)) => (
                decode_key(key_tag, literal, key, position, diag),
                decode_value(value_tag, node, key, position, diag),
            ),
            _ => {
                diag.report(
                    DiagnosticKind::MalformedKey,
                    position,
                    format!("dict key '{}' lacks type tags", key),
                );
                (Value::Null, Value::Null)
            }
        };
        match DictKey::of(&key_value).map(DictKey::into_owned) {
            Some(projected) => match index.entry(projected) {
                Entry::Occupied(slot) => out[*slot.get()].1 = value,
                Entry::Vacant(slot) => {
                    slot.insert(out.len());
                    out.push((key_value, value));
                }
            },
            None => out.push((key_value, value)),
        }
    }
    Value::Dict(out)
}

fn decode_key(tag: u8, literal: &str, raw: &str, position: usize, diag: &mut Diagnostics) -> Value {
    match tag {
        b's' => Value::Str(literal.to_string()),
        b'b' => match literal {
            "True" => Value::Bool(true),
            "False" => Value::Bool(false),
            _ => {
                diag.report(
                    DiagnosticKind::InvalidBoolKey,
                    position,
                    format!("invalid boolean key '{}'", literal),
                );
                Value::Null
            }
        },
        b'i' => match literal.trim().parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(e) => {
                diag.report(
                    DiagnosticKind::InvalidIntKey,
                    position,
                    format!("invalid integer key '{}': {}", literal, e),
                );
                Value::Null
            }
        },
        b'f' => match literal.trim().parse::<f64>() {
            Ok(f) => Value::Float(f),
            Err(e) => {
                diag.report(
                    DiagnosticKind::InvalidFloatKey,
                    position,
                    format!("invalid float key '{}': {}", literal, e),
                );
                Value::Null
            }
        },
        other => {
            diag.report(
                DiagnosticKind::UnknownKeyTag,
                position,
                format!("unknown key type '{}' in '{}'", other as char, raw),
            );
            Value::Null
        }
    }
}

fn decode_value(tag: u8, node: &JsonValue, raw: &str, position: usize, diag: &mut Diagnostics) -> Value {
    let decoded = match tag {
        b's' => node.as_text().map(|s| Value::Str(s.to_string())),
        b'b' => Some(Value::Bool(node.is_truthy())),
        b'i' => node.as_f64().map(|n| Value::Int(n as i64)),
        b'f' => node.as_f64().map(Value::Float),
        other => {
            diag.report(
                DiagnosticKind::UnknownValueTag,
                position,
                format!("unknown value type '{}' in '{}'", other as char, raw),
            );
            return Value::Null;
        }
    };

    decoded.unwrap_or_else(|| {
        diag.report(
            DiagnosticKind::ValueTypeMismatch,
            position,
            format!(
                "value of '{}' is a {} node, expected tag '{}'",
                raw,
                node.kind(),
                tag as char
            ),
        );
        Value::Null
    })
}
