//! # Decoded Value Representation
//!
//! `Value` is what the row decoder produces: a fully materialized,
//! dynamically-typed tree. It is deliberately independent of any host runtime;
//! embedding code converts it into native tuples, lists and maps.
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | Produced by |
//! |---------|-----------|-------------|
//! | Null | - | `Null` kind, null optionals, recovered diagnostics |
//! | Bool | bool | `Bool` slots |
//! | Int | i64 | `I64` slots |
//! | Float | f64 | `F64` slots |
//! | Str | String | `Str` descriptors |
//! | Tuple | Vec<Value> | `Tuple`, `EmptyTuple` |
//! | List | Vec<Value> | `List`, `EmptyList` |
//! | Dict | Vec<(Value, Value)> | `GenericDict`, `EmptyDict` |
//! | Opaque | Vec<u8> | `Opaque` payloads |
//!
//! ## Dict Semantics
//!
//! Dict keys may be floats, so entries are kept as a vector of pairs rather
//! than a hash map. Inserting through [`Value::dict_insert`] replaces an
//! existing equal key, and equality between two dicts ignores entry order.
//!
//! Bulk construction and dict equality go through [`DictKey`], a hashable
//! projection of scalar keys, so both stay linear in the number of entries.
//! `dict_insert` and `dict_get` scan the entries.

use std::borrow::Cow;
use std::fmt;

use hashbrown::HashMap;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Opaque(Vec<u8>),
}

impl Value {
    pub fn empty_tuple() -> Self {
        Value::Tuple(Vec::new())
    }

    pub fn empty_list() -> Self {
        Value::List(Vec::new())
    }

    pub fn empty_dict() -> Self {
        Value::Dict(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a dict entry by key. Returns `None` for non-dict values.
    pub fn dict_get(&self, key: &Value) -> Option<&Value> {
        self.as_dict()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Inserts into a dict, replacing the value of an equal key. No-op on
    /// anything that is not a dict.
    pub fn dict_insert(&mut self, key: Value, value: Value) {
        if let Value::Dict(entries) = self {
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
    }
}

/// Hashable projection of a scalar dict key. Two keys project to the same
/// `DictKey` exactly when they compare equal as values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum DictKey<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(Cow<'a, str>),
}

impl<'a> DictKey<'a> {
    /// `None` for composite keys and for NaN, which equals nothing.
    pub(crate) fn of(value: &'a Value) -> Option<Self> {
        match value {
            Value::Null => Some(DictKey::Null),
            Value::Bool(b) => Some(DictKey::Bool(*b)),
            Value::Int(i) => Some(DictKey::Int(*i)),
            Value::Float(f) if f.is_nan() => None,
            // 0.0 == -0.0
            Value::Float(f) if *f == 0.0 => Some(DictKey::Float(0.0f64.to_bits())),
            Value::Float(f) => Some(DictKey::Float(f.to_bits())),
            Value::Str(s) => Some(DictKey::Str(Cow::Borrowed(s))),
            _ => None,
        }
    }

    pub(crate) fn into_owned(self) -> DictKey<'static> {
        match self {
            DictKey::Null => DictKey::Null,
            DictKey::Bool(b) => DictKey::Bool(b),
            DictKey::Int(i) => DictKey::Int(i),
            DictKey::Float(bits) => DictKey::Float(bits),
            DictKey::Str(s) => DictKey::Str(Cow::Owned(s.into_owned())),
        }
    }
}

fn dict_entries_eq(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let index: Option<HashMap<DictKey<'_>, &Value>> = b
        .iter()
        .map(|(k, v)| DictKey::of(k).map(|k| (k, v)))
        .collect();
    match index {
        Some(index) if index.len() == b.len() => a.iter().all(|(k, v)| {
            DictKey::of(k)
                .and_then(|k| index.get(&k))
                .is_some_and(|bv| *bv == v)
        }),
        _ => a
            .iter()
            .all(|(k, v)| b.iter().any(|(bk, bv)| bk == k && bv == v)),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => dict_entries_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Opaque(bytes) => write!(f, "<opaque {} bytes>", bytes.len()),
        }
    }
}
