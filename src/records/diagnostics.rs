//! # Decode Diagnostics
//!
//! Some problems inside a row are recoverable: an unknown dict tag, a bool key
//! that is neither `True` nor `False`, a list of an element kind the format
//! cannot express. The decoder substitutes `Value::Null` for the offending
//! value and records what happened here instead of failing the whole row.
//!
//! Every report is also emitted as a `tracing` warning so embedding
//! applications see it without polling the collector.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    UnknownKeyTag,
    UnknownValueTag,
    MalformedKey,
    InvalidBoolKey,
    InvalidIntKey,
    InvalidFloatKey,
    ValueTypeMismatch,
    UnsupportedListElement,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::UnknownKeyTag => "unknown_key_tag",
            DiagnosticKind::UnknownValueTag => "unknown_value_tag",
            DiagnosticKind::MalformedKey => "malformed_key",
            DiagnosticKind::InvalidBoolKey => "invalid_bool_key",
            DiagnosticKind::InvalidIntKey => "invalid_int_key",
            DiagnosticKind::InvalidFloatKey => "invalid_float_key",
            DiagnosticKind::ValueTypeMismatch => "value_type_mismatch",
            DiagnosticKind::UnsupportedListElement => "unsupported_list_element",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Byte position of the slot or descriptor the problem was found under.
    pub position: usize,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}: {}", self.kind, self.position, self.detail)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, kind: DiagnosticKind, position: usize, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::warn!(%kind, position, detail = %detail, "recovered as null");
        self.entries.push(Diagnostic {
            kind,
            position,
            detail,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }
}
