//! # Payload Collaborators
//!
//! Two kinds of variable-length payload are not described by the row schema
//! and are handed to pluggable collaborators:
//!
//! | Kind | Trait | Default |
//! |------|-------|---------|
//! | Generic dict text | [`DictParser`] | [`JsonDictParser`] |
//! | Opaque serialized object | [`OpaqueDeserializer`] | [`RawOpaque`] |
//!
//! Decoders hold them as `Arc<dyn Trait + Send + Sync>` so a single decoder can
//! be shared across threads.

use eyre::Result;

use crate::parsing::{parse_json, JsonValue};
use crate::types::Value;

pub trait DictParser {
    /// Parses a dict payload into a node tree. A payload that cannot be
    /// parsed yields `None`.
    fn parse(&self, payload: &[u8]) -> Option<JsonValue>;
}

pub trait OpaqueDeserializer {
    fn deserialize(&self, payload: &[u8]) -> Result<Value>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDictParser;

impl DictParser for JsonDictParser {
    fn parse(&self, payload: &[u8]) -> Option<JsonValue> {
        let text = match std::str::from_utf8(payload) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(error = %e, "dict payload is not UTF-8");
                return None;
            }
        };
        match parse_json(text) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(error = %e, "dict payload rejected by JSON parser");
                None
            }
        }
    }
}

/// Carries opaque payloads through unchanged as `Value::Opaque`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawOpaque;

impl OpaqueDeserializer for RawOpaque {
    fn deserialize(&self, payload: &[u8]) -> Result<Value> {
        Ok(Value::Opaque(payload.to_vec()))
    }
}
