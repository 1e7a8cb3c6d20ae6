//! # Payload Parsing
//!
//! Text parsers for variable-length payloads whose content is not described by
//! the row schema.
//!
//! ## Module Structure
//!
//! - `json`: tokenizer and recursive parser producing an ordered node tree
//!
//! ## Error Handling
//!
//! All parsing functions return `eyre::Result` with the failing position:
//!
//! ```ignore
//! // "unexpected character 'x' at position 5"
//! ```

mod json;

pub use json::{parse_json, unescape_string, JsonParser, JsonValue};
