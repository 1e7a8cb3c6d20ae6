//! # Value Types
//!
//! Runtime values produced by the row decoder. Schemas live in
//! [`crate::records::row_type`]; this module only holds decoded data.

mod value;

pub(crate) use value::DictKey;
pub use value::Value;
