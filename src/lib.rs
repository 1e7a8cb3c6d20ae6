//! # slotrow - Schema-Driven Binary Row Decoding
//!
//! slotrow reads rows written in a compact slot encoding and turns them into
//! dynamically-typed [`Value`] trees, given the row's [`RowType`]. It can also
//! compute how many bytes a row occupies, which is how rows in a packed
//! buffer are stepped through and how a buffer is validated before decoding.
//!
//! - **Bounds-checked reads**: every byte access goes through a checked span
//! - **No shared state**: decoding is a pure function of bytes and schema
//! - **Recoverable diagnostics**: unknown tags become `Null`, not failures
//!
//! ## Quick Start
//!
//! ```ignore
//! use slotrow::{decode_row, encoded_size, RowType, Value};
//!
//! let row_type = RowType::tuple(vec![RowType::I64, RowType::Str]);
//! let size = encoded_size(&buf, buf.len(), &row_type).ok_or_else(|| eyre::eyre!("bad row"))?;
//! let decoded = decode_row(&buf[..size], &row_type)?;
//! assert_eq!(decoded.value, Value::Tuple(vec![Value::Int(7), Value::from("hi")]));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   RowDecoder  │  encoded_size        │
//! ├─────────────────────────────────────┤
//! │ TupleTree │ NullBitmap │ dict tags  │
//! ├─────────────────────────────────────┤
//! │  ByteSpan / Descriptor (encoding)   │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`records`]: schema types, decoder, size validator, packed rows
//! - [`encoding`]: bounds-checked spans and descriptors
//! - [`types`]: decoded `Value`
//! - [`parsing`]: JSON parser for generic dict payloads
//! - [`config`]: layout constants

pub mod config;
pub mod encoding;
pub mod parsing;
pub mod records;
pub mod types;

pub use records::{
    decode_row, encoded_size, from_serialized, is_capacity_valid, tuple_fixed_region_size,
    Decoded, Diagnostic, DiagnosticKind, Diagnostics, PackedRows, RowDecoder, RowType, TupleTree,
};
pub use types::Value;
