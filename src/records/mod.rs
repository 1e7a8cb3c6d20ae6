//! # Slot-Encoded Row Decoding
//!
//! This module reads rows written in a compact slot format: nullability is
//! tracked in a leading bitmap, scalars are inlined in 8-byte slots, and
//! variable-length values are reached through relative `(offset, length)`
//! descriptors.
//!
//! ## Row Binary Layout
//!
//! ```text
//! +------------------+------------------+------------------+------------------+
//! | Null Bitmap      | Fixed Slots      | Varlen Length    | Varlen Region    |
//! | [u64; ceil(N/64)]| [u64; leaves]    | (i64)            | [u8; ...]        |
//! +------------------+------------------+------------------+------------------+
//! ```
//!
//! | Component | Type | Description |
//! |-----------|------|-------------|
//! | **Null Bitmap** | `[u64; ceil(N/64)]` | 1 bit per optional leaf. `1` = NULL |
//! | **Fixed Slots** | `[u64; leaves]` | Scalar value or descriptor per leaf |
//! | **Varlen Length** | `i64` | Byte length of the varlen region |
//! | **Varlen Region** | `[u8; ...]` | Strings, lists, dict text, opaque blobs |
//!
//! All integers are little-endian. Zero-width leaves (`Null`, `()`, `[]`,
//! `{}`) have no slot. An optional zero-width leaf still owns a bitmap bit.
//!
//! ## Descriptor Addressing
//!
//! A descriptor stores its offset relative to its own address. The same rule
//! is reused inside list regions, where each element slot is the base for the
//! offset it holds.
//!
//! ## Module Structure
//!
//! - `row_type`: `RowType` schema enum and layout predicates
//! - `tuple_tree`: leaf path indexing for nested tuples
//! - `bitmap`: null bitmap reader
//! - `decoder`: `RowDecoder` producing `Value` trees
//! - `dict`: tagged key/value decoding for generic dicts
//! - `payload`: dict parser and opaque deserializer collaborators
//! - `diagnostics`: recoverable decode problems
//! - `size`: encoded size and capacity validation
//! - `packed`: stepping through buffers of back-to-back rows

pub mod bitmap;
pub mod decoder;
pub mod diagnostics;
mod dict;
pub mod packed;
pub mod payload;
pub mod row_type;
pub mod size;
pub mod tuple_tree;


pub use bitmap::NullBitmap;
pub use decoder::{decode_row, BitRef, Decoded, DecoderBuilder, RowDecoder};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use packed::{from_serialized, PackedRows};
pub use payload::{DictParser, JsonDictParser, OpaqueDeserializer, RawOpaque};
pub use row_type::RowType;
pub use size::{encoded_size, is_capacity_valid, tuple_fixed_region_size};
pub use tuple_tree::{common_prefix_len, Leaf, LeafPath, TupleTree};
