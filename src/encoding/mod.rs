//! # Encoding Module
//!
//! Low-level byte access shared by the decoder and the size validator:
//!
//! - **Byte spans**: bounds-checked little-endian reads at a movable base
//! - **Descriptors**: the packed `(offset, length)` word locating a
//!   variable-length payload relative to the descriptor's own address

pub mod span;

pub use span::{ByteSpan, Descriptor};
