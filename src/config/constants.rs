//! # Row Layout Constants
//!
//! Every byte offset computed anywhere in the crate is a multiple of one of
//! the constants below. They are grouped by the region of the row they
//! describe.
//!
//! ## Dependency Graph
//!
//! ```text
//! SLOT_SIZE (8 bytes)
//!       │
//!       ├─> DESCRIPTOR_SIZE (must be ==)
//!       │     A descriptor packs a u32 offset and a u32 length into one slot.
//!       │
//!       ├─> VARLEN_LENGTH_SIZE (must be ==)
//!       │     The varlen region is prefixed by one i64 length word.
//!       │
//!       └─> BITMAP_WORD_SIZE (must be ==)
//!             Bitmap words sit in front of the fixed slots and share their
//!             alignment.
//!
//! BITMAP_WORD_BITS (64)
//!       │
//!       └─> BITMAP_WORD_SIZE * 8 (must be ==)
//! ```
//!
//! ## Modifying Constants
//!
//! These values are part of the wire format produced elsewhere. Changing any
//! of them makes previously written rows unreadable.

// ============================================================================
// SLOT GEOMETRY
// ============================================================================

/// Width of one fixed-region slot. Scalars, descriptors and in-slot list
/// counts each occupy exactly one slot.
pub const SLOT_SIZE: usize = 8;

/// Width of an `(offset, length)` descriptor.
pub const DESCRIPTOR_SIZE: usize = 8;

/// Width of the length word that precedes the variable-length region.
pub const VARLEN_LENGTH_SIZE: usize = 8;

const _: () = assert!(
    DESCRIPTOR_SIZE == SLOT_SIZE,
    "descriptors must fit exactly into one fixed slot"
);

const _: () = assert!(
    VARLEN_LENGTH_SIZE == SLOT_SIZE,
    "varlen length word must be slot-sized"
);

// ============================================================================
// NULL BITMAP GEOMETRY
// ============================================================================

/// Number of optional fields tracked by one bitmap word.
pub const BITMAP_WORD_BITS: usize = 64;

/// Width of one bitmap word in bytes.
pub const BITMAP_WORD_SIZE: usize = 8;

const _: () = assert!(
    BITMAP_WORD_SIZE * 8 == BITMAP_WORD_BITS,
    "bitmap word size must match its bit count"
);

const _: () = assert!(
    BITMAP_WORD_SIZE == SLOT_SIZE,
    "bitmap words share slot alignment"
);

// ============================================================================
// DECODER LIMITS
// ============================================================================

/// Default maximum nesting depth of tuples, lists and dicts within one row.
/// Guards the recursive decoder against stack exhaustion on hostile input.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 16;

const _: () = assert!(
    DEFAULT_MAX_NESTING_DEPTH >= 1,
    "a decoder must accept at least the top-level value"
);

/// Default cap on the element count of a list whose elements are zero-width.
/// The count sits inline in a single slot, so without a cap 8 bytes of input
/// could request an arbitrarily large allocation.
pub const DEFAULT_MAX_ZERO_WIDTH_LIST_LEN: usize = 1 << 16;
