//! # Encoded Size Validation
//!
//! Computes how many bytes one encoded row occupies without decoding it. The
//! result is used both to check that a row fits the capacity it was handed
//! and to find where the next row of a packed buffer begins.
//!
//! ## Size Formula
//!
//! ```text
//! size = bitmap bytes
//!      + fixed bytes            (8, or 8 * leaf count for tuples)
//!      + [8 + varlen length]    (only for types that are not fixed-size)
//! ```
//!
//! The varlen length word is read from directly behind the bitmap and fixed
//! slots. Zero-width types occupy nothing; an optional around a zero-width
//! type, or a null top-level optional, occupies only its bitmap.
//!
//! Every failure (a descriptor pointing past capacity, a varlen region that
//! overflows, a read past the buffer, a negative length) yields `None`. A
//! partial size is never returned.

use crate::config::{SLOT_SIZE, VARLEN_LENGTH_SIZE};
use crate::encoding::ByteSpan;
use crate::records::bitmap::NullBitmap;
use crate::records::row_type::RowType;
use crate::records::tuple_tree::TupleTree;

/// Size of a tuple's fixed slot region, checking that the row's declared
/// varlen region also fits `capacity`.
pub fn tuple_fixed_region_size(data: &[u8], capacity: usize, tuple: &RowType) -> Option<usize> {
    let data = window(data, capacity);
    let tree = TupleTree::new(tuple).ok()?;
    let fixed_bytes = tree.len().checked_mul(SLOT_SIZE)?;
    if fixed_bytes > capacity {
        tracing::debug!(fixed_bytes, capacity, "tuple slots exceed capacity");
        return None;
    }

    if !tuple.is_fixed_size() {
        let bitmap_bytes = tuple.bitmap_bytes();
        let head = bitmap_bytes.checked_add(fixed_bytes)?;
        let varlen_bytes = read_length(data, head)?;
        tracing::debug!(bitmap_bytes, fixed_bytes, varlen_bytes, "tuple capacity check");
        if head.checked_add(varlen_bytes)? > capacity {
            return None;
        }
    }

    Some(fixed_bytes)
}

/// Number of bytes the row at the start of `data` occupies, or `None` when
/// the encoding does not fit `capacity`.
pub fn encoded_size(data: &[u8], capacity: usize, row_type: &RowType) -> Option<usize> {
    if row_type.is_zero_width() {
        return Some(0);
    }
    let data = window(data, capacity);
    let bitmap_bytes = row_type.bitmap_bytes();

    if let RowType::Option(inner) = row_type {
        if inner.is_zero_width() {
            return fits(bitmap_bytes, capacity);
        }
        let (bitmap, _) = NullBitmap::embedded(ByteSpan::new(data)).ok()?;
        if bitmap.is_null(0).ok()? {
            return fits(bitmap_bytes, capacity);
        }
        let inner_size = encoded_size(
            data.get(bitmap_bytes..)?,
            capacity.checked_sub(bitmap_bytes)?,
            inner,
        )?;
        return fits(bitmap_bytes.checked_add(inner_size)?, capacity);
    }

    let mut size = SLOT_SIZE;
    if row_type.has_descriptor() {
        let desc = ByteSpan::new(data).read_descriptor().ok()?;
        if desc.end() > capacity as u64 {
            tracing::debug!(
                offset = desc.offset,
                length = desc.length,
                capacity,
                "descriptor exceeds capacity"
            );
            return None;
        }
    } else if row_type.is_tuple() {
        size = tuple_fixed_region_size(data, capacity, row_type)?;
    }
    size = size.checked_add(bitmap_bytes)?;

    if !row_type.is_fixed_size() {
        let varlen_bytes = read_length(data, size)?;
        size = size
            .checked_add(varlen_bytes)?
            .checked_add(VARLEN_LENGTH_SIZE)?;
    }

    fits(size, capacity)
}

/// Whether the row at the start of `data` is well-formed and fits `capacity`.
pub fn is_capacity_valid(data: &[u8], capacity: usize, row_type: &RowType) -> bool {
    capacity > 0 && encoded_size(data, capacity, row_type).is_some_and(|size| size <= capacity)
}

fn window(data: &[u8], capacity: usize) -> &[u8] {
    &data[..capacity.min(data.len())]
}

fn fits(size: usize, capacity: usize) -> Option<usize> {
    (size <= capacity).then_some(size)
}

fn read_length(data: &[u8], at: usize) -> Option<usize> {
    let word = ByteSpan::new(data).read_u64_at(at).ok()? as i64;
    usize::try_from(word).ok()
}
