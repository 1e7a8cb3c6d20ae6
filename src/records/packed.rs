//! # Packed Row Buffers
//!
//! Rows of the same type are often written back to back:
//!
//! ```text
//! +---------+---------+---------+-----
//! | row 0   | row 1   | row 2   | ...
//! +---------+---------+---------+-----
//!  <-size 0-><-size 1->
//! ```
//!
//! There is no per-row header, so the only way to find row `n + 1` is to
//! compute the encoded size of row `n`. [`from_serialized`] does that for one
//! row and [`PackedRows`] iterates a whole buffer, stopping at the first row
//! that does not fit what is left.

use eyre::{ensure, eyre, Result, WrapErr};

use crate::encoding::ByteSpan;
use crate::records::decoder::RowDecoder;
use crate::records::diagnostics::Diagnostics;
use crate::records::row_type::RowType;
use crate::records::size::encoded_size;
use crate::types::Value;

/// Decodes the row at the start of `data` and returns it together with the
/// offset of the next row.
pub fn from_serialized(
    decoder: &RowDecoder,
    data: &[u8],
    capacity: usize,
    row_type: &RowType,
    diag: &mut Diagnostics,
) -> Result<(Value, usize)> {
    let window = &data[..capacity.min(data.len())];
    let size = encoded_size(window, capacity, row_type).ok_or_else(|| {
        eyre!(
            "row of type {} is malformed or exceeds capacity {}",
            row_type,
            capacity
        )
    })?;
    let value = decoder.decode(ByteSpan::new(window), row_type, None, diag)?;
    Ok((value, size))
}

pub struct PackedRows<'a> {
    decoder: &'a RowDecoder,
    data: &'a [u8],
    row_type: &'a RowType,
    offset: usize,
    done: bool,
    diagnostics: Diagnostics,
}

impl<'a> PackedRows<'a> {
    pub fn new(decoder: &'a RowDecoder, data: &'a [u8], row_type: &'a RowType) -> Self {
        Self {
            decoder,
            data,
            row_type,
            offset: 0,
            done: false,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Byte offset of the next row to be decoded.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn next_row(&mut self) -> Result<Value> {
        let data = self.data;
        let rest = &data[self.offset..];
        let (value, size) = from_serialized(
            self.decoder,
            rest,
            rest.len(),
            self.row_type,
            &mut self.diagnostics,
        )
        .wrap_err_with(|| format!("row at offset {}", self.offset))?;
        ensure!(
            size > 0,
            "zero-width rows of type {} cannot be stepped through at offset {}",
            self.row_type,
            self.offset
        );
        self.offset += size;
        Ok(value)
    }
}

impl Iterator for PackedRows<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.data.len() {
            return None;
        }
        let row = self.next_row();
        if row.is_err() {
            self.done = true;
        }
        Some(row)
    }
}
