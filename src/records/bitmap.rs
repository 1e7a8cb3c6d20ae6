//! # Null Bitmap
//!
//! Optional fields are tracked out-of-band in a run of 64-bit little-endian
//! words placed in front of a row's fixed slots.
//!
//! ```text
//! +-----------+-----------+-----+-------------------------+
//! | word 0    | word 1    | ... | fixed slots ...         |
//! | bits 0-63 | bits 64+  |     |                         |
//! +-----------+-----------+-----+-------------------------+
//! ```
//!
//! Bit `i` lives in `word[i / 64]` at bit `i % 64`. A set bit means the field
//! is null. Optional leaves are numbered in leaf-path order starting at 0.
//!
//! A top-level optional value that is not part of a tuple carries its own
//! one-word bitmap: the first 8 bytes of its buffer, covering bit 0 only.

use eyre::{ensure, Result};

use crate::config::{BITMAP_WORD_BITS, BITMAP_WORD_SIZE};
use crate::encoding::ByteSpan;

#[derive(Debug, Clone, Copy)]
pub struct NullBitmap<'a> {
    span: ByteSpan<'a>,
    words: usize,
}

impl<'a> NullBitmap<'a> {
    pub fn new(span: ByteSpan<'a>, words: usize) -> Result<Self> {
        let bytes = words * BITMAP_WORD_SIZE;
        ensure!(
            span.remaining() >= bytes,
            "null bitmap of {} words at position {} exceeds buffer",
            words,
            span.position()
        );
        Ok(Self { span, words })
    }

    /// Splits an embedded single-word bitmap off the front of `span`, returning
    /// the bitmap and the payload that follows it.
    pub fn embedded(span: ByteSpan<'a>) -> Result<(Self, ByteSpan<'a>)> {
        let bitmap = Self::new(span, 1)?;
        let payload = span.advance(BITMAP_WORD_SIZE)?;
        Ok((bitmap, payload))
    }

    pub fn byte_len(&self) -> usize {
        self.words * BITMAP_WORD_SIZE
    }

    pub fn word(&self, word_idx: usize) -> Result<u64> {
        ensure!(
            word_idx < self.words,
            "bitmap word {} out of range (words={})",
            word_idx,
            self.words
        );
        self.span.read_u64_at(word_idx * BITMAP_WORD_SIZE)
    }

    pub fn is_null(&self, bit_idx: usize) -> Result<bool> {
        let word = self.word(bit_idx / BITMAP_WORD_BITS)?;
        Ok(word & (1u64 << (bit_idx % BITMAP_WORD_BITS)) != 0)
    }

    pub fn null_count(&self) -> Result<u32> {
        let mut count = 0;
        for idx in 0..self.words {
            count += self.word(idx)?.count_ones();
        }
        Ok(count)
    }
}
