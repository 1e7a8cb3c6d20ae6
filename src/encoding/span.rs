//! # Bounds-Checked Byte Spans
//!
//! `ByteSpan` is the one way the crate looks at row bytes. It pairs a borrowed
//! buffer with a base position, and every read is checked against the end of
//! the buffer. All positions are absolute within the borrowed buffer, which
//! keeps error messages comparable across nesting levels, while the methods
//! take offsets relative to the current base, which is how the wire format
//! addresses everything.
//!
//! ## Descriptor Layout
//!
//! ```text
//!  63                             32 31                              0
//! +---------------------------------+---------------------------------+
//! | length (u32)                    | offset (u32)                    |
//! +---------------------------------+---------------------------------+
//! ```
//!
//! The offset is measured from the address of the descriptor itself, not from
//! the start of the row.

use eyre::{ensure, eyre, Result};

use crate::config::SLOT_SIZE;

#[derive(Debug, Clone, Copy)]
pub struct ByteSpan<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteSpan<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns a span whose base is `delta` bytes past this one. Moving to the
    /// exact end of the buffer is allowed; zero-width values live there.
    pub fn advance(&self, delta: usize) -> Result<Self> {
        let pos = self
            .pos
            .checked_add(delta)
            .ok_or_else(|| eyre!("span offset overflow at position {}", self.pos))?;
        ensure!(
            pos <= self.data.len(),
            "span offset {} past end of buffer ({} bytes) from position {}",
            delta,
            self.data.len(),
            self.pos
        );
        Ok(Self {
            data: self.data,
            pos,
        })
    }

    /// Like [`advance`](Self::advance) but for offsets stored as signed
    /// 64-bit words.
    pub fn advance_signed(&self, delta: i64) -> Result<Self> {
        let delta = usize::try_from(delta)
            .map_err(|_| eyre!("negative offset {} at position {}", delta, self.pos))?;
        self.advance(delta)
    }

    pub fn bytes(&self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or_else(|| eyre!("read length overflow at position {}", self.pos))?;
        ensure!(
            end <= self.data.len(),
            "read of {} bytes at position {} exceeds buffer of {} bytes",
            len,
            self.pos,
            self.data.len()
        );
        Ok(&self.data[self.pos..end])
    }

    pub fn read_u8(&self) -> Result<u8> {
        Ok(self.bytes(1)?[0])
    }

    pub fn read_u64(&self) -> Result<u64> {
        let bytes: [u8; SLOT_SIZE] = self
            .bytes(SLOT_SIZE)?
            .try_into()
            .map_err(|_| eyre!("insufficient data for u64 at position {}", self.pos))?;
        Ok(u64::from_le_bytes(bytes))
    }

    pub fn read_i64(&self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    pub fn read_f64(&self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_u64_at(&self, offset: usize) -> Result<u64> {
        self.advance(offset)?.read_u64()
    }

    pub fn read_descriptor(&self) -> Result<Descriptor> {
        Ok(Descriptor::from_word(self.read_u64()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub offset: u32,
    pub length: u32,
}

impl Descriptor {
    pub fn from_word(word: u64) -> Self {
        Self {
            offset: word as u32,
            length: (word >> 32) as u32,
        }
    }

    pub fn to_word(self) -> u64 {
        ((self.length as u64) << 32) | self.offset as u64
    }

    /// One past the last payload byte, relative to the descriptor address.
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }

    /// Span positioned at the payload. `at` must be the span the descriptor
    /// was read from.
    pub fn target<'a>(&self, at: &ByteSpan<'a>) -> Result<ByteSpan<'a>> {
        at.advance(self.offset as usize)
    }

    pub fn payload<'a>(&self, at: &ByteSpan<'a>) -> Result<&'a [u8]> {
        self.target(at)?.bytes(self.length as usize)
    }
}
