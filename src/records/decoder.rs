//! # RowDecoder - Schema-Driven Row Decoding
//!
//! This module turns an encoded row plus its [`RowType`] into a [`Value`]
//! tree. Dispatch is a single exhaustive `match` on the schema kind, so a new
//! kind cannot be added without deciding how it decodes.
//!
//! ## Slot Addressing
//!
//! ```text
//! row:    [bitmap words][slot 0][slot 1]...[slot n-1][varlen len][varlen ...]
//!                          │       │
//!                          │       └─ descriptor ──(offset from slot 1)──┐
//!                          └─ i64 inline                                 v
//!                                                              "hi\0" in varlen
//! ```
//!
//! Every descriptor offset is relative to the address of the descriptor
//! itself. List regions reuse the same convention with the element slot as the
//! base.
//!
//! ## Nested Tuples
//!
//! Nested tuples have no slots of their own; their leaves are laid out inline
//! in leaf-path order (see [`TupleTree`]). The decoder walks the leaves once
//! and keeps a stack of open frames, one per nesting level. When the next
//! leaf diverges from the previous one at depth `d`, frames deeper than `d`
//! are closed into their parents and new frames are opened down to the new
//! leaf's parent.
//!
//! ## Safety
//!
//! Reads go through [`ByteSpan`], so a malformed buffer produces an error
//! instead of an out-of-bounds read. Callers that need to know the row fits
//! its capacity before decoding should still run
//! [`encoded_size`](crate::records::size::encoded_size) first.

use std::sync::Arc;

use eyre::{bail, ensure, eyre, Result, WrapErr};

use crate::config::{DEFAULT_MAX_NESTING_DEPTH, DEFAULT_MAX_ZERO_WIDTH_LIST_LEN, SLOT_SIZE};
use crate::encoding::ByteSpan;
use crate::records::bitmap::NullBitmap;
use crate::records::diagnostics::{DiagnosticKind, Diagnostics};
use crate::records::dict;
use crate::records::payload::{DictParser, JsonDictParser, OpaqueDeserializer, RawOpaque};
use crate::records::row_type::RowType;
use crate::records::tuple_tree::{common_prefix_len, TupleTree};
use crate::types::Value;

/// A bit in a row's null bitmap, handed to the decoder of an optional field.
#[derive(Debug, Clone, Copy)]
pub struct BitRef<'a> {
    pub bitmap: NullBitmap<'a>,
    pub index: usize,
}

impl BitRef<'_> {
    pub fn is_null(&self) -> Result<bool> {
        self.bitmap.is_null(self.index)
    }
}

#[derive(Debug, Clone)]
pub struct Decoded {
    pub value: Value,
    pub diagnostics: Diagnostics,
}

struct Frame {
    slot_in_parent: usize,
    items: Vec<Value>,
}

impl Frame {
    fn new(slot_in_parent: usize, width: usize) -> Self {
        Self {
            slot_in_parent,
            items: vec![Value::Null; width],
        }
    }
}

#[derive(Clone)]
pub struct RowDecoder {
    dict_parser: Arc<dyn DictParser + Send + Sync>,
    opaque: Arc<dyn OpaqueDeserializer + Send + Sync>,
    max_depth: usize,
    max_zero_width_list_len: usize,
}

impl std::fmt::Debug for RowDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowDecoder")
            .field("max_depth", &self.max_depth)
            .field("max_zero_width_list_len", &self.max_zero_width_list_len)
            .finish_non_exhaustive()
    }
}

impl Default for RowDecoder {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RowDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::default()
    }

    /// Decodes a whole row starting at the first byte of `data`.
    pub fn decode_row(&self, data: &[u8], row_type: &RowType) -> Result<Decoded> {
        let mut diagnostics = Diagnostics::new();
        let value = self.decode(ByteSpan::new(data), row_type, None, &mut diagnostics)?;
        Ok(Decoded { value, diagnostics })
    }

    /// Decodes one value at `span`. `bit` is the value's null bit when it is
    /// an optional field of an enclosing row; a top-level optional passes
    /// `None` and reads its embedded bitmap.
    pub fn decode<'a>(
        &self,
        span: ByteSpan<'a>,
        row_type: &RowType,
        bit: Option<BitRef<'a>>,
        diag: &mut Diagnostics,
    ) -> Result<Value> {
        self.decode_at(span, row_type, bit, 0, diag)
    }

    fn check_depth(&self, depth: usize, span: &ByteSpan<'_>) -> Result<()> {
        ensure!(
            depth < self.max_depth,
            "nesting depth {} exceeds maximum {} at position {}",
            depth,
            self.max_depth,
            span.position()
        );
        Ok(())
    }

    fn decode_at<'a>(
        &self,
        span: ByteSpan<'a>,
        row_type: &RowType,
        bit: Option<BitRef<'a>>,
        depth: usize,
        diag: &mut Diagnostics,
    ) -> Result<Value> {
        match row_type {
            RowType::Null => Ok(Value::Null),
            RowType::EmptyTuple => Ok(Value::empty_tuple()),
            RowType::EmptyList => Ok(Value::empty_list()),
            RowType::EmptyDict => Ok(Value::empty_dict()),
            RowType::Tuple(fields) if fields.is_empty() => Ok(Value::empty_tuple()),
            RowType::Bool => Ok(Value::Bool(span.read_u8()? != 0)),
            RowType::I64 => Ok(Value::Int(span.read_i64()?)),
            RowType::F64 => Ok(Value::Float(span.read_f64()?)),
            RowType::Str => Ok(Value::Str(decode_str(span)?)),
            RowType::Opaque => {
                let desc = span.read_descriptor()?;
                let payload = desc.payload(&span)?;
                self.opaque
                    .deserialize(payload)
                    .wrap_err_with(|| format!("opaque payload at position {}", span.position()))
            }
            RowType::Tuple(_) => self.decode_tuple(span, row_type, depth, diag),
            RowType::List(element) => self.decode_list(span, element, depth, diag),
            RowType::GenericDict => self.decode_dict(span, diag),
            RowType::Option(inner) => self.decode_option(span, inner, bit, depth, diag),
        }
    }

    fn decode_option<'a>(
        &self,
        span: ByteSpan<'a>,
        inner: &RowType,
        bit: Option<BitRef<'a>>,
        depth: usize,
        diag: &mut Diagnostics,
    ) -> Result<Value> {
        let (bit, payload) = match bit {
            Some(bit) => (bit, span),
            None => {
                let (bitmap, payload) = NullBitmap::embedded(span)?;
                (BitRef { bitmap, index: 0 }, payload)
            }
        };

        if bit.is_null()? {
            return Ok(Value::Null);
        }
        self.decode_at(payload, inner, None, depth, diag)
    }

    fn decode_tuple<'a>(
        &self,
        row: ByteSpan<'a>,
        row_type: &RowType,
        depth: usize,
        diag: &mut Diagnostics,
    ) -> Result<Value> {
        self.check_depth(depth, &row)?;

        let tree = TupleTree::new(row_type)?;
        let bitmap = NullBitmap::new(row, row_type.bitmap_words())?;
        let fixed = row.advance(bitmap.byte_len())?;

        let mut frames = vec![Frame::new(0, row_type.fields().len())];
        let mut prev: &[usize] = &[];
        let mut bit_index = 0;
        let mut cursor = 0;

        for leaf in tree.leaves() {
            let curr = leaf.path.as_slice();
            // Leaf paths never prefix one another, so the shared prefix ends
            // strictly before the last index of `curr`.
            let split = common_prefix_len(prev, curr);
            while frames.len() > split + 1 {
                close_frame(&mut frames)?;
            }
            for level in split..curr.len() - 1 {
                let sub_type = tree
                    .field_type(&curr[..=level])
                    .ok_or_else(|| eyre!("no sub-tuple at path {:?}", &curr[..=level]))?;
                self.check_depth(depth + frames.len(), &row)?;
                frames.push(Frame::new(curr[level], sub_type.fields().len()));
            }

            let bit = leaf.row_type.is_option().then_some(BitRef {
                bitmap,
                index: bit_index,
            });
            let slot = fixed.advance(cursor)?;
            let value = self
                .decode_at(slot, leaf.row_type, bit, depth + frames.len(), diag)
                .wrap_err_with(|| {
                    format!(
                        "field {:?} of type {} at position {}",
                        curr,
                        leaf.row_type,
                        slot.position()
                    )
                })?;

            if leaf.row_type.is_option() {
                bit_index += 1;
            }
            if !leaf.row_type.without_option().is_zero_width() {
                cursor += SLOT_SIZE;
            }

            let idx = curr[curr.len() - 1];
            let top = frames
                .last_mut()
                .ok_or_else(|| eyre!("tuple frame stack underflow"))?;
            let item = top
                .items
                .get_mut(idx)
                .ok_or_else(|| eyre!("field index {} out of range in tuple frame", idx))?;
            *item = value;

            prev = curr;
        }

        while frames.len() > 1 {
            close_frame(&mut frames)?;
        }
        let root = frames
            .pop()
            .ok_or_else(|| eyre!("tuple frame stack underflow"))?;
        Ok(Value::Tuple(root.items))
    }

    fn decode_list<'a>(
        &self,
        span: ByteSpan<'a>,
        element: &RowType,
        depth: usize,
        diag: &mut Diagnostics,
    ) -> Result<Value> {
        self.check_depth(depth, &span)?;

        if element.is_zero_width() {
            let count = read_count(&span)?;
            ensure!(
                count <= self.max_zero_width_list_len,
                "list of {} zero-width elements at position {} exceeds limit {}",
                count,
                span.position(),
                self.max_zero_width_list_len
            );
            let constant = self.decode_at(span, element, None, depth + 1, diag)?;
            return Ok(Value::List(vec![constant; count]));
        }

        let desc = span.read_descriptor()?;
        let region = desc.target(&span)?;
        let count = read_count(&region)?;
        let slots = count
            .checked_mul(SLOT_SIZE)
            .ok_or_else(|| eyre!("list element count {} overflows", count))?;
        ensure!(
            slots <= region.remaining().saturating_sub(SLOT_SIZE),
            "list of {} elements at position {} exceeds buffer",
            count,
            region.position()
        );

        let supported = matches!(
            element,
            RowType::I64 | RowType::F64 | RowType::Bool | RowType::Str | RowType::GenericDict
        ) || element.is_tuple();
        if !supported {
            diag.report(
                DiagnosticKind::UnsupportedListElement,
                span.position(),
                format!("list element type {} is not supported", element),
            );
            return Ok(Value::List(vec![Value::Null; count]));
        }

        let mut items = Vec::with_capacity(count);
        let mut cursor = region.advance(SLOT_SIZE)?;
        for i in 0..count {
            let value = match element {
                RowType::I64 => Value::Int(cursor.read_i64()?),
                RowType::F64 => Value::Float(cursor.read_f64()?),
                RowType::Bool => Value::Bool(cursor.read_i64()? != 0),
                RowType::Str => {
                    Value::Str(decode_list_str(cursor, i, count, desc.length as i64)?)
                }
                RowType::GenericDict => self.decode_dict(cursor, diag)?,
                // Composite elements restart at their own slot address.
                _ => self.decode_tuple(cursor, element, depth + 1, diag)?,
            };
            items.push(value);
            cursor = cursor.advance(SLOT_SIZE)?;
        }

        Ok(Value::List(items))
    }

    fn decode_dict(&self, span: ByteSpan<'_>, diag: &mut Diagnostics) -> Result<Value> {
        let desc = span.read_descriptor()?;
        let mut payload = desc.payload(&span)?;
        while let [rest @ .., 0] = payload {
            payload = rest;
        }

        let Some(root) = self.dict_parser.parse(payload) else {
            bail!(
                "could not parse dict payload of {} bytes at position {}",
                desc.length,
                span.position()
            );
        };
        let Some(entries) = root.entries() else {
            bail!(
                "dict payload at position {} is a {}, expected an object",
                span.position(),
                root.kind()
            );
        };

        Ok(dict::decode_entries(entries, span.position(), diag))
    }
}

fn close_frame(frames: &mut Vec<Frame>) -> Result<()> {
    let frame = frames
        .pop()
        .ok_or_else(|| eyre!("tuple frame stack underflow"))?;
    let parent = frames
        .last_mut()
        .ok_or_else(|| eyre!("closed the root tuple frame"))?;
    let item = parent
        .items
        .get_mut(frame.slot_in_parent)
        .ok_or_else(|| eyre!("sub-tuple index {} out of range", frame.slot_in_parent))?;
    *item = Value::Tuple(frame.items);
    Ok(())
}

fn read_count(span: &ByteSpan<'_>) -> Result<usize> {
    let count = span.read_i64()?;
    usize::try_from(count)
        .map_err(|_| eyre!("negative element count {} at position {}", count, span.position()))
}

fn decode_utf8(bytes: &[u8], position: usize) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| eyre!("invalid UTF-8 in string at position {}: {}", position, e))
}

/// Reads a terminated string through the descriptor in `span`.
fn decode_str(span: ByteSpan<'_>) -> Result<String> {
    let desc = span.read_descriptor()?;
    let target = desc.target(&span)?;
    let text_len = (desc.length as usize).saturating_sub(1);
    decode_utf8(target.bytes(text_len)?, target.position())
}

/// Reads element `i` of a string list. `slot` holds the element's offset,
/// measured from the slot itself; the strings are packed after the offset
/// table, so consecutive offsets differ by the previous string's length minus
/// one slot.
fn decode_list_str(slot: ByteSpan<'_>, i: usize, count: usize, region_len: i64) -> Result<String> {
    let offset = slot.read_i64()?;
    let len = if i + 1 == count {
        let table = (count as i64)
            .checked_mul(SLOT_SIZE as i64)
            .ok_or_else(|| eyre!("string list offset table overflows"))?;
        region_len
            .checked_sub(table)
            .and_then(|rest| rest.checked_sub(offset))
    } else {
        let next = slot.read_u64_at(SLOT_SIZE)? as i64;
        offset
            .checked_sub(SLOT_SIZE as i64)
            .and_then(|shifted| next.checked_sub(shifted))
    };

    let len = len.ok_or_else(|| eyre!("string list length overflow at position {}", slot.position()))?;
    ensure!(
        len >= 1,
        "string list element {} at position {} has invalid length {}",
        i,
        slot.position(),
        len
    );

    let target = slot.advance_signed(offset)?;
    decode_utf8(target.bytes(len as usize - 1)?, target.position())
}

pub struct DecoderBuilder {
    dict_parser: Arc<dyn DictParser + Send + Sync>,
    opaque: Arc<dyn OpaqueDeserializer + Send + Sync>,
    max_depth: usize,
    max_zero_width_list_len: usize,
}

impl Default for DecoderBuilder {
    fn default() -> Self {
        Self {
            dict_parser: Arc::new(JsonDictParser),
            opaque: Arc::new(RawOpaque),
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_zero_width_list_len: DEFAULT_MAX_ZERO_WIDTH_LIST_LEN,
        }
    }
}

impl DecoderBuilder {
    pub fn dict_parser(mut self, parser: Arc<dyn DictParser + Send + Sync>) -> Self {
        self.dict_parser = parser;
        self
    }

    pub fn opaque_deserializer(mut self, opaque: Arc<dyn OpaqueDeserializer + Send + Sync>) -> Self {
        self.opaque = opaque;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Largest element count accepted for a list of zero-width elements.
    /// Such a list occupies one slot whatever its count, so this is the only
    /// bound on the allocation it causes.
    pub fn max_zero_width_list_len(mut self, len: usize) -> Self {
        self.max_zero_width_list_len = len;
        self
    }

    pub fn build(self) -> RowDecoder {
        RowDecoder {
            dict_parser: self.dict_parser,
            opaque: self.opaque,
            max_depth: self.max_depth,
            max_zero_width_list_len: self.max_zero_width_list_len,
        }
    }
}

/// Decodes one row with the default collaborators.
pub fn decode_row(data: &[u8], row_type: &RowType) -> Result<Decoded> {
    RowDecoder::default().decode_row(data, row_type)
}
