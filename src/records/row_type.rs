//! # Row Schema Types
//!
//! `RowType` describes the shape of an encoded row. It carries no runtime data
//! and is shared freely between decoders.
//!
//! ## Type Categories
//!
//! | Category | Kinds | Storage |
//! |----------|-------|---------|
//! | **Scalar** | Bool, I64, F64 | Value inline in one slot |
//! | **Descriptor** | Str, Opaque, GenericDict, List | Slot holds `(offset, length)` |
//! | **Zero-width** | Null, EmptyTuple, EmptyList, EmptyDict | No bytes at all |
//! | **Composite** | Tuple | Flattened into leaf slots |
//! | **Nullable** | Option | Bitmap bit + inner storage |
//!
//! A `List` whose element kind is zero-width stores its element count in the
//! slot and has no variable-length region.

use std::fmt;

use crate::config::{BITMAP_WORD_BITS, BITMAP_WORD_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowType {
    Bool,
    I64,
    F64,
    Str,
    Opaque,
    Null,
    EmptyTuple,
    EmptyList,
    EmptyDict,
    Tuple(Vec<RowType>),
    List(Box<RowType>),
    GenericDict,
    Option(Box<RowType>),
}

impl RowType {
    /// Builds a tuple type. An empty field list is the `EmptyTuple` kind.
    pub fn tuple(fields: Vec<RowType>) -> Self {
        if fields.is_empty() {
            RowType::EmptyTuple
        } else {
            RowType::Tuple(fields)
        }
    }

    pub fn list(element: RowType) -> Self {
        RowType::List(Box::new(element))
    }

    /// Wraps `inner` as nullable. Already-optional types are returned as is.
    pub fn option(inner: RowType) -> Self {
        match inner {
            RowType::Option(_) => inner,
            other => RowType::Option(Box::new(other)),
        }
    }

    pub fn is_option(&self) -> bool {
        matches!(self, RowType::Option(_))
    }

    /// True for a tuple with at least one field. A literal `Tuple(vec![])`
    /// behaves as the zero-width `EmptyTuple`.
    pub fn is_tuple(&self) -> bool {
        matches!(self, RowType::Tuple(fields) if !fields.is_empty())
    }

    pub fn without_option(&self) -> &RowType {
        match self {
            RowType::Option(inner) => inner,
            other => other,
        }
    }

    pub fn element_type(&self) -> Option<&RowType> {
        match self {
            RowType::List(element) => Some(element),
            _ => None,
        }
    }

    pub fn fields(&self) -> &[RowType] {
        match self {
            RowType::Tuple(fields) => fields,
            _ => &[],
        }
    }

    pub fn is_zero_width(&self) -> bool {
        match self {
            RowType::Null | RowType::EmptyTuple | RowType::EmptyList | RowType::EmptyDict => true,
            RowType::Tuple(fields) => fields.is_empty(),
            _ => false,
        }
    }

    pub fn is_fixed_size(&self) -> bool {
        match self {
            RowType::Bool | RowType::I64 | RowType::F64 => true,
            RowType::Null | RowType::EmptyTuple | RowType::EmptyList | RowType::EmptyDict => true,
            RowType::Str | RowType::Opaque | RowType::GenericDict => false,
            RowType::List(element) => element.is_zero_width(),
            RowType::Tuple(fields) => fields.iter().all(RowType::is_fixed_size),
            RowType::Option(inner) => inner.is_fixed_size(),
        }
    }

    /// Whether the fixed slot of this kind is an `(offset, length)` descriptor.
    pub fn has_descriptor(&self) -> bool {
        match self {
            RowType::Str | RowType::Opaque | RowType::GenericDict => true,
            RowType::List(element) => !element.is_zero_width(),
            _ => false,
        }
    }

    /// Number of bitmap bits this type needs when it heads a row.
    pub fn num_optional_fields(&self) -> usize {
        match self {
            RowType::Option(_) => 1,
            RowType::Tuple(fields) => fields
                .iter()
                .map(|field| match field {
                    RowType::Option(_) => 1,
                    RowType::Tuple(_) => field.num_optional_fields(),
                    _ => 0,
                })
                .sum(),
            _ => 0,
        }
    }

    pub fn bitmap_words(&self) -> usize {
        self.num_optional_fields().div_ceil(BITMAP_WORD_BITS)
    }

    pub fn bitmap_bytes(&self) -> usize {
        self.bitmap_words() * BITMAP_WORD_SIZE
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowType::Bool => write!(f, "bool"),
            RowType::I64 => write!(f, "i64"),
            RowType::F64 => write!(f, "f64"),
            RowType::Str => write!(f, "str"),
            RowType::Opaque => write!(f, "opaque"),
            RowType::Null => write!(f, "null"),
            RowType::EmptyTuple => write!(f, "()"),
            RowType::EmptyList => write!(f, "[]"),
            RowType::EmptyDict => write!(f, "{{}}"),
            RowType::GenericDict => write!(f, "dict"),
            RowType::List(element) => write!(f, "list[{}]", element),
            RowType::Option(inner) => write!(f, "option[{}]", inner),
            RowType::Tuple(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, ")")
            }
        }
    }
}
