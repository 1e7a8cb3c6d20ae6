//! Fuzz testing for the row decoder and size validator.
//!
//! Arbitrary row types are paired with arbitrary bytes. Neither sizing nor
//! decoding may panic, and any size reported must fit the capacity it was
//! computed against.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use slotrow::{decode_row, encoded_size, RowType};

#[derive(Debug, Arbitrary)]
struct DecoderInput {
    row_type: FuzzRowType,
    capacity_slack: u8,
    data: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
enum FuzzRowType {
    Bool,
    I64,
    F64,
    Str,
    Opaque,
    Null,
    EmptyTuple,
    EmptyList,
    EmptyDict,
    GenericDict,
    Tuple(Vec<FuzzRowType>),
    List(Box<FuzzRowType>),
    Option(Box<FuzzRowType>),
}

impl FuzzRowType {
    fn to_row_type(&self, depth: usize) -> RowType {
        if depth > 6 {
            return RowType::I64;
        }
        match self {
            FuzzRowType::Bool => RowType::Bool,
            FuzzRowType::I64 => RowType::I64,
            FuzzRowType::F64 => RowType::F64,
            FuzzRowType::Str => RowType::Str,
            FuzzRowType::Opaque => RowType::Opaque,
            FuzzRowType::Null => RowType::Null,
            FuzzRowType::EmptyTuple => RowType::EmptyTuple,
            FuzzRowType::EmptyList => RowType::EmptyList,
            FuzzRowType::EmptyDict => RowType::EmptyDict,
            FuzzRowType::GenericDict => RowType::GenericDict,
            FuzzRowType::Tuple(fields) => RowType::tuple(
                fields
                    .iter()
                    .take(16)
                    .map(|f| f.to_row_type(depth + 1))
                    .collect(),
            ),
            FuzzRowType::List(element) => RowType::list(element.to_row_type(depth + 1)),
            FuzzRowType::Option(inner) => RowType::option(inner.to_row_type(depth + 1)),
        }
    }
}

fuzz_target!(|input: DecoderInput| {
    let row_type = input.row_type.to_row_type(0);
    let capacity = input.data.len().saturating_sub(input.capacity_slack as usize);

    if let Some(size) = encoded_size(&input.data, capacity, &row_type) {
        assert!(size <= capacity);
        let _ = decode_row(&input.data[..capacity], &row_type);
    }
    let _ = decode_row(&input.data, &row_type);
});
