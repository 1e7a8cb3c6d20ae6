//! Row decoding benchmarks
//!
//! These benchmarks measure decoding and size computation for the row shapes
//! that dominate packed buffers: flat scalar tuples, tuples with strings,
//! string lists and generic dicts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use slotrow::encoding::Descriptor;
use slotrow::{encoded_size, PackedRows, RowDecoder, RowType};

fn word(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn desc(buf: &mut Vec<u8>, offset: u32, length: u32) {
    word(buf, Descriptor { offset, length }.to_word());
}

fn scalar_row(width: usize) -> (RowType, Vec<u8>) {
    let ty = RowType::tuple(vec![RowType::I64; width]);
    let mut buf = Vec::new();
    for i in 0..width {
        word(&mut buf, i as u64);
    }
    (ty, buf)
}

fn int_str_row(n: i64, s: &str) -> Vec<u8> {
    let len = s.len() as u32 + 1;
    let mut buf = Vec::new();
    word(&mut buf, n as u64);
    desc(&mut buf, 16, len);
    word(&mut buf, len as u64);
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
    buf
}

fn string_list_row(items: &[&str]) -> Vec<u8> {
    let count = items.len();
    let table = 8 * count;
    let strings: usize = items.iter().map(|s| s.len() + 1).sum();
    let region_len = (8 + table + strings) as u32;

    let mut buf = Vec::new();
    desc(&mut buf, 16, region_len);
    word(&mut buf, region_len as u64);
    word(&mut buf, count as u64);
    let mut text_at = table;
    for (k, s) in items.iter().enumerate() {
        word(&mut buf, (text_at - 8 * k) as u64);
        text_at += s.len() + 1;
    }
    for s in items {
        buf.extend_from_slice(s.as_bytes());
        buf.push(0);
    }
    buf
}

fn bench_scalar_tuples(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_tuple");
    let decoder = RowDecoder::new();

    for width in [1, 8, 32] {
        let (ty, row) = scalar_row(width);
        group.throughput(Throughput::Bytes(row.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode", width), &row, |b, row| {
            b.iter(|| decoder.decode_row(black_box(row), &ty))
        });
        group.bench_with_input(BenchmarkId::new("size", width), &row, |b, row| {
            b.iter(|| encoded_size(black_box(row), row.len(), &ty))
        });
    }

    group.finish();
}

fn bench_nested_tuple(c: &mut Criterion) {
    let ty = RowType::tuple(vec![
        RowType::tuple(vec![
            RowType::tuple(vec![RowType::I64, RowType::I64]),
            RowType::I64,
        ]),
        RowType::tuple(vec![RowType::I64]),
        RowType::option(RowType::I64),
    ]);
    let mut row = Vec::new();
    for v in [0u64, 1, 2, 3, 4, 5] {
        word(&mut row, v);
    }
    let decoder = RowDecoder::new();

    c.bench_function("nested_tuple_decode", |b| {
        b.iter(|| decoder.decode_row(black_box(&row), &ty))
    });
}

fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");
    let decoder = RowDecoder::new();

    let ty = RowType::tuple(vec![RowType::I64, RowType::Str]);
    let row = int_str_row(7, "the quick brown fox jumps over the lazy dog");
    group.bench_function("tuple_with_string", |b| {
        b.iter(|| decoder.decode_row(black_box(&row), &ty))
    });

    let items: Vec<String> = (0..64).map(|i| format!("item-{}", i)).collect();
    let refs: Vec<&str> = items.iter().map(String::as_str).collect();
    let row = string_list_row(&refs);
    let ty = RowType::list(RowType::Str);
    group.throughput(Throughput::Elements(refs.len() as u64));
    group.bench_function("list_of_64", |b| {
        b.iter(|| decoder.decode_row(black_box(&row), &ty))
    });

    group.finish();
}

fn bench_generic_dict(c: &mut Criterion) {
    let json = r#"{"ssname": "row", "ii1": 10, "sbflag": true, "if2": 3.5, "fs0.5": "half"}"#;
    let len = json.len() as u32 + 1;
    let mut row = Vec::new();
    desc(&mut row, 16, len);
    word(&mut row, len as u64);
    row.extend_from_slice(json.as_bytes());
    row.push(0);
    let decoder = RowDecoder::new();

    c.bench_function("generic_dict_decode", |b| {
        b.iter(|| decoder.decode_row(black_box(&row), &RowType::GenericDict))
    });
}

fn bench_packed_rows(c: &mut Criterion) {
    let ty = RowType::tuple(vec![RowType::I64, RowType::Str]);
    let buf: Vec<u8> = (0..1000)
        .flat_map(|i| int_str_row(i, "packed row text"))
        .collect();
    let decoder = RowDecoder::new();

    let mut group = c.benchmark_group("packed_rows");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("iterate_1000", |b| {
        b.iter(|| PackedRows::new(&decoder, black_box(&buf), &ty).count())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_scalar_tuples,
    bench_nested_tuple,
    bench_strings,
    bench_generic_dict,
    bench_packed_rows
);
criterion_main!(benches);
