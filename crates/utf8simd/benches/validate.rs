//! Benchmark – `utf8simd` engines against `core::str::from_utf8`
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use utf8simd::{Engine, Validator, ValidatorOptions};

/// Deterministic payload of exactly `len` bytes built by repeating `unit`.
/// The cut at the end lands on a character boundary, so the payload stays
/// valid UTF-8.
fn payload(unit: &str, len: usize) -> Vec<u8> {
    let mut s = String::with_capacity(len + unit.len());
    while s.len() < len {
        s.push_str(unit);
    }
    let mut end = len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
    s.into_bytes()
}

const MIXES: [(&str, &str); 3] = [
    ("ascii", "0123456789abcdefghijklmnopqrstuvwxyz"),
    ("mixed", "0123456789日本語日本語日本語日abcdefghijklmnopqrstuvwx"),
    ("four_byte", "\u{10FFFF}\u{1F600}\u{10000}\u{1D11E}"),
];

const SIZES: [usize; 5] = [10, 100, 1_024, 64 * 1_024, 1_024 * 1_024];

fn bench_validate(c: &mut Criterion) {
    let engines: Vec<Engine> = Engine::ALL
        .into_iter()
        .filter(|engine| engine.is_available())
        .collect();

    for (mix, unit) in MIXES {
        let mut group = c.benchmark_group(format!("validate_{mix}"));
        for size in SIZES {
            let input = payload(unit, size);
            group.throughput(Throughput::Bytes(input.len() as u64));

            group.bench_with_input(BenchmarkId::new("std", size), &input, |b, input| {
                b.iter(|| black_box(core::str::from_utf8(black_box(input)).is_ok()));
            });

            for &engine in &engines {
                let validator = Validator::new(ValidatorOptions {
                    engine,
                    ..Default::default()
                });
                let name = format!("{engine:?}").to_lowercase();
                group.bench_with_input(BenchmarkId::new(name, size), &input, |b, input| {
                    b.iter(|| black_box(validator.valid(black_box(input))));
                });
            }
        }
        group.finish();
    }
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(1))
            .measurement_time(Duration::from_secs(3));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_validate }
criterion_main!(benches);
