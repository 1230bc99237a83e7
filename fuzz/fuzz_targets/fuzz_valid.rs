#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use utf8simd::{Engine, Validator, ValidatorOptions};

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Sequences that sit right at the edge of a validity rule.
static EDGE_TABLE: &[&[u8]] = &[
    b"\xC2\x80",
    b"\xDF\xBF",
    b"\xC1\xBF",
    b"\xE0\xA0\x80",
    b"\xE0\x9F\xBF",
    b"\xED\x9F\xBF",
    b"\xED\xA0\x80",
    b"\xEF\xBF\xBF",
    b"\xF0\x90\x80\x80",
    b"\xF0\x8F\xBF\xBF",
    b"\xF4\x8F\xBF\xBF",
    b"\xF4\x90\x80\x80",
    b"\xF5\x80\x80\x80",
];

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// One building block of a generated input.
#[derive(Debug, Arbitrary)]
enum Piece {
    Char(char),
    AsciiRun(u8),
    Edge(u8),
    Truncated(char),
    Byte(u8),
}

impl Piece {
    fn write(&self, out: &mut Vec<u8>) {
        let mut buf = [0u8; 4];
        match *self {
            Piece::Char(c) => out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes()),
            Piece::AsciiRun(len) => out.extend((0..len).map(|i| b'a' + i % 26)),
            Piece::Edge(index) => {
                out.extend_from_slice(EDGE_TABLE[usize::from(index) % EDGE_TABLE.len()]);
            }
            Piece::Truncated(c) => {
                let encoded = c.encode_utf8(&mut buf).as_bytes();
                out.extend_from_slice(&encoded[..encoded.len() - 1]);
            }
            Piece::Byte(b) => out.push(b),
        }
    }
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if !seed.is_multiple_of(10) {
        return fuzzer_mutate(data, size, max_size);
    }

    // Build a fresh input from structured pieces, so that most inputs are
    // close to valid and errors land at arbitrary block offsets.
    let entropy: Vec<u8> = with_rng(|rng| {
        let len = rng.random_range(0..=max_size.max(1));
        (0..len).map(|_| rng.random::<u8>()).collect()
    });
    let pieces = Vec::<Piece>::arbitrary(&mut Unstructured::new(&entropy)).unwrap_or_default();

    let mut out = Vec::with_capacity(max_size);
    for piece in &pieces {
        piece.write(&mut out);
        if out.len() >= max_size {
            break;
        }
    }
    let len = out.len().min(max_size);
    data[..len].copy_from_slice(&out[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn validate(data: &[u8]) {
    let expected = std::str::from_utf8(data).is_ok();
    for engine in Engine::ALL.into_iter().filter(|engine| engine.is_available()) {
        let validator = Validator::new(ValidatorOptions {
            engine,
            cross_check: true,
        });
        if validator.valid(data) != expected {
            // Keep the input around for replay; the fuzzer also saves its
            // own crash artifact.
            let _ = std::fs::write("fuzz-mismatch.bin", data);
            panic!("{engine:?} returned {} for {data:?}", !expected);
        }
    }
    assert_eq!(utf8simd::valid(data), expected);
}

fuzz_target!(|data: &[u8]| validate(data));
