//! Shared harness: runs one input through every code path and compares
//! each verdict with `core::str::from_utf8`.

use alloc::{format, string::String, vec::Vec};

use bstr::BStr;

use crate::{
    classify::Portable, dispatch::validate_blocks, engine::Engine, error::Utf8Error,
};

/// One way of validating a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Path {
    Engine(Engine),
    /// Portable classifier at a width no public engine uses.
    Width(usize),
}

/// Portable widths exercised besides the public engines, including ones
/// that are not powers of two.
pub(crate) const WIDTHS: [usize; 6] = [4, 5, 7, 8, 16, 32];

impl Path {
    pub(crate) fn run(self, bytes: &[u8]) -> Result<(), Utf8Error> {
        // SAFETY: the portable classifier has no CPU requirements.
        unsafe {
            match self {
                Path::Engine(engine) => engine.run(bytes),
                Path::Width(4) => validate_blocks::<Portable<4>>(bytes),
                Path::Width(5) => validate_blocks::<Portable<5>>(bytes),
                Path::Width(7) => validate_blocks::<Portable<7>>(bytes),
                Path::Width(8) => validate_blocks::<Portable<8>>(bytes),
                Path::Width(16) => validate_blocks::<Portable<16>>(bytes),
                Path::Width(32) => validate_blocks::<Portable<32>>(bytes),
                Path::Width(other) => panic!("no portable classifier for width {other}"),
            }
        }
    }

    pub(crate) fn name(self) -> String {
        match self {
            Path::Engine(engine) => format!("{engine:?}"),
            Path::Width(width) => format!("Portable<{width}>"),
        }
    }
}

/// Every path the host can run.
pub(crate) fn paths() -> Vec<Path> {
    Engine::ALL
        .into_iter()
        .filter(|engine| engine.is_available())
        .map(Path::Engine)
        .chain(WIDTHS.into_iter().map(Path::Width))
        .collect()
}

/// Verdict of the standard library, the trusted reference.
pub(crate) fn reference(bytes: &[u8]) -> bool {
    core::str::from_utf8(bytes).is_ok()
}

/// Paths whose verdict differs from the reference.
pub(crate) fn disagreements(bytes: &[u8]) -> Vec<(Path, Result<(), Utf8Error>)> {
    let expected = reference(bytes);
    paths()
        .into_iter()
        .map(|path| (path, path.run(bytes)))
        .filter(|(_, result)| result.is_ok() != expected)
        .collect()
}

/// Asserts that every path and [`crate::valid`] agree with the reference.
///
/// On mismatch the input is written to the temp directory so it can be
/// replayed.
#[track_caller]
pub(crate) fn check(bytes: &[u8]) {
    let expected = reference(bytes);
    let mut failures = disagreements(bytes)
        .into_iter()
        .map(|(path, result)| format!("{}: {result:?}", path.name()))
        .collect::<Vec<_>>();
    if crate::valid(bytes) != expected {
        failures.push(String::from("valid()"));
    }
    if failures.is_empty() {
        return;
    }

    let dump = std::env::temp_dir().join("utf8simd-mismatch.bin");
    let saved = match std::fs::write(&dump, bytes) {
        Ok(()) => format!("input saved to {}", dump.display()),
        Err(err) => format!("could not save input: {err}"),
    };
    panic!(
        "expected {expected} for {:?}; disagreeing: {}; {saved}",
        BStr::new(bytes),
        failures.join(", "),
    );
}

/// Number of quickcheck iterations: more on CI, fewer with `test-fast`.
pub(crate) fn quickcheck_tests() -> u64 {
    if cfg!(miri) || cfg!(feature = "test-fast") {
        10
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}
