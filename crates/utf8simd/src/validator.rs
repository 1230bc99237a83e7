use crate::{engine::Engine, error::Utf8Error};

/// Returns `true` if `data` is well-formed UTF-8.
///
/// Overlong encodings, encoded surrogates, values above U+10FFFF and
/// truncated or interrupted sequences are all rejected. The empty slice is
/// valid. Uses the fastest engine the running CPU supports.
///
/// ```rust
/// assert!(utf8simd::valid("Hello, 世界".as_bytes()));
/// assert!(utf8simd::valid(b""));
/// assert!(!utf8simd::valid(b"\xED\xA0\x80"));
/// ```
#[must_use]
pub fn valid(data: &[u8]) -> bool {
    verdict(Engine::detect().run(data))
}

/// Configuration options for a [`Validator`].
///
/// # Examples
///
/// ```rust
/// use utf8simd::{Engine, Validator, ValidatorOptions};
///
/// let validator = Validator::new(ValidatorOptions {
///     engine: Engine::Scalar,
///     ..Default::default()
/// });
/// assert!(validator.valid("κόσμε".as_bytes()));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ValidatorOptions {
    /// Engine to validate with.
    ///
    /// Engines the host cannot run are replaced by the detected one.
    ///
    /// # Default
    ///
    /// [`Engine::Auto`]
    pub engine: Engine,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Re-validate every input with the scalar validator and panic if the
    /// verdicts differ.
    ///
    /// Available to tests and fuzz targets only.
    pub cross_check: bool,
}

/// A validator pinned to one engine.
///
/// [`valid`] is enough for most callers; a `Validator` is for benchmarks,
/// tests and callers that want to fix the code path.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    engine: Engine,
    #[cfg(any(test, feature = "fuzzing"))]
    cross_check: bool,
}

impl Validator {
    /// Creates a validator, resolving the configured engine against the
    /// running CPU.
    #[must_use]
    pub fn new(options: ValidatorOptions) -> Self {
        Self {
            engine: options.engine.resolve(),
            #[cfg(any(test, feature = "fuzzing"))]
            cross_check: options.cross_check,
        }
    }

    /// The engine this validator runs.
    #[must_use]
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Returns `true` if `data` is well-formed UTF-8. See [`valid`].
    #[must_use]
    pub fn valid(&self, data: &[u8]) -> bool {
        let result = self.engine.run(data);
        self.cross_check(data, result);
        verdict(result)
    }

    #[cfg(any(test, feature = "fuzzing"))]
    fn cross_check(&self, data: &[u8], result: Result<(), Utf8Error>) {
        if !self.cross_check {
            return;
        }
        let reference = crate::scalar::validate(data);
        assert_eq!(
            result.is_ok(),
            reference.is_ok(),
            "{:?} engine disagrees with the scalar validator ({result:?} vs {reference:?})",
            self.engine,
        );
    }

    #[cfg(not(any(test, feature = "fuzzing")))]
    #[inline(always)]
    fn cross_check(&self, _data: &[u8], _result: Result<(), Utf8Error>) {}
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorOptions::default())
    }
}

fn verdict(result: Result<(), Utf8Error>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            log::trace!("rejected input: {err}");
            false
        }
    }
}
