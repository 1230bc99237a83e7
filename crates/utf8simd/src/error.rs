use thiserror::Error;

/// Why a buffer was rejected.
///
/// Only used internally to short-circuit and for trace logging; the public
/// API collapses every variant into `false`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Utf8Error {
    #[error("byte can never appear in UTF-8")]
    InvalidByte,
    #[error("continuation byte without a lead byte")]
    UnexpectedContinuation,
    #[error("lead byte not followed by enough continuation bytes")]
    MissingContinuation,
    #[error("overlong encoding")]
    Overlong,
    #[error("encoded surrogate code point")]
    Surrogate,
    #[error("code point above U+10FFFF")]
    OutOfRange,
    #[error("input ends inside a multi-byte sequence")]
    Truncated,
}
