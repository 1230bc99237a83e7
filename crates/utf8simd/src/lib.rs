//! Strict UTF-8 validation, many bytes at a time.
//!
//! [`valid`] answers one question: is this byte slice well-formed UTF-8 as
//! the Unicode Standard defines it? No decoding, no error offsets. Full
//! blocks are classified with vector instructions when the CPU has them
//! (SSE2 or AVX2 on x86_64, NEON on aarch64); a multi-byte sequence that
//! straddles two blocks is carried across the boundary as a small value, and
//! the final partial block is finished by a byte-at-a-time validator that
//! also serves as the reference behaviour.
//!
//! ```rust
//! assert!(utf8simd::valid("Hello, 世界".as_bytes()));
//! assert!(!utf8simd::valid(&[0x66, 0xFA]));
//! ```

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(test)]
extern crate alloc;

mod carry;
mod classify;
mod dispatch;
mod engine;
mod error;
mod scalar;
mod tables;
mod validator;

#[cfg(test)]
mod tests;

pub use engine::Engine;
pub use validator::{Validator, ValidatorOptions, valid};
