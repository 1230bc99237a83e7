//! Splits a buffer into full blocks plus a tail and runs each through the
//! matching validator.

use crate::{carry::CarryState, classify::Classifier, error::Utf8Error, scalar};

/// Runs every full block through `C` and the tail through the scalar
/// validator, seeded with the carry of the last block.
///
/// Stops at the first rejected block.
///
/// # Safety
///
/// The running CPU must support the instruction set `C` is compiled for.
#[inline(always)]
pub(crate) unsafe fn validate_blocks<C: Classifier>(bytes: &[u8]) -> Result<(), Utf8Error> {
    let mut blocks = bytes.chunks_exact(C::WIDTH);
    let mut carry = CarryState::EMPTY;
    for block in &mut blocks {
        // SAFETY: `chunks_exact` yields blocks of exactly `C::WIDTH` bytes;
        // CPU support is forwarded from the caller.
        let masks = unsafe { C::classify(block) };
        carry = carry.advance(&masks)?;
    }
    scalar::validate_from(blocks.remainder(), carry)
}

pub(crate) fn portable(bytes: &[u8]) -> Result<(), Utf8Error> {
    // SAFETY: the portable classifier has no CPU requirements.
    unsafe { validate_blocks::<crate::classify::Portable<16>>(bytes) }
}

#[cfg(target_arch = "x86_64")]
pub(crate) fn sse2(bytes: &[u8]) -> Result<(), Utf8Error> {
    // SAFETY: SSE2 is part of the x86_64 baseline.
    unsafe { validate_blocks::<crate::classify::Sse2>(bytes) }
}

/// # Safety
///
/// The running CPU must support AVX2.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn avx2(bytes: &[u8]) -> Result<(), Utf8Error> {
    // SAFETY: AVX2 support is forwarded from the caller.
    unsafe { validate_blocks::<crate::classify::Avx2>(bytes) }
}

#[cfg(target_arch = "aarch64")]
pub(crate) fn neon(bytes: &[u8]) -> Result<(), Utf8Error> {
    // SAFETY: NEON is part of the aarch64 baseline.
    unsafe { validate_blocks::<crate::classify::Neon>(bytes) }
}
