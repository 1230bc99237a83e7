//! Block classifier: per-byte categories of one fixed-width block, packed
//! into bitmasks.
//!
//! Bit `i` of each mask describes byte `i` of the block. Working on masks
//! keeps the structural check independent of how they were produced: the
//! vector classifiers build them with a handful of compares and a movemask,
//! the portable one with a table lookup per byte, and both feed the same
//! [`BlockMasks::structure`] and [`CarryState::advance`] logic.
//!
//! [`CarryState::advance`]: crate::carry::CarryState::advance

use crate::{
    error::Utf8Error,
    tables::{self, BYTE_FLAGS, Constraint},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BlockMasks {
    /// Number of bytes in the block, `4..=32`.
    pub(crate) width: u32,
    pub(crate) non_ascii: u64,
    pub(crate) continuation: u64,
    pub(crate) lead2: u64,
    pub(crate) lead3: u64,
    pub(crate) lead4: u64,
    pub(crate) lead_e0: u64,
    pub(crate) lead_ed: u64,
    pub(crate) lead_f0: u64,
    pub(crate) lead_f4: u64,
    pub(crate) cont_80_9f: u64,
    pub(crate) cont_a0_bf: u64,
    pub(crate) cont_80_8f: u64,
    pub(crate) cont_90_bf: u64,
}

impl BlockMasks {
    pub(crate) const fn ascii(width: u32) -> BlockMasks {
        BlockMasks {
            width,
            non_ascii: 0,
            continuation: 0,
            lead2: 0,
            lead3: 0,
            lead4: 0,
            lead_e0: 0,
            lead_ed: 0,
            lead_f0: 0,
            lead_f4: 0,
            cont_80_9f: 0,
            cont_a0_bf: 0,
            cont_80_8f: 0,
            cont_90_bf: 0,
        }
    }

    /// One bit for every byte of the block.
    pub(crate) const fn full(&self) -> u64 {
        (1u64 << self.width) - 1
    }

    /// Bytes that only look like lead or continuation bytes: `C0`, `C1`
    /// and `F5..=FF`.
    pub(crate) const fn invalid(&self) -> u64 {
        self.non_ascii & !(self.continuation | self.lead2 | self.lead3 | self.lead4)
    }

    /// Continuation bytes that may not follow a lead carrying `constraint`.
    pub(crate) const fn rejected_by(&self, constraint: Constraint) -> u64 {
        match constraint {
            Constraint::Overlong3 => self.cont_80_9f,
            Constraint::Surrogate => self.cont_a0_bf,
            Constraint::Overlong4 => self.cont_80_8f,
            Constraint::TooLarge => self.cont_90_bf,
        }
    }

    /// Checks that the continuation bytes of the block are exactly the ones
    /// required by `owed_in` and by the block's own lead bytes.
    ///
    /// Returns the number of continuation bytes still owed past the end of
    /// the block. Overlapping sequences always surface as a mismatch: the
    /// later lead sits on a position the earlier one requires to be a
    /// continuation.
    pub(crate) fn structure(&self, owed_in: u8) -> Result<u8, Utf8Error> {
        if self.invalid() != 0 {
            return Err(Utf8Error::InvalidByte);
        }

        let required = ((1u64 << owed_in) - 1)
            | (self.lead2 | self.lead3 | self.lead4) << 1
            | (self.lead3 | self.lead4) << 2
            | self.lead4 << 3;
        let in_block = required & self.full();

        if in_block != self.continuation {
            return Err(if self.continuation & !in_block != 0 {
                Utf8Error::UnexpectedContinuation
            } else {
                Utf8Error::MissingContinuation
            });
        }

        // At most one sequence spills, so the spilled bits are contiguous.
        Ok((required >> self.width).count_ones() as u8)
    }

    #[inline(always)]
    fn record(&mut self, index: usize, flags: u16) {
        let bit = 1u64 << index;
        let set = |mask: &mut u64, flag: u16| {
            if flags & flag != 0 {
                *mask |= bit;
            }
        };
        set(&mut self.non_ascii, tables::NON_ASCII);
        set(&mut self.continuation, tables::CONTINUATION);
        set(&mut self.lead2, tables::LEAD2);
        set(&mut self.lead3, tables::LEAD3);
        set(&mut self.lead4, tables::LEAD4);
        set(&mut self.lead_e0, tables::LEAD_E0);
        set(&mut self.lead_ed, tables::LEAD_ED);
        set(&mut self.lead_f0, tables::LEAD_F0);
        set(&mut self.lead_f4, tables::LEAD_F4);
        set(&mut self.cont_80_9f, tables::CONT_80_9F);
        set(&mut self.cont_a0_bf, tables::CONT_A0_BF);
        set(&mut self.cont_80_8f, tables::CONT_80_8F);
        set(&mut self.cont_90_bf, tables::CONT_90_BF);
    }
}

/// Produces [`BlockMasks`] for blocks of a fixed width.
pub(crate) trait Classifier {
    /// Block width in bytes, `4..=32`.
    const WIDTH: usize;

    /// # Safety
    ///
    /// `block.len()` must equal [`Self::WIDTH`] and the running CPU must
    /// support the instruction set the implementation is compiled for.
    unsafe fn classify(block: &[u8]) -> BlockMasks;
}

/// Table-driven classifier for any width in `4..=32`. Runs everywhere.
pub(crate) struct Portable<const W: usize>;

impl<const W: usize> Classifier for Portable<W> {
    const WIDTH: usize = {
        assert!(W >= 4 && W <= 32, "block width must be in 4..=32");
        W
    };

    #[inline(always)]
    unsafe fn classify(block: &[u8]) -> BlockMasks {
        debug_assert_eq!(block.len(), Self::WIDTH);
        #[allow(clippy::cast_possible_truncation)]
        let mut masks = BlockMasks::ascii(Self::WIDTH as u32);
        if block.is_ascii() {
            return masks;
        }
        for (index, &byte) in block.iter().enumerate() {
            masks.record(index, BYTE_FLAGS[usize::from(byte)]);
        }
        masks
    }
}

#[cfg(target_arch = "x86_64")]
pub(crate) use x86::{Avx2, Sse2};

#[cfg(target_arch = "x86_64")]
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
mod x86 {
    use core::arch::x86_64::*;

    use super::{BlockMasks, Classifier};

    /// Flips the sign bit so that signed compares order bytes as unsigned.
    const BIAS: i8 = i8::MIN;

    const fn biased(byte: u8) -> i8 {
        (byte as i8) ^ BIAS
    }

    /// 16-byte blocks with SSE2, the x86_64 baseline.
    pub(crate) struct Sse2;

    impl Classifier for Sse2 {
        const WIDTH: usize = 16;

        #[inline(always)]
        unsafe fn classify(block: &[u8]) -> BlockMasks {
            debug_assert_eq!(block.len(), Self::WIDTH);
            // SAFETY: SSE2 is part of the x86_64 baseline and the block is
            // 16 readable bytes.
            unsafe { classify_sse2(block.as_ptr()) }
        }
    }

    #[target_feature(enable = "sse2")]
    unsafe fn classify_sse2(ptr: *const u8) -> BlockMasks {
        // SAFETY: the caller guarantees 16 readable bytes at `ptr`; every
        // other intrinsic only needs SSE2.
        unsafe {
            let raw = _mm_loadu_si128(ptr.cast::<__m128i>());
            let non_ascii = _mm_movemask_epi8(raw) as u32;
            if non_ascii == 0 {
                return BlockMasks::ascii(16);
            }
            let x = _mm_xor_si128(raw, _mm_set1_epi8(BIAS));

            macro_rules! range {
                ($lo:expr, $hi:expr) => {{
                    let below = _mm_cmplt_epi8(x, _mm_set1_epi8(biased($lo)));
                    let above = _mm_cmpgt_epi8(x, _mm_set1_epi8(biased($hi)));
                    let outside = _mm_movemask_epi8(_mm_or_si128(below, above)) as u32;
                    u64::from(!outside & 0xFFFF)
                }};
            }
            macro_rules! eq {
                ($byte:expr) => {{
                    let needle = _mm_set1_epi8($byte as i8);
                    u64::from(_mm_movemask_epi8(_mm_cmpeq_epi8(raw, needle)) as u32)
                }};
            }

            BlockMasks {
                width: 16,
                non_ascii: u64::from(non_ascii),
                continuation: range!(0x80, 0xBF),
                lead2: range!(0xC2, 0xDF),
                lead3: range!(0xE0, 0xEF),
                lead4: range!(0xF0, 0xF4),
                lead_e0: eq!(0xE0u8),
                lead_ed: eq!(0xEDu8),
                lead_f0: eq!(0xF0u8),
                lead_f4: eq!(0xF4u8),
                cont_80_9f: range!(0x80, 0x9F),
                cont_a0_bf: range!(0xA0, 0xBF),
                cont_80_8f: range!(0x80, 0x8F),
                cont_90_bf: range!(0x90, 0xBF),
            }
        }
    }

    /// 32-byte blocks with AVX2. Only used after runtime detection.
    pub(crate) struct Avx2;

    impl Classifier for Avx2 {
        const WIDTH: usize = 32;

        #[inline(always)]
        unsafe fn classify(block: &[u8]) -> BlockMasks {
            debug_assert_eq!(block.len(), Self::WIDTH);
            // SAFETY: forwarded from the caller: AVX2 is available and the
            // block is 32 readable bytes.
            unsafe { classify_avx2(block.as_ptr()) }
        }
    }

    #[target_feature(enable = "avx2")]
    unsafe fn classify_avx2(ptr: *const u8) -> BlockMasks {
        // SAFETY: the caller guarantees 32 readable bytes at `ptr`; every
        // other intrinsic only needs AVX2.
        unsafe {
            let raw = _mm256_loadu_si256(ptr.cast::<__m256i>());
            let non_ascii = _mm256_movemask_epi8(raw) as u32;
            if non_ascii == 0 {
                return BlockMasks::ascii(32);
            }
            let x = _mm256_xor_si256(raw, _mm256_set1_epi8(BIAS));

            macro_rules! range {
                ($lo:expr, $hi:expr) => {{
                    let below = _mm256_cmpgt_epi8(_mm256_set1_epi8(biased($lo)), x);
                    let above = _mm256_cmpgt_epi8(x, _mm256_set1_epi8(biased($hi)));
                    let outside = _mm256_movemask_epi8(_mm256_or_si256(below, above)) as u32;
                    u64::from(!outside)
                }};
            }
            macro_rules! eq {
                ($byte:expr) => {{
                    let needle = _mm256_set1_epi8($byte as i8);
                    u64::from(_mm256_movemask_epi8(_mm256_cmpeq_epi8(raw, needle)) as u32)
                }};
            }

            BlockMasks {
                width: 32,
                non_ascii: u64::from(non_ascii),
                continuation: range!(0x80, 0xBF),
                lead2: range!(0xC2, 0xDF),
                lead3: range!(0xE0, 0xEF),
                lead4: range!(0xF0, 0xF4),
                lead_e0: eq!(0xE0u8),
                lead_ed: eq!(0xEDu8),
                lead_f0: eq!(0xF0u8),
                lead_f4: eq!(0xF4u8),
                cont_80_9f: range!(0x80, 0x9F),
                cont_a0_bf: range!(0xA0, 0xBF),
                cont_80_8f: range!(0x80, 0x8F),
                cont_90_bf: range!(0x90, 0xBF),
            }
        }
    }
}

#[cfg(target_arch = "aarch64")]
pub(crate) use arm::Neon;

#[cfg(target_arch = "aarch64")]
mod arm {
    use core::arch::aarch64::*;

    use super::{BlockMasks, Classifier};

    /// Lane weights that turn a compare result into a movemask-style bitmask.
    const LANE_BITS: [u8; 16] = [1, 2, 4, 8, 16, 32, 64, 128, 1, 2, 4, 8, 16, 32, 64, 128];

    /// 16-byte blocks with NEON, the aarch64 baseline.
    pub(crate) struct Neon;

    impl Classifier for Neon {
        const WIDTH: usize = 16;

        #[inline(always)]
        unsafe fn classify(block: &[u8]) -> BlockMasks {
            debug_assert_eq!(block.len(), Self::WIDTH);
            // SAFETY: NEON is part of the aarch64 baseline and the block is
            // 16 readable bytes.
            unsafe { classify_neon(block.as_ptr()) }
        }
    }

    #[target_feature(enable = "neon")]
    unsafe fn classify_neon(ptr: *const u8) -> BlockMasks {
        // SAFETY: the caller guarantees 16 readable bytes at `ptr`, and
        // LANE_BITS is 16 readable bytes; every other intrinsic only needs
        // NEON.
        unsafe {
            let x = vld1q_u8(ptr);
            if vmaxvq_u8(x) < 0x80 {
                return BlockMasks::ascii(16);
            }
            let weights = vld1q_u8(LANE_BITS.as_ptr());

            macro_rules! movemask {
                ($lanes:expr) => {{
                    let bits = vandq_u8($lanes, weights);
                    u64::from(vaddv_u8(vget_low_u8(bits)))
                        | u64::from(vaddv_u8(vget_high_u8(bits))) << 8
                }};
            }
            macro_rules! range {
                ($lo:expr, $hi:expr) => {
                    movemask!(vandq_u8(
                        vcgeq_u8(x, vdupq_n_u8($lo)),
                        vcleq_u8(x, vdupq_n_u8($hi))
                    ))
                };
            }
            macro_rules! eq {
                ($byte:expr) => {
                    movemask!(vceqq_u8(x, vdupq_n_u8($byte)))
                };
            }

            BlockMasks {
                width: 16,
                non_ascii: range!(0x80, 0xFF),
                continuation: range!(0x80, 0xBF),
                lead2: range!(0xC2, 0xDF),
                lead3: range!(0xE0, 0xEF),
                lead4: range!(0xF0, 0xF4),
                lead_e0: eq!(0xE0),
                lead_ed: eq!(0xED),
                lead_f0: eq!(0xF0),
                lead_f4: eq!(0xF4),
                cont_80_9f: range!(0x80, 0x9F),
                cont_a0_bf: range!(0xA0, 0xBF),
                cont_80_8f: range!(0x80, 0x8F),
                cont_90_bf: range!(0x90, 0xBF),
            }
        }
    }
}
