//! Static classification data shared by the scalar and block validators.
//!
//! A byte's coarse category is a function of its high nibble alone. Only
//! three refinements need the full value: `0xC0`/`0xC1` can only start
//! overlong two-byte sequences, `0xF5..=0xFF` would encode values above
//! U+10FFFF, and the four leads `E0`, `ED`, `F0`, `F4` narrow the range of
//! the byte that follows them (see [`Constraint`]).

use crate::error::Utf8Error;

/// Coarse byte category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Category {
    Ascii,
    Continuation,
    Lead2,
    Lead3,
    Lead4,
    Invalid,
}

impl Category {
    /// Number of continuation bytes a lead of this category requires.
    pub(crate) const fn continuations(self) -> u8 {
        match self {
            Category::Lead2 => 1,
            Category::Lead3 => 2,
            Category::Lead4 => 3,
            Category::Ascii | Category::Continuation | Category::Invalid => 0,
        }
    }
}

#[rustfmt::skip]
pub(crate) const HIGH_NIBBLE: [Category; 16] = [
    // 0x0_ ..= 0x7_
    Category::Ascii, Category::Ascii, Category::Ascii, Category::Ascii,
    Category::Ascii, Category::Ascii, Category::Ascii, Category::Ascii,
    // 0x8_ ..= 0xB_
    Category::Continuation, Category::Continuation,
    Category::Continuation, Category::Continuation,
    // 0xC_, 0xD_
    Category::Lead2, Category::Lead2,
    // 0xE_
    Category::Lead3,
    // 0xF_
    Category::Lead4,
];

/// Category of `byte`, with the overlong and out-of-range leads folded into
/// [`Category::Invalid`].
pub(crate) const fn category(byte: u8) -> Category {
    match byte {
        0xC0 | 0xC1 | 0xF5..=0xFF => Category::Invalid,
        _ => HIGH_NIBBLE[(byte >> 4) as usize],
    }
}

/// Restriction a lead byte places on the first continuation byte after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Constraint {
    /// After `E0`: `80..=9F` would be an overlong three-byte form.
    Overlong3,
    /// After `ED`: `A0..=BF` would encode U+D800..=U+DFFF.
    Surrogate,
    /// After `F0`: `80..=8F` would be an overlong four-byte form.
    Overlong4,
    /// After `F4`: `90..=BF` would exceed U+10FFFF.
    TooLarge,
}

impl Constraint {
    pub(crate) const fn for_lead(lead: u8) -> Option<Constraint> {
        match lead {
            0xE0 => Some(Constraint::Overlong3),
            0xED => Some(Constraint::Surrogate),
            0xF0 => Some(Constraint::Overlong4),
            0xF4 => Some(Constraint::TooLarge),
            _ => None,
        }
    }

    /// Inclusive range accepted for the first continuation byte.
    pub(crate) const fn accepted(self) -> (u8, u8) {
        match self {
            Constraint::Overlong3 => (0xA0, 0xBF),
            Constraint::Surrogate => (0x80, 0x9F),
            Constraint::Overlong4 => (0x90, 0xBF),
            Constraint::TooLarge => (0x80, 0x8F),
        }
    }

    pub(crate) const fn permits(self, byte: u8) -> bool {
        let (lo, hi) = self.accepted();
        lo <= byte && byte <= hi
    }

    pub(crate) const fn violation(self) -> Utf8Error {
        match self {
            Constraint::Overlong3 | Constraint::Overlong4 => Utf8Error::Overlong,
            Constraint::Surrogate => Utf8Error::Surrogate,
            Constraint::TooLarge => Utf8Error::OutOfRange,
        }
    }
}

pub(crate) const NON_ASCII: u16 = 1 << 0;
pub(crate) const CONTINUATION: u16 = 1 << 1;
pub(crate) const LEAD2: u16 = 1 << 2;
pub(crate) const LEAD3: u16 = 1 << 3;
pub(crate) const LEAD4: u16 = 1 << 4;
pub(crate) const LEAD_E0: u16 = 1 << 5;
pub(crate) const LEAD_ED: u16 = 1 << 6;
pub(crate) const LEAD_F0: u16 = 1 << 7;
pub(crate) const LEAD_F4: u16 = 1 << 8;
/// Continuation bytes rejected after `E0`.
pub(crate) const CONT_80_9F: u16 = 1 << 9;
/// Continuation bytes rejected after `ED`.
pub(crate) const CONT_A0_BF: u16 = 1 << 10;
/// Continuation bytes rejected after `F0`.
pub(crate) const CONT_80_8F: u16 = 1 << 11;
/// Continuation bytes rejected after `F4`.
pub(crate) const CONT_90_BF: u16 = 1 << 12;

/// Per-byte flag bits, used by the portable block classifier.
pub(crate) static BYTE_FLAGS: [u16; 256] = build_byte_flags();

const fn byte_flags(byte: u8) -> u16 {
    let mut flags = match category(byte) {
        Category::Ascii => 0,
        Category::Continuation => CONTINUATION,
        Category::Lead2 => LEAD2,
        Category::Lead3 => LEAD3,
        Category::Lead4 => LEAD4,
        Category::Invalid => 0,
    };
    if byte >= 0x80 {
        flags |= NON_ASCII;
    }
    flags |= match Constraint::for_lead(byte) {
        Some(Constraint::Overlong3) => LEAD_E0,
        Some(Constraint::Surrogate) => LEAD_ED,
        Some(Constraint::Overlong4) => LEAD_F0,
        Some(Constraint::TooLarge) => LEAD_F4,
        None => 0,
    };
    if flags & CONTINUATION != 0 {
        flags |= if Constraint::Overlong3.permits(byte) { 0 } else { CONT_80_9F };
        flags |= if Constraint::Surrogate.permits(byte) { 0 } else { CONT_A0_BF };
        flags |= if Constraint::Overlong4.permits(byte) { 0 } else { CONT_80_8F };
        flags |= if Constraint::TooLarge.permits(byte) { 0 } else { CONT_90_BF };
    }
    flags
}

const fn build_byte_flags() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = byte_flags(i as u8);
        i += 1;
    }
    table
}
