//! Byte-at-a-time validator.
//!
//! This is the reference behaviour every block engine must reproduce. It
//! also validates the tail that does not fill a whole block, starting from
//! whatever obligation the last block left behind.

use crate::{
    carry::CarryState,
    error::Utf8Error,
    tables::{Category, category},
};

pub(crate) fn validate(bytes: &[u8]) -> Result<(), Utf8Error> {
    validate_from(bytes, CarryState::EMPTY)
}

pub(crate) fn validate_from(bytes: &[u8], carry: CarryState) -> Result<(), Utf8Error> {
    let mut state = carry;
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        i += 1;

        if !state.is_empty() {
            if category(byte) != Category::Continuation {
                return Err(Utf8Error::MissingContinuation);
            }
            if let Some(constraint) = state.constraint {
                if !constraint.permits(byte) {
                    return Err(constraint.violation());
                }
            }
            state = CarryState {
                owed: state.owed - 1,
                constraint: None,
            };
            continue;
        }

        match category(byte) {
            Category::Ascii => {
                // Skip the rest of an ASCII run in word-sized steps.
                while i + 8 <= bytes.len() && bytes[i..i + 8].is_ascii() {
                    i += 8;
                }
            }
            Category::Continuation => return Err(Utf8Error::UnexpectedContinuation),
            Category::Invalid => return Err(Utf8Error::InvalidByte),
            lead @ (Category::Lead2 | Category::Lead3 | Category::Lead4) => {
                state = CarryState::after_lead(lead.continuations(), byte);
            }
        }
    }

    if state.is_empty() {
        Ok(())
    } else {
        Err(Utf8Error::Truncated)
    }
}
