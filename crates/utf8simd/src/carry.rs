//! Multi-byte sequence state threaded from one block to the next.
//!
//! A block may end after a lead byte or part-way through its continuation
//! bytes. The obligation left over is a [`CarryState`]: how many
//! continuation bytes the next block must start with, and whether the first
//! of them is further restricted by the lead's exact value. The value lives
//! on the caller's stack for the duration of one validation; nothing is
//! shared between calls.

use crate::{classify::BlockMasks, error::Utf8Error, tables::Constraint};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CarryState {
    /// Continuation bytes still owed, `0..=3`.
    pub(crate) owed: u8,
    /// Set only while the first continuation byte after the lead is owed.
    pub(crate) constraint: Option<Constraint>,
}

impl CarryState {
    pub(crate) const EMPTY: CarryState = CarryState {
        owed: 0,
        constraint: None,
    };

    pub(crate) const fn is_empty(self) -> bool {
        self.owed == 0
    }

    /// State right after reading `lead`.
    pub(crate) const fn after_lead(owed: u8, lead: u8) -> CarryState {
        CarryState {
            owed,
            constraint: Constraint::for_lead(lead),
        }
    }

    /// Consumes one classified block and returns the obligation left for
    /// the next one.
    ///
    /// The leading bytes of the block settle the incoming obligation first,
    /// then the block's own sequences are checked. A sequence that runs
    /// past the end of the block becomes the outgoing state; its lead is
    /// always in the last three positions and, if constrained, in the last.
    pub(crate) fn advance(self, masks: &BlockMasks) -> Result<CarryState, Utf8Error> {
        if masks.non_ascii == 0 {
            return if self.is_empty() {
                Ok(CarryState::EMPTY)
            } else {
                Err(Utf8Error::MissingContinuation)
            };
        }

        if let Some(constraint) = self.constraint {
            // Byte 0 must be a continuation; `structure` reports it if not.
            if masks.continuation & 1 != 0 && masks.rejected_by(constraint) & 1 != 0 {
                return Err(constraint.violation());
            }
        }

        let owed = masks.structure(self.owed)?;

        let full = masks.full();
        if (masks.lead_e0 << 1) & masks.cont_80_9f & full != 0 {
            return Err(Utf8Error::Overlong);
        }
        if (masks.lead_ed << 1) & masks.cont_a0_bf & full != 0 {
            return Err(Utf8Error::Surrogate);
        }
        if (masks.lead_f0 << 1) & masks.cont_80_8f & full != 0 {
            return Err(Utf8Error::Overlong);
        }
        if (masks.lead_f4 << 1) & masks.cont_90_bf & full != 0 {
            return Err(Utf8Error::OutOfRange);
        }

        let last = masks.width - 1;
        let constraint = if (masks.lead_e0 >> last) & 1 != 0 {
            Some(Constraint::Overlong3)
        } else if (masks.lead_ed >> last) & 1 != 0 {
            Some(Constraint::Surrogate)
        } else if (masks.lead_f0 >> last) & 1 != 0 {
            Some(Constraint::Overlong4)
        } else if (masks.lead_f4 >> last) & 1 != 0 {
            Some(Constraint::TooLarge)
        } else {
            None
        };

        Ok(CarryState { owed, constraint })
    }
}
