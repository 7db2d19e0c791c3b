//! Successful-parse outcomes of gate operations
//!
//! A replayed code is a normal result for the operator to judge, not an
//! error.

use crate::domain::entity::BookingSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedemptionOutcome {
    /// This request recorded the entry (or would have, for inspect-only scans)
    Admitted(BookingSummary),
    /// Entry was already recorded
    AlreadyUsed(BookingSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Validated(BookingSummary),
    AlreadyValidated(BookingSummary),
    AlreadyEntered(BookingSummary),
}

impl RedemptionOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, RedemptionOutcome::Admitted(_))
    }

    pub fn booking(&self) -> &BookingSummary {
        match self {
            RedemptionOutcome::Admitted(b) | RedemptionOutcome::AlreadyUsed(b) => b,
        }
    }
}

impl ValidationOutcome {
    pub fn booking(&self) -> &BookingSummary {
        match self {
            ValidationOutcome::Validated(b)
            | ValidationOutcome::AlreadyValidated(b)
            | ValidationOutcome::AlreadyEntered(b) => b,
        }
    }
}
