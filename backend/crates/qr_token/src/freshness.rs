//! Slot acceptance window

use crate::window::Slot;
use serde::{Deserialize, Serialize};

/// How far a token slot may lag or lead the verifier's current slot
///
/// Default accepts one slot either side of the current one: a token that
/// reaches the scanner just after rollover, or one signed by a device whose
/// clock runs slightly ahead of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessPolicy {
    pub max_past_slots: i64,
    pub max_future_slots: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Expired,
    NotYetValid,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            max_past_slots: 1,
            max_future_slots: 1,
        }
    }
}

impl FreshnessPolicy {
    pub fn classify(&self, token_slot: Slot, current: Slot) -> Freshness {
        let age = current.since(token_slot);
        if age > self.max_past_slots {
            Freshness::Expired
        } else if age.saturating_neg() > self.max_future_slots {
            Freshness::NotYetValid
        } else {
            Freshness::Fresh
        }
    }
}
