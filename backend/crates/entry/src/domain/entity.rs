//! Domain Entities

use kernel::id::{BookingId, EventId, TicketId, UserId};
use serde::Serialize;

/// Entry-relevant stage of a booking
///
/// `Unscanned -> Validated (optional) -> Scanned`; only an operator reset
/// leaves `Scanned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStage {
    Unscanned,
    Validated,
    Scanned,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryState {
    pub validated: bool,
    pub validated_at_ms: Option<i64>,
    pub scanned: bool,
    pub scanned_at_ms: Option<i64>,
}

impl EntryState {
    pub fn stage(&self) -> EntryStage {
        if self.scanned {
            EntryStage::Scanned
        } else if self.validated {
            EntryStage::Validated
        } else {
            EntryStage::Unscanned
        }
    }
}

/// Guarded state change applied atomically by the booking store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTransition {
    /// Record entry; requires `scanned = false`
    Scan { at_ms: i64 },
    /// Gate pre-check; requires `scanned = false AND validated = false`
    Validate { at_ms: i64 },
    /// Undo a pre-check; requires `scanned = false AND validated = true`
    ClearValidation,
    /// Operator fix of a mis-scan; requires `scanned = true`
    ResetScan,
}

/// Precondition half of a conditional update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryCondition {
    pub scanned: bool,
    pub validated: Option<bool>,
}

impl EntryCondition {
    pub fn matches(&self, state: &EntryState) -> bool {
        state.scanned == self.scanned && self.validated.is_none_or(|v| v == state.validated)
    }
}

impl EntryTransition {
    pub fn expected(&self) -> EntryCondition {
        match self {
            EntryTransition::Scan { .. } => EntryCondition {
                scanned: false,
                validated: None,
            },
            EntryTransition::Validate { .. } => EntryCondition {
                scanned: false,
                validated: Some(false),
            },
            EntryTransition::ClearValidation => EntryCondition {
                scanned: false,
                validated: Some(true),
            },
            EntryTransition::ResetScan => EntryCondition {
                scanned: true,
                validated: None,
            },
        }
    }

    /// Write the new fields; callers check `expected()` first
    pub fn apply(&self, state: &mut EntryState) {
        match *self {
            EntryTransition::Scan { at_ms } => {
                state.scanned = true;
                state.scanned_at_ms = Some(at_ms);
            }
            EntryTransition::Validate { at_ms } => {
                state.validated = true;
                state.validated_at_ms = Some(at_ms);
            }
            EntryTransition::ClearValidation => {
                state.validated = false;
                state.validated_at_ms = None;
            }
            EntryTransition::ResetScan => *state = EntryState::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntryTransition::Scan { .. } => "scan",
            EntryTransition::Validate { .. } => "validate",
            EntryTransition::ClearValidation => "clear_validation",
            EntryTransition::ResetScan => "reset_scan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub ticket_id: TicketId,
    pub quantity: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub entry: EntryState,
}

/// Booking joined with the event and ticket details a gate needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRecord {
    pub booking: Booking,
    pub event_name: Option<String>,
    pub event_owner: Option<UserId>,
    pub ticket_name: Option<String>,
}

impl BookingRecord {
    pub fn summary(&self) -> BookingSummary {
        let b = &self.booking;
        BookingSummary {
            id: b.id.clone(),
            customer_name: b.customer_name.clone(),
            customer_email: b.customer_email.clone(),
            quantity: b.quantity,
            event_name: self.event_name.clone(),
            ticket_name: self.ticket_name.clone(),
            validated_at: b.entry.validated_at_ms,
            scanned_at: b.entry.scanned_at_ms,
        }
    }
}

/// What the gate operator sees after a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: BookingId,
    pub customer_name: String,
    pub customer_email: String,
    pub quantity: i32,
    pub event_name: Option<String>,
    pub ticket_name: Option<String>,
    pub validated_at: Option<i64>,
    pub scanned_at: Option<i64>,
}
