//! Authorization rules

use crate::domain::caller::Caller;
use crate::domain::entity::BookingRecord;

/// Scan, validate and reset: event creator or admin-equivalent role
pub fn can_operate_gate(caller: &Caller, record: &BookingRecord) -> bool {
    caller.is_privileged() || record.event_owner.as_ref() == Some(&caller.user_id)
}

/// Token issuance: additionally the booking holder
pub fn can_issue_tokens(caller: &Caller, record: &BookingRecord) -> bool {
    record.booking.user_id == caller.user_id || can_operate_gate(caller, record)
}

/// Basis on which the signing secret is handed to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretGrant {
    Privileged,
    BookingHolder,
}

impl SecretGrant {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretGrant::Privileged => "privileged",
            SecretGrant::BookingHolder => "booking_holder",
        }
    }
}

pub fn secret_grant(caller: &Caller, booking_count: u64) -> Option<SecretGrant> {
    if caller.is_privileged() {
        Some(SecretGrant::Privileged)
    } else if booking_count > 0 {
        Some(SecretGrant::BookingHolder)
    } else {
        None
    }
}
