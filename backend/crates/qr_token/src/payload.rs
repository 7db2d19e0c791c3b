//! QR wire payload
//!
//! The string embedded in the QR code is a compact JSON object with the
//! fields `bookingId`, `ticketId`, `ts` and `sig`, in that order. Already
//! printed codes may carry `ts` as a numeric string, so both forms decode.

use crate::error::{TokenError, TokenResult};
use crate::window::Slot;
use kernel::id::{BookingId, TicketId};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Upper bound on scanned text we attempt to decode
pub const MAX_PAYLOAD_LEN: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub booking_id: BookingId,
    pub ticket_id: TicketId,
    #[serde(deserialize_with = "slot_number_or_string")]
    pub ts: Slot,
    pub sig: String,
}

impl QrPayload {
    pub fn encode(&self) -> TokenResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode scanned text. Every failure is `InvalidFormat`.
    pub fn parse(raw: &str) -> TokenResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TokenError::InvalidFormat("empty".to_string()));
        }
        if raw.len() > MAX_PAYLOAD_LEN {
            return Err(TokenError::InvalidFormat("too long".to_string()));
        }
        serde_json::from_str(raw).map_err(|e| TokenError::InvalidFormat(e.to_string()))
    }
}

fn slot_number_or_string<'de, D>(deserializer: D) -> Result<Slot, D::Error>
where
    D: Deserializer<'de>,
{
    struct SlotVisitor;

    impl Visitor<'_> for SlotVisitor {
        type Value = Slot;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer slot or a string holding one")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Slot, E> {
            Ok(Slot::new(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Slot, E> {
            i64::try_from(v)
                .map(Slot::new)
                .map_err(|_| E::custom("slot out of range"))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Slot, E> {
            if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
                Ok(Slot::new(v as i64))
            } else {
                Err(E::custom("slot must be an integer"))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Slot, E> {
            v.trim()
                .parse::<i64>()
                .map(Slot::new)
                .map_err(|_| E::custom("slot string is not an integer"))
        }
    }

    deserializer.deserialize_any(SlotVisitor)
}
