//! Token signing
//!
//! Signing is a pure function of (secret, bookingId, ticketId, slot); the
//! server issuer and the holder's offline generator share this type.

use crate::batch::{SignedToken, TokenBatch};
use crate::error::TokenResult;
use crate::payload::QrPayload;
use crate::secret::QrSecret;
use crate::window::{QrWindow, Slot};
use kernel::id::{BookingId, TicketId};

/// Exact text covered by the signature
pub fn signing_input(booking_id: &BookingId, ticket_id: &TicketId, slot: Slot) -> String {
    format!("{}:{}:{}", booking_id, ticket_id, slot)
}

#[derive(Debug, Clone)]
pub struct TokenSigner {
    secret: QrSecret,
    window: QrWindow,
}

impl TokenSigner {
    pub fn new(secret: QrSecret, window: QrWindow) -> Self {
        Self { secret, window }
    }

    pub fn window(&self) -> QrWindow {
        self.window
    }

    /// Lowercase hex HMAC-SHA256, 64 chars
    pub fn signature(&self, booking_id: &BookingId, ticket_id: &TicketId, slot: Slot) -> String {
        let input = signing_input(booking_id, ticket_id, slot);
        let mac = platform::crypto::hmac_sha256(self.secret.as_bytes(), input.as_bytes());
        platform::crypto::to_hex(&mac)
    }

    pub fn sign_slot(&self, booking_id: &BookingId, ticket_id: &TicketId, slot: Slot) -> QrPayload {
        QrPayload {
            booking_id: booking_id.clone(),
            ticket_id: ticket_id.clone(),
            ts: slot,
            sig: self.signature(booking_id, ticket_id, slot),
        }
    }

    pub fn token_for_slot(
        &self,
        booking_id: &BookingId,
        ticket_id: &TicketId,
        slot: Slot,
    ) -> TokenResult<SignedToken> {
        let payload = self.sign_slot(booking_id, ticket_id, slot);
        Ok(SignedToken {
            qr_value: payload.encode()?,
            expires_at: self.window.expires_at(slot),
        })
    }

    /// Tokens for the slot containing `now_ms` and the one after it
    pub fn issue(
        &self,
        booking_id: &BookingId,
        ticket_id: &TicketId,
        now_ms: i64,
    ) -> TokenResult<TokenBatch> {
        let current = self.window.slot_at(now_ms);
        let tokens = [current, current.next()]
            .into_iter()
            .map(|slot| self.token_for_slot(booking_id, ticket_id, slot))
            .collect::<TokenResult<Vec<_>>>()?;

        tracing::debug!(
            booking_id = %booking_id,
            slot = current.get(),
            "Signed token batch"
        );

        Ok(TokenBatch {
            window_ms: self.window.window_ms(),
            tokens,
        })
    }

    /// Constant-time check of `payload.sig` against the recomputed signature
    pub fn verify_signature(&self, payload: &QrPayload) -> bool {
        let expected = self.signature(&payload.booking_id, &payload.ticket_id, payload.ts);
        platform::crypto::constant_time_eq(expected.as_bytes(), payload.sig.as_bytes())
    }
}
