//! Rotating QR entry tokens
//!
//! A token proves possession of a booking for one time slot:
//!
//! ```text
//! slot = floor(now_ms / window_ms)
//! sig  = hex(HMAC-SHA256(secret, "{bookingId}:{ticketId}:{slot}"))
//! qr   = {"bookingId":..,"ticketId":..,"ts":slot,"sig":..}
//! ```
//!
//! The same code runs on the server (issuance and redemption) and on the
//! holder's device (offline generation), so every path yields tokens the
//! verifier accepts.
//!
//! ## Example
//! ```rust
//! use kernel::id::{BookingId, TicketId};
//! use qr_token::{QrSecret, QrWindow, TokenSigner, TokenVerifier, FreshnessPolicy};
//!
//! let signer = TokenSigner::new(QrSecret::from_text("s3cret").unwrap(), QrWindow::standard());
//! let booking = BookingId::parse("B123").unwrap();
//! let ticket = TicketId::parse("T9").unwrap();
//!
//! let batch = signer.issue(&booking, &ticket, 1000 * 15_000).unwrap();
//! assert_eq!(batch.tokens.len(), 2);
//! assert_eq!(batch.tokens[0].expires_at, 1001 * 15_000);
//!
//! let verifier = TokenVerifier::new(signer, FreshnessPolicy::default());
//! let payload = verifier.verify(&batch.tokens[0].qr_value, 1000 * 15_000 + 10).unwrap();
//! assert_eq!(payload.booking_id, booking);
//! ```

pub mod batch;
pub mod error;
pub mod freshness;
pub mod payload;
pub mod secret;
pub mod signer;
pub mod verifier;
pub mod window;

pub use batch::{SignedToken, TokenBatch};
pub use error::{TokenError, TokenResult};
pub use freshness::{Freshness, FreshnessPolicy};
pub use payload::QrPayload;
pub use secret::{QrSecret, SECRET_CACHE_TTL_MS, SecretEnvelope};
pub use signer::{TokenSigner, signing_input};
pub use verifier::TokenVerifier;
pub use window::{DEFAULT_WINDOW_MS, QrWindow, Slot};

#[cfg(test)]
mod tests;
