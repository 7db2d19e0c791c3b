//! Token verification
//!
//! Redemption interleaves a booking lookup between decoding and the
//! signature check, so each step is exposed on its own as well as through
//! [`TokenVerifier::verify`].

use crate::error::{TokenError, TokenResult};
use crate::freshness::{Freshness, FreshnessPolicy};
use crate::payload::QrPayload;
use crate::signer::TokenSigner;

#[derive(Debug, Clone)]
pub struct TokenVerifier {
    signer: TokenSigner,
    policy: FreshnessPolicy,
}

impl TokenVerifier {
    pub fn new(signer: TokenSigner, policy: FreshnessPolicy) -> Self {
        Self { signer, policy }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    pub fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    pub fn decode(&self, raw: &str) -> TokenResult<QrPayload> {
        QrPayload::parse(raw)
    }

    pub fn check_signature(&self, payload: &QrPayload) -> TokenResult<()> {
        if self.signer.verify_signature(payload) {
            Ok(())
        } else {
            tracing::warn!(
                booking_id = %payload.booking_id,
                slot = payload.ts.get(),
                "Token signature mismatch"
            );
            Err(TokenError::Tampered)
        }
    }

    pub fn check_freshness(&self, payload: &QrPayload, now_ms: i64) -> TokenResult<()> {
        let current = self.signer.window().slot_at(now_ms);
        match self.policy.classify(payload.ts, current) {
            Freshness::Fresh => Ok(()),
            Freshness::Expired => {
                tracing::warn!(
                    booking_id = %payload.booking_id,
                    slot = payload.ts.get(),
                    current = current.get(),
                    "Token expired"
                );
                Err(TokenError::Expired {
                    slot: payload.ts,
                    current,
                })
            }
            Freshness::NotYetValid => {
                tracing::warn!(
                    booking_id = %payload.booking_id,
                    slot = payload.ts.get(),
                    current = current.get(),
                    "Token not yet valid"
                );
                Err(TokenError::NotYetValid {
                    slot: payload.ts,
                    current,
                })
            }
        }
    }

    /// Decode, authenticate, then check freshness
    pub fn verify(&self, raw: &str, now_ms: i64) -> TokenResult<QrPayload> {
        let payload = self.decode(raw)?;
        self.check_signature(&payload)?;
        self.check_freshness(&payload, now_ms)?;
        Ok(payload)
    }
}
