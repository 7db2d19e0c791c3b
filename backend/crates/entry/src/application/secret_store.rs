//! Signing secret custody
//!
//! The secret leaves the process only through [`SecretStore::release`],
//! and every release or refusal is written to the `audit` target.

use crate::domain::caller::Caller;
use crate::domain::policy::SecretGrant;
use qr_token::{QrSecret, QrWindow, SecretEnvelope, TokenSigner};

#[derive(Debug, Clone)]
pub struct SecretStore {
    secret: QrSecret,
    cache_ttl_ms: i64,
}

impl SecretStore {
    pub fn new(secret: QrSecret, cache_ttl_ms: i64) -> Self {
        Self {
            secret,
            cache_ttl_ms,
        }
    }

    pub fn signer(&self, window: QrWindow) -> TokenSigner {
        TokenSigner::new(self.secret.clone(), window)
    }

    pub fn release(&self, caller: &Caller, grant: SecretGrant) -> SecretEnvelope {
        tracing::info!(
            target: "audit",
            user_id = %caller.user_id,
            role = %caller.role,
            grant = grant.as_str(),
            ttl_ms = self.cache_ttl_ms,
            "QR secret released"
        );
        SecretEnvelope::new(&self.secret, self.cache_ttl_ms)
    }

    pub fn refuse(&self, caller: &Caller) {
        tracing::warn!(
            target: "audit",
            user_id = %caller.user_id,
            role = %caller.role,
            "QR secret refused"
        );
    }
}
