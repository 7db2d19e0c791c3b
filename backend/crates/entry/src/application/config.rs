//! Application Configuration
//!
//! Configuration for the entry application layer.

use crate::application::secret_store::SecretStore;
use qr_token::{FreshnessPolicy, QrSecret, QrWindow, SECRET_CACHE_TTL_MS, TokenSigner, TokenVerifier};
use std::time::Duration;

/// Entry application configuration
#[derive(Debug, Clone)]
pub struct EntryConfig {
    /// Token rotation window
    pub window: QrWindow,
    /// Accepted slot lag/lead at the gate
    pub freshness: FreshnessPolicy,
    /// Deployment signing secret
    pub qr_secret: QrSecret,
    /// How long devices may cache the signing secret
    pub secret_cache_ttl: Duration,
    /// Cookie carrying the auth session token
    pub session_cookie_name: String,
    /// HMAC key of auth session tokens (32 bytes)
    pub session_secret: [u8; 32],
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl EntryConfig {
    pub fn new(qr_secret: QrSecret, session_secret: [u8; 32]) -> Self {
        Self {
            window: QrWindow::standard(),
            freshness: FreshnessPolicy::default(),
            qr_secret,
            secret_cache_ttl: Duration::from_millis(SECRET_CACHE_TTL_MS as u64),
            session_cookie_name: "auth_session".to_string(),
            session_secret,
        }
    }

    /// Create config with random secrets (for development)
    pub fn development() -> Self {
        let mut session_secret = [0u8; 32];
        session_secret.copy_from_slice(&platform::crypto::random_bytes(32));
        Self::new(QrSecret::generate(), session_secret)
    }

    pub fn secret_cache_ttl_ms(&self) -> i64 {
        self.secret_cache_ttl.as_millis() as i64
    }

    pub fn signer(&self) -> TokenSigner {
        TokenSigner::new(self.qr_secret.clone(), self.window)
    }

    pub fn verifier(&self) -> TokenVerifier {
        TokenVerifier::new(self.signer(), self.freshness)
    }

    pub fn secret_store(&self) -> SecretStore {
        SecretStore::new(self.qr_secret.clone(), self.secret_cache_ttl_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EntryConfig::default();
        assert_eq!(config.window.window_ms(), 15_000);
        assert_eq!(config.freshness, FreshnessPolicy::default());
        assert_eq!(config.secret_cache_ttl_ms(), SECRET_CACHE_TTL_MS);
        assert_eq!(config.session_cookie_name, "auth_session");
    }

    #[test]
    fn test_development_secrets_differ() {
        let a = EntryConfig::development();
        let b = EntryConfig::development();
        assert_ne!(a.qr_secret, b.qr_secret);
        assert_ne!(a.session_secret, b.session_secret);
    }
}
