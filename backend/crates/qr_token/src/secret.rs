//! Deployment signing secret

use crate::error::{TokenError, TokenResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

/// Lifetime of a secret cached on a holder's device (30 days)
pub const SECRET_CACHE_TTL_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// HMAC key shared by every token of a deployment
///
/// Wiped from memory on drop; `Debug` never prints the bytes.
#[derive(Clone)]
pub struct QrSecret(Zeroizing<Vec<u8>>);

impl QrSecret {
    pub fn from_bytes(bytes: Vec<u8>) -> TokenResult<Self> {
        if bytes.is_empty() {
            return Err(TokenError::InvalidSecret("empty"));
        }
        Ok(Self(Zeroizing::new(bytes)))
    }

    /// Key is the UTF-8 encoding of the configured text
    pub fn from_text(text: &str) -> TokenResult<Self> {
        Self::from_bytes(text.as_bytes().to_vec())
    }

    pub fn from_base64(encoded: &str) -> TokenResult<Self> {
        let bytes = platform::crypto::from_base64(encoded.trim())
            .map_err(|_| TokenError::InvalidSecret("not base64"))?;
        Self::from_bytes(bytes)
    }

    /// 32 random bytes
    pub fn generate() -> Self {
        Self(Zeroizing::new(platform::crypto::random_bytes(32)))
    }

    pub fn to_base64(&self) -> String {
        platform::crypto::to_base64(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for QrSecret {
    fn eq(&self, other: &Self) -> bool {
        platform::crypto::constant_time_eq(&self.0, &other.0)
    }
}

impl Eq for QrSecret {}

impl fmt::Debug for QrSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QrSecret(<{} bytes redacted>)", self.0.len())
    }
}

/// Body of the secret distribution endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretEnvelope {
    /// Base64 of the secret bytes
    pub secret: String,
    /// How long the holder may cache it
    pub ttl_ms: i64,
}

impl SecretEnvelope {
    pub fn new(secret: &QrSecret, ttl_ms: i64) -> Self {
        Self {
            secret: secret.to_base64(),
            ttl_ms,
        }
    }

    pub fn decode(&self) -> TokenResult<QrSecret> {
        QrSecret::from_base64(&self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_base64_agree() {
        let from_text = QrSecret::from_text("test-qr-secret").unwrap();
        assert_eq!(from_text.to_base64(), "dGVzdC1xci1zZWNyZXQ=");
        let from_b64 = QrSecret::from_base64("dGVzdC1xci1zZWNyZXQ=").unwrap();
        assert_eq!(from_text, from_b64);
    }

    #[test]
    fn test_rejects_empty_and_garbage() {
        assert!(matches!(
            QrSecret::from_text(""),
            Err(TokenError::InvalidSecret("empty"))
        ));
        assert!(matches!(
            QrSecret::from_base64("***"),
            Err(TokenError::InvalidSecret("not base64"))
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = QrSecret::from_text("hunter2").unwrap();
        let debug = format!("{secret:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("7 bytes"));
    }

    #[test]
    fn test_envelope_wire_shape() {
        let secret = QrSecret::from_text("test-qr-secret").unwrap();
        let envelope = SecretEnvelope::new(&secret, SECRET_CACHE_TTL_MS);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["secret"], "dGVzdC1xci1zZWNyZXQ=");
        assert_eq!(json["ttlMs"], 2_592_000_000i64);
        assert_eq!(envelope.decode().unwrap(), secret);
    }

    #[test]
    fn test_generate_is_random() {
        assert_ne!(QrSecret::generate(), QrSecret::generate());
        assert_eq!(QrSecret::generate().as_bytes().len(), 32);
    }
}
