//! Issued token wire types

use serde::{Deserialize, Serialize};

/// One displayable token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedToken {
    /// Text to render as the QR code
    pub qr_value: String,
    /// Unix ms at which the token's slot closes
    pub expires_at: i64,
}

impl SignedToken {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at
    }

    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        (self.expires_at - now_ms).max(0)
    }
}

/// Current and next slot tokens for one booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBatch {
    pub window_ms: i64,
    pub tokens: Vec<SignedToken>,
}

impl TokenBatch {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
