//! Token Error Types

use crate::window::Slot;
use thiserror::Error;

pub type TokenResult<T> = Result<T, TokenError>;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Scanned text is not a token payload
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// Signature does not authenticate the payload
    #[error("invalid or tampered token")]
    Tampered,

    /// Slot window has elapsed beyond the grace bound
    #[error("token expired (slot {slot}, current {current})")]
    Expired { slot: Slot, current: Slot },

    /// Slot lies further in the future than allowed
    #[error("token not yet valid (slot {slot}, current {current})")]
    NotYetValid { slot: Slot, current: Slot },

    #[error("invalid secret: {0}")]
    InvalidSecret(&'static str),

    #[error("window must be positive, got {0} ms")]
    InvalidWindow(i64),

    #[error("token encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TokenError {
    /// Format and authenticity failures are indistinguishable to a scanner
    pub fn is_rejection(&self) -> bool {
        matches!(self, TokenError::InvalidFormat(_) | TokenError::Tampered)
    }

    pub fn is_freshness(&self) -> bool {
        matches!(
            self,
            TokenError::Expired { .. } | TokenError::NotYetValid { .. }
        )
    }
}
