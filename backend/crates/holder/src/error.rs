//! Holder Error Types

use qr_token::TokenError;
use thiserror::Error;

pub type HolderResult<T> = Result<T, HolderError>;
pub type StorageResult<T> = Result<T, StorageError>;

/// Shown to the ticket holder when no token can be produced offline
pub const OFFLINE_MESSAGE: &str =
    "Cannot generate QR tokens offline. Please check your connection and try again.";

/// Durable storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt cache entry: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum HolderError {
    /// No token source could run without the network
    #[error("{}", OFFLINE_MESSAGE)]
    OfflineUnavailable,

    /// Transport failure talking to the server
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a problem response
    #[error("server error {status}: {detail}")]
    Server { status: u16, detail: String },

    /// The on-device generator failed
    #[error("native generator failed: {0}")]
    Native(String),

    #[error("a token source returned no tokens")]
    NoTokens,

    #[error("no token source is configured")]
    NoSource,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl HolderError {
    /// Failure that means "the network is not there" rather than "the server said no"
    pub fn is_network_unavailable(&self) -> bool {
        match self {
            HolderError::OfflineUnavailable => true,
            HolderError::Network(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, HolderError::Server { status: 401 | 403, .. })
    }

    /// The server refuses tokens because entry was already recorded
    pub fn is_ticket_used(&self) -> bool {
        matches!(self, HolderError::Server { status: 409, .. })
    }
}
