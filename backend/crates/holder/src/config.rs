//! Holder Configuration

use qr_token::{QrWindow, SECRET_CACHE_TTL_MS};
use std::time::Duration;

/// Client-side configuration for token generation and display rotation
#[derive(Debug, Clone)]
pub struct HolderConfig {
    /// Base URL of the entry API, e.g. `https://tickets.example.com/api/entry`
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Auth session token sent as a bearer credential
    pub session_token: Option<String>,
    /// Must match the server's rotation window
    pub window: QrWindow,
    /// How long a fetched signing secret stays usable offline
    pub secret_cache_ttl: Duration,
    /// Offline cache key of the signing secret
    pub secret_cache_key: String,
    /// Tokens kept per booking
    pub queue_capacity: usize,
    /// Refetch once this many unexpired tokens (or fewer) remain
    pub refresh_threshold: usize,
    /// Display loop period
    pub tick_interval: Duration,
}

impl Default for HolderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:31113/api/entry".to_string(),
            request_timeout: Duration::from_secs(10),
            user_agent: concat!("holder/", env!("CARGO_PKG_VERSION")).to_string(),
            session_token: None,
            window: QrWindow::standard(),
            secret_cache_ttl: Duration::from_millis(SECRET_CACHE_TTL_MS as u64),
            secret_cache_key: "qr_secret".to_string(),
            queue_capacity: 3,
            refresh_threshold: 1,
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl HolderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn secret_cache_ttl_ms(&self) -> i64 {
        self.secret_cache_ttl.as_millis() as i64
    }
}
