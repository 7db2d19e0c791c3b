//! Per-booking token queue for the rotating display

use qr_token::{SignedToken, TokenBatch};

#[derive(Debug, Clone)]
pub struct TokenQueue {
    window_ms: i64,
    capacity: usize,
    /// Unique by value, ordered by expiry
    tokens: Vec<SignedToken>,
}

impl TokenQueue {
    pub fn new(window_ms: i64, capacity: usize) -> Self {
        Self {
            window_ms,
            capacity,
            tokens: Vec::with_capacity(capacity),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[SignedToken] {
        &self.tokens
    }

    /// Add a fetched batch: drop expired, dedupe, order by expiry, cap
    pub fn merge(&mut self, batch: TokenBatch, now_ms: i64) {
        if batch.window_ms > 0 {
            self.window_ms = batch.window_ms;
        }
        self.prune(now_ms);
        for token in batch.tokens {
            if token.is_expired(now_ms) || self.tokens.iter().any(|t| t.qr_value == token.qr_value) {
                continue;
            }
            self.tokens.push(token);
        }
        self.tokens.sort_by_key(|t| t.expires_at);
        self.tokens.truncate(self.capacity);
    }

    /// Remove expired tokens; returns how many were dropped
    pub fn prune(&mut self, now_ms: i64) -> usize {
        let before = self.tokens.len();
        self.tokens.retain(|t| !t.is_expired(now_ms));
        before - self.tokens.len()
    }

    /// Token to display: the earliest one not yet expired
    pub fn active(&self, now_ms: i64) -> Option<&SignedToken> {
        self.tokens.iter().find(|t| !t.is_expired(now_ms))
    }

    pub fn unexpired(&self, now_ms: i64) -> usize {
        self.tokens.iter().filter(|t| !t.is_expired(now_ms)).count()
    }

    pub fn needs_refresh(&self, now_ms: i64, threshold: usize) -> bool {
        self.unexpired(now_ms) <= threshold
    }

    /// Time left on the active token
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        self.active(now_ms).map_or(0, |t| t.remaining_ms(now_ms))
    }

    /// Remaining share of the window, `0.0..=1.0`, for a countdown bar
    pub fn progress(&self, now_ms: i64) -> f64 {
        if self.window_ms <= 0 {
            return 0.0;
        }
        (self.remaining_ms(now_ms) as f64 / self.window_ms as f64).clamp(0.0, 1.0)
    }
}
