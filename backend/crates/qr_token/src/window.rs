//! Slot arithmetic

use crate::error::{TokenError, TokenResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Width of one slot
pub const DEFAULT_WINDOW_MS: i64 = 15_000;

/// Index of a `window_ms`-wide bucket of Unix time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(i64);

impl Slot {
    #[inline]
    pub const fn new(index: i64) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Number of slots `self` lies after `earlier` (negative if before)
    #[inline]
    pub const fn since(self, earlier: Slot) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rotation window; `window_ms` is always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrWindow {
    window_ms: i64,
}

impl QrWindow {
    pub const fn standard() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
        }
    }

    pub fn new(window_ms: i64) -> TokenResult<Self> {
        if window_ms <= 0 {
            return Err(TokenError::InvalidWindow(window_ms));
        }
        Ok(Self { window_ms })
    }

    pub fn from_duration(window: Duration) -> TokenResult<Self> {
        let ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        Self::new(ms)
    }

    #[inline]
    pub const fn window_ms(&self) -> i64 {
        self.window_ms
    }

    /// Slot containing `now_ms` (floor division, also for negative instants)
    #[inline]
    pub const fn slot_at(&self, now_ms: i64) -> Slot {
        Slot(now_ms.div_euclid(self.window_ms))
    }

    #[inline]
    pub const fn starts_at(&self, slot: Slot) -> i64 {
        slot.0.saturating_mul(self.window_ms)
    }

    /// Instant the slot closes
    #[inline]
    pub const fn expires_at(&self, slot: Slot) -> i64 {
        slot.0.saturating_add(1).saturating_mul(self.window_ms)
    }
}

impl Default for QrWindow {
    fn default() -> Self {
        Self::standard()
    }
}
