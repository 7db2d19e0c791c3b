//! Ticket rotator
//!
//! Keeps a queue of tokens per booking on the holder's device and fetches
//! more before the displayed one runs out. One fetch per booking at a time.

use crate::config::HolderConfig;
use crate::error::{HolderError, HolderResult};
use crate::generator::ClientTokenGenerator;
use crate::queue::TokenQueue;
use futures::future::join_all;
use kernel::id::{BookingId, TicketId};
use platform::clock::Clock;
use qr_token::SignedToken;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

/// What a refresh request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    Fetched,
    /// Another fetch for this booking is running
    InFlight,
    NotNeeded,
    /// Entry recorded; codes are no longer shown
    Scanned,
    /// Offline but the displayed token is still valid
    OfflineWithToken,
    Untracked,
}

/// Snapshot for rendering one booking's code
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDisplay {
    pub qr_value: String,
    pub expires_at: i64,
    pub remaining_ms: i64,
    pub progress: f64,
}

#[derive(Debug)]
struct TrackedBooking {
    ticket_id: TicketId,
    scanned: bool,
    fetching: bool,
    queue: TokenQueue,
}

pub struct TicketRotator {
    generator: Arc<ClientTokenGenerator>,
    config: Arc<HolderConfig>,
    clock: Arc<dyn Clock>,
    bookings: Mutex<HashMap<BookingId, TrackedBooking>>,
}

impl TicketRotator {
    pub fn new(
        generator: Arc<ClientTokenGenerator>,
        config: Arc<HolderConfig>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            generator,
            config,
            clock,
            bookings: Mutex::new(HashMap::new()),
        }
    }

    /// Start rotating codes for a booking; `scanned` bookings are never refreshed
    pub async fn track(&self, booking_id: BookingId, ticket_id: TicketId, scanned: bool) {
        let queue = TokenQueue::new(self.config.window.window_ms(), self.config.queue_capacity);
        self.bookings.lock().await.insert(
            booking_id,
            TrackedBooking {
                ticket_id,
                scanned,
                fetching: false,
                queue,
            },
        );
    }

    pub async fn untrack(&self, booking_id: &BookingId) {
        self.bookings.lock().await.remove(booking_id);
    }

    /// Record that entry happened (or was reset)
    pub async fn set_scanned(&self, booking_id: &BookingId, scanned: bool) {
        if let Some(tracked) = self.bookings.lock().await.get_mut(booking_id) {
            tracked.scanned = scanned;
        }
    }

    pub async fn is_scanned(&self, booking_id: &BookingId) -> Option<bool> {
        self.bookings.lock().await.get(booking_id).map(|t| t.scanned)
    }

    pub async fn active_token(&self, booking_id: &BookingId) -> Option<SignedToken> {
        let now = self.clock.now_ms();
        let bookings = self.bookings.lock().await;
        let tracked = bookings.get(booking_id)?;
        if tracked.scanned {
            return None;
        }
        tracked.queue.active(now).cloned()
    }

    pub async fn display(&self, booking_id: &BookingId) -> Option<TokenDisplay> {
        let now = self.clock.now_ms();
        let bookings = self.bookings.lock().await;
        let tracked = bookings.get(booking_id)?;
        if tracked.scanned {
            return None;
        }
        let active = tracked.queue.active(now)?;
        Some(TokenDisplay {
            qr_value: active.qr_value.clone(),
            expires_at: active.expires_at,
            remaining_ms: active.remaining_ms(now),
            progress: tracked.queue.progress(now),
        })
    }

    /// Fetch tokens for one booking if its queue is running low
    pub async fn refresh(&self, booking_id: &BookingId) -> HolderResult<RefreshStatus> {
        let ticket_id = {
            let now = self.clock.now_ms();
            let mut bookings = self.bookings.lock().await;
            let Some(tracked) = bookings.get_mut(booking_id) else {
                return Ok(RefreshStatus::Untracked);
            };
            if tracked.scanned {
                return Ok(RefreshStatus::Scanned);
            }
            if tracked.fetching {
                return Ok(RefreshStatus::InFlight);
            }
            tracked.queue.prune(now);
            if !self.generator.connectivity().is_online() && tracked.queue.active(now).is_some() {
                return Ok(RefreshStatus::OfflineWithToken);
            }
            if !tracked
                .queue
                .needs_refresh(now, self.config.refresh_threshold)
            {
                return Ok(RefreshStatus::NotNeeded);
            }
            tracked.fetching = true;
            tracked.ticket_id.clone()
        };

        let result = self.generator.generate_tokens(booking_id, &ticket_id).await;

        let now = self.clock.now_ms();
        let mut bookings = self.bookings.lock().await;
        let Some(tracked) = bookings.get_mut(booking_id) else {
            return Ok(RefreshStatus::Untracked);
        };
        tracked.fetching = false;

        match result {
            Ok(batch) => {
                tracked.queue.merge(batch, now);
                tracing::debug!(
                    booking_id = %booking_id,
                    queued = tracked.queue.len(),
                    "Token queue refilled"
                );
                Ok(RefreshStatus::Fetched)
            }
            Err(e) => {
                if e.is_ticket_used() {
                    tracked.scanned = true;
                }
                Err(e)
            }
        }
    }

    /// One pass over every tracked booking, refreshed concurrently so a slow
    /// fetch for one booking does not hold up the others; returns the failures
    pub async fn tick(&self) -> Vec<(BookingId, HolderError)> {
        let ids: Vec<BookingId> = self.bookings.lock().await.keys().cloned().collect();

        let results = join_all(ids.into_iter().map(|booking_id| async move {
            let result = self.refresh(&booking_id).await;
            (booking_id, result)
        }))
        .await;

        results
            .into_iter()
            .filter_map(|(booking_id, result)| result.err().map(|e| (booking_id, e)))
            .collect()
    }

    /// Tick every `tick_interval` until `shutdown` turns true or is dropped
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.config.tick_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    for (booking_id, error) in self.tick().await {
                        tracing::warn!(booking_id = %booking_id, error = %error, "Token refresh failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Ticket rotator stopped");
    }
}
