//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use crate::domain::caller::Caller;
use crate::domain::entity::{BookingRecord, EntryTransition};
use crate::error::EntryResult;
use kernel::id::{BookingId, UserId};
use uuid::Uuid;

/// Booking store
#[trait_variant::make(BookingRepository: Send)]
pub trait LocalBookingRepository {
    /// Booking with event and ticket details
    async fn find_for_entry(&self, booking_id: &BookingId) -> EntryResult<Option<BookingRecord>>;

    /// Apply `transition` only if the stored state satisfies
    /// `transition.expected()`, as one atomic step.
    /// Returns true when this call changed the row.
    async fn conditional_update(
        &self,
        booking_id: &BookingId,
        transition: EntryTransition,
    ) -> EntryResult<bool>;

    async fn count_for_user(&self, user_id: &UserId) -> EntryResult<u64>;
}

/// Session lookup provided by the auth collaborator
#[trait_variant::make(IdentityRepository: Send)]
pub trait LocalIdentityRepository {
    /// Caller owning an unexpired session
    async fn find_caller_by_session(
        &self,
        session_id: Uuid,
        now_ms: i64,
    ) -> EntryResult<Option<Caller>>;
}
