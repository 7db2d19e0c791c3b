//! Reset Entry Use Case
//!
//! Operator corrections: undo a mis-scan (which re-enables token issuance)
//! or clear a validation.

use crate::domain::caller::Caller;
use crate::domain::entity::EntryTransition;
use crate::domain::policy::can_operate_gate;
use crate::domain::repository::BookingRepository;
use crate::error::{EntryError, EntryResult};
use kernel::id::BookingId;
use std::sync::Arc;

pub struct ResetEntryUseCase<R>
where
    R: BookingRepository,
{
    repo: Arc<R>,
}

impl<R> ResetEntryUseCase<R>
where
    R: BookingRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// `Scanned -> Unscanned`. Returns false if the booking was not scanned.
    pub async fn reset_scan(&self, caller: &Caller, booking_id: &BookingId) -> EntryResult<bool> {
        self.apply(caller, booking_id, EntryTransition::ResetScan).await
    }

    /// `Validated -> Unscanned`. Returns false if there was nothing to clear.
    pub async fn clear_validation(
        &self,
        caller: &Caller,
        booking_id: &BookingId,
    ) -> EntryResult<bool> {
        self.apply(caller, booking_id, EntryTransition::ClearValidation)
            .await
    }

    async fn apply(
        &self,
        caller: &Caller,
        booking_id: &BookingId,
        transition: EntryTransition,
    ) -> EntryResult<bool> {
        let record = self
            .repo
            .find_for_entry(booking_id)
            .await?
            .ok_or(EntryError::BookingNotFound)?;

        if !can_operate_gate(caller, &record) {
            tracing::warn!(
                booking_id = %booking_id,
                user_id = %caller.user_id,
                transition = transition.name(),
                "Reset refused"
            );
            return Err(EntryError::NotAuthorized);
        }

        let changed = self.repo.conditional_update(booking_id, transition).await?;

        tracing::info!(
            booking_id = %booking_id,
            operator = %caller.user_id,
            transition = transition.name(),
            changed,
            "Entry state reset"
        );

        Ok(changed)
    }
}
