//! Validate Ticket Use Case
//!
//! First step of the two-step gate flow: a soft, resettable pre-check
//! before entry is recorded.

use crate::application::config::EntryConfig;
use crate::application::gate::check_token;
use crate::domain::caller::Caller;
use crate::domain::entity::{BookingRecord, EntryStage, EntryTransition};
use crate::domain::outcome::ValidationOutcome;
use crate::domain::repository::BookingRepository;
use crate::error::{EntryError, EntryResult};
use platform::clock::Clock;
use std::sync::Arc;

pub struct ValidateTicketUseCase<R>
where
    R: BookingRepository,
{
    repo: Arc<R>,
    config: Arc<EntryConfig>,
    clock: Arc<dyn Clock>,
}

impl<R> ValidateTicketUseCase<R>
where
    R: BookingRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<EntryConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            config,
            clock,
        }
    }

    pub async fn execute(&self, caller: &Caller, token: &str) -> EntryResult<ValidationOutcome> {
        let now_ms = self.clock.now_ms();
        let verifier = self.config.verifier();
        let record = check_token(self.repo.as_ref(), &verifier, caller, token, now_ms).await?;

        if let Some(outcome) = settled(&record) {
            return Ok(outcome);
        }

        let booking_id = record.booking.id.clone();
        let won = self
            .repo
            .conditional_update(&booking_id, EntryTransition::Validate { at_ms: now_ms })
            .await?;

        if won {
            tracing::info!(
                booking_id = %booking_id,
                operator = %caller.user_id,
                "Ticket validated"
            );
            let mut summary = record.summary();
            summary.validated_at = Some(now_ms);
            return Ok(ValidationOutcome::Validated(summary));
        }

        let current = self
            .repo
            .find_for_entry(&booking_id)
            .await?
            .ok_or(EntryError::BookingNotFound)?;

        Ok(settled(&current).unwrap_or(ValidationOutcome::AlreadyValidated(current.summary())))
    }
}

/// Outcome when the booking is already past the unscanned stage
fn settled(record: &BookingRecord) -> Option<ValidationOutcome> {
    match record.booking.entry.stage() {
        EntryStage::Scanned => Some(ValidationOutcome::AlreadyEntered(record.summary())),
        EntryStage::Validated => Some(ValidationOutcome::AlreadyValidated(record.summary())),
        EntryStage::Unscanned => None,
    }
}
