//! Redeem Token Use Case
//!
//! Records entry. Exactly one of any number of concurrent redemptions of an
//! unscanned booking wins; the store's conditional update decides which.

use crate::application::config::EntryConfig;
use crate::application::gate::check_token;
use crate::domain::caller::Caller;
use crate::domain::entity::EntryTransition;
use crate::domain::outcome::RedemptionOutcome;
use crate::domain::repository::BookingRepository;
use crate::error::{EntryError, EntryResult};
use platform::clock::Clock;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RedeemTokenInput {
    pub token: String,
    /// `false` runs every check without recording entry
    pub mark_scanned: bool,
}

pub struct RedeemTokenUseCase<R>
where
    R: BookingRepository,
{
    repo: Arc<R>,
    config: Arc<EntryConfig>,
    clock: Arc<dyn Clock>,
}

impl<R> RedeemTokenUseCase<R>
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

    pub async fn execute(
        &self,
        caller: &Caller,
        input: RedeemTokenInput,
    ) -> EntryResult<RedemptionOutcome> {
        let now_ms = self.clock.now_ms();
        let verifier = self.config.verifier();
        let record = check_token(self.repo.as_ref(), &verifier, caller, &input.token, now_ms).await?;
        let booking_id = record.booking.id.clone();

        if record.booking.entry.scanned {
            tracing::warn!(
                booking_id = %booking_id,
                scanned_at_ms = ?record.booking.entry.scanned_at_ms,
                "Replay of an already used ticket"
            );
            return Ok(RedemptionOutcome::AlreadyUsed(record.summary()));
        }

        if !input.mark_scanned {
            tracing::info!(booking_id = %booking_id, "Ticket inspected");
            return Ok(RedemptionOutcome::Admitted(record.summary()));
        }

        let won = self
            .repo
            .conditional_update(&booking_id, EntryTransition::Scan { at_ms: now_ms })
            .await?;

        if won {
            tracing::info!(
                booking_id = %booking_id,
                operator = %caller.user_id,
                "Entry recorded"
            );
            let mut summary = record.summary();
            summary.scanned_at = Some(now_ms);
            return Ok(RedemptionOutcome::Admitted(summary));
        }

        // Lost the race: report the winner's state
        let current = self
            .repo
            .find_for_entry(&booking_id)
            .await?
            .ok_or(EntryError::BookingNotFound)?;

        tracing::warn!(
            booking_id = %booking_id,
            "Concurrent redemption lost; ticket already used"
        );
        Ok(RedemptionOutcome::AlreadyUsed(current.summary()))
    }
}
