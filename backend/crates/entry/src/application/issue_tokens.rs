//! Issue Tokens Use Case

use crate::application::config::EntryConfig;
use crate::domain::caller::Caller;
use crate::domain::policy::can_issue_tokens;
use crate::domain::repository::BookingRepository;
use crate::error::{EntryError, EntryResult};
use kernel::id::BookingId;
use platform::clock::Clock;
use qr_token::TokenBatch;
use std::sync::Arc;

/// Sign the current and next slot tokens for a booking
pub struct IssueTokensUseCase<R>
where
    R: BookingRepository,
{
    repo: Arc<R>,
    config: Arc<EntryConfig>,
    clock: Arc<dyn Clock>,
}

impl<R> IssueTokensUseCase<R>
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

    pub async fn execute(&self, caller: &Caller, booking_id: &BookingId) -> EntryResult<TokenBatch> {
        let record = self
            .repo
            .find_for_entry(booking_id)
            .await?
            .ok_or(EntryError::BookingNotFound)?;

        if !can_issue_tokens(caller, &record) {
            tracing::warn!(
                booking_id = %booking_id,
                user_id = %caller.user_id,
                "Token issuance refused"
            );
            return Err(EntryError::NotAuthorized);
        }

        if record.booking.entry.scanned {
            return Err(EntryError::TicketAlreadyUsed);
        }

        let now_ms = self.clock.now_ms();
        let batch = self
            .config
            .secret_store()
            .signer(self.config.window)
            .issue(booking_id, &record.booking.ticket_id, now_ms)?;

        tracing::info!(
            booking_id = %booking_id,
            user_id = %caller.user_id,
            slot = self.config.window.slot_at(now_ms).get(),
            "Entry tokens issued"
        );

        Ok(batch)
    }
}
