//! Distribute Secret Use Case
//!
//! Hands the signing secret to devices that may generate tokens offline.

use crate::application::config::EntryConfig;
use crate::domain::caller::Caller;
use crate::domain::policy::secret_grant;
use crate::domain::repository::BookingRepository;
use crate::error::{EntryError, EntryResult};
use qr_token::SecretEnvelope;
use std::sync::Arc;

pub struct DistributeSecretUseCase<R>
where
    R: BookingRepository,
{
    repo: Arc<R>,
    config: Arc<EntryConfig>,
}

impl<R> DistributeSecretUseCase<R>
where
    R: BookingRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<EntryConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, caller: &Caller) -> EntryResult<SecretEnvelope> {
        let store = self.config.secret_store();

        // Privileged callers skip the booking count query
        let booking_count = if caller.is_privileged() {
            0
        } else {
            self.repo.count_for_user(&caller.user_id).await?
        };

        match secret_grant(caller, booking_count) {
            Some(grant) => Ok(store.release(caller, grant)),
            None => {
                store.refuse(caller);
                Err(EntryError::NotAuthorized)
            }
        }
    }
}
