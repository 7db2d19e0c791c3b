//! Generation from a previously fetched secret

use crate::cache::{CacheStorage, OfflineCache};
use crate::config::HolderConfig;
use crate::source::{GenerationContext, SourceOutcome, TokenSource};
use async_trait::async_trait;
use platform::clock::Clock;
use qr_token::{QrSecret, TokenSigner};
use std::sync::Arc;

pub struct CachedSecretSource<S> {
    cache: Arc<OfflineCache<S>>,
    config: Arc<HolderConfig>,
    clock: Arc<dyn Clock>,
}

impl<S> CachedSecretSource<S>
where
    S: CacheStorage + Sync + 'static,
{
    pub fn new(cache: Arc<OfflineCache<S>>, config: Arc<HolderConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache,
            config,
            clock,
        }
    }
}

#[async_trait]
impl<S> TokenSource for CachedSecretSource<S>
where
    S: CacheStorage + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "cached_secret"
    }

    async fn try_generate(&self, ctx: &GenerationContext) -> SourceOutcome {
        let cached: Option<String> = self
            .cache
            .get(&self.config.secret_cache_key, Some(self.config.secret_cache_ttl))
            .await;
        let Some(encoded) = cached else {
            return SourceOutcome::NotAvailable;
        };

        let secret = match QrSecret::from_base64(&encoded) {
            Ok(secret) => secret,
            Err(e) => return SourceOutcome::Failed(e.into()),
        };

        let signer = TokenSigner::new(secret, self.config.window);
        match signer.issue(&ctx.booking_id, &ctx.ticket_id, self.clock.now_ms()) {
            Ok(batch) => SourceOutcome::Tokens(batch),
            Err(e) => SourceOutcome::Failed(e.into()),
        }
    }
}
