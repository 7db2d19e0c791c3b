//! Server issuance, with a background refresh of the cached secret

use crate::api::TokenApi;
use crate::cache::{CacheStorage, OfflineCache};
use crate::config::HolderConfig;
use crate::error::HolderResult;
use crate::source::{GenerationContext, SourceOutcome, TokenSource};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub struct ServerSource<A, S> {
    api: Arc<A>,
    /// Where a fetched secret is kept for offline use
    cache: Option<Arc<OfflineCache<S>>>,
    config: Arc<HolderConfig>,
}

impl<A, S> ServerSource<A, S>
where
    A: TokenApi + Sync + 'static,
    S: CacheStorage + Sync + 'static,
{
    pub fn new(api: Arc<A>, cache: Option<Arc<OfflineCache<S>>>, config: Arc<HolderConfig>) -> Self {
        Self { api, cache, config }
    }

    /// Fetch the signing secret and store it in the offline cache
    pub async fn refresh_secret(&self) -> HolderResult<()> {
        let Some(cache) = &self.cache else {
            return Ok(());
        };
        store_secret(self.api.as_ref(), cache.as_ref(), &self.config).await
    }

    fn spawn_secret_refresh(&self) {
        let Some(cache) = self.cache.clone() else {
            return;
        };
        let api = self.api.clone();
        let config = self.config.clone();
        tokio::spawn(async move {
            if let Err(e) = store_secret(api.as_ref(), cache.as_ref(), &config).await {
                tracing::debug!(error = %e, "Background secret refresh failed");
            }
        });
    }
}

async fn store_secret<A, S>(api: &A, cache: &OfflineCache<S>, config: &HolderConfig) -> HolderResult<()>
where
    A: TokenApi + Sync,
    S: CacheStorage + Sync,
{
    let envelope = api.fetch_secret().await?;
    // Reject garbage before it reaches the cache
    envelope.decode()?;

    let ttl_ms = envelope.ttl_ms.clamp(0, config.secret_cache_ttl_ms());
    cache
        .set(
            &config.secret_cache_key,
            &envelope.secret,
            Some(Duration::from_millis(ttl_ms as u64)),
        )
        .await?;

    tracing::debug!(ttl_ms, "Signing secret cached for offline use");
    Ok(())
}

#[async_trait]
impl<A, S> TokenSource for ServerSource<A, S>
where
    A: TokenApi + Sync + 'static,
    S: CacheStorage + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "server"
    }

    async fn try_generate(&self, ctx: &GenerationContext) -> SourceOutcome {
        if ctx.offline {
            return SourceOutcome::Offline;
        }
        match self.api.issue_tokens(&ctx.booking_id).await {
            Ok(batch) => {
                self.spawn_secret_refresh();
                SourceOutcome::Tokens(batch)
            }
            Err(e) => SourceOutcome::Failed(e),
        }
    }
}
