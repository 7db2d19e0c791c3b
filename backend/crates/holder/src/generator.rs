//! Client Token Generator
//!
//! Runs the configured token sources in order. Each source is tried at most
//! once per call. Failures while offline, or failures that look like a
//! missing network, end the walk with `HolderError::OfflineUnavailable`.

use crate::api::TokenApi;
use crate::cache::{CacheStorage, OfflineCache};
use crate::config::HolderConfig;
use crate::connectivity::ConnectivitySignal;
use crate::error::{HolderError, HolderResult};
use crate::source::{
    CachedSecretSource, GenerationContext, NativeSource, NativeTokenPlugin, ServerSource,
    SourceOutcome, TokenSource,
};
use kernel::id::{BookingId, TicketId};
use platform::clock::Clock;
use qr_token::TokenBatch;
use std::sync::Arc;

pub struct ClientTokenGenerator {
    sources: Vec<Arc<dyn TokenSource>>,
    connectivity: ConnectivitySignal,
}

impl ClientTokenGenerator {
    pub fn new(sources: Vec<Arc<dyn TokenSource>>, connectivity: ConnectivitySignal) -> Self {
        Self {
            sources,
            connectivity,
        }
    }

    /// Device with a secure native generator: plugin first, then the server
    pub fn for_native<A, S>(
        plugin: Arc<dyn NativeTokenPlugin>,
        api: Arc<A>,
        cache: Option<Arc<OfflineCache<S>>>,
        config: Arc<HolderConfig>,
        connectivity: ConnectivitySignal,
    ) -> Self
    where
        A: TokenApi + Sync + 'static,
        S: CacheStorage + Sync + 'static,
    {
        let native: Arc<dyn TokenSource> = Arc::new(NativeSource::new(plugin));
        let server: Arc<dyn TokenSource> = Arc::new(ServerSource::new(api, cache, config));
        Self::new(vec![native, server], connectivity)
    }

    /// Generic client: cached secret first, then the server (which also
    /// refreshes the cached secret)
    pub fn for_web<A, S>(
        api: Arc<A>,
        cache: Arc<OfflineCache<S>>,
        config: Arc<HolderConfig>,
        clock: Arc<dyn Clock>,
        connectivity: ConnectivitySignal,
    ) -> Self
    where
        A: TokenApi + Sync + 'static,
        S: CacheStorage + Sync + 'static,
    {
        let cached: Arc<dyn TokenSource> =
            Arc::new(CachedSecretSource::new(cache.clone(), config.clone(), clock));
        let server: Arc<dyn TokenSource> = Arc::new(ServerSource::new(api, Some(cache), config));
        Self::new(vec![cached, server], connectivity)
    }

    pub fn connectivity(&self) -> &ConnectivitySignal {
        &self.connectivity
    }

    pub async fn generate_tokens(
        &self,
        booking_id: &BookingId,
        ticket_id: &TicketId,
    ) -> HolderResult<TokenBatch> {
        let ctx = GenerationContext {
            booking_id: booking_id.clone(),
            ticket_id: ticket_id.clone(),
            offline: !self.connectivity.is_online(),
        };

        let mut last_error = None;
        for source in &self.sources {
            let outcome = source.try_generate(&ctx).await;
            let error = match outcome {
                SourceOutcome::Tokens(batch) if !batch.is_empty() => {
                    tracing::debug!(
                        booking_id = %booking_id,
                        source = source.name(),
                        tokens = batch.tokens.len(),
                        "Tokens generated"
                    );
                    return Ok(batch);
                }
                SourceOutcome::Tokens(_) => HolderError::NoTokens,
                SourceOutcome::NotAvailable => {
                    tracing::debug!(source = source.name(), "Token source not available");
                    continue;
                }
                SourceOutcome::Offline => {
                    tracing::debug!(source = source.name(), "Token source needs the network");
                    return Err(HolderError::OfflineUnavailable);
                }
                SourceOutcome::Failed(e) => e,
            };

            tracing::debug!(
                booking_id = %booking_id,
                source = source.name(),
                error = %error,
                "Token source failed"
            );

            // Re-read: connectivity may have dropped during the attempt
            if ctx.offline || !self.connectivity.is_online() || error.is_network_unavailable() {
                return Err(HolderError::OfflineUnavailable);
            }
            last_error = Some(error);
        }

        Err(match last_error {
            Some(error) => error,
            None if ctx.offline => HolderError::OfflineUnavailable,
            None => HolderError::NoSource,
        })
    }
}
