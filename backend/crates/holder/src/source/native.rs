//! On-device generation through a platform plugin

use crate::error::{HolderError, HolderResult};
use crate::source::{GenerationContext, SourceOutcome, TokenSource};
use async_trait::async_trait;
use kernel::id::{BookingId, TicketId};
use platform::clock::Clock;
use qr_token::{TokenBatch, TokenSigner};
use std::sync::Arc;

/// Secure generator provided by the host platform (keystore, app-local secret)
#[async_trait]
pub trait NativeTokenPlugin: Send + Sync {
    fn is_available(&self) -> bool;

    async fn generate_tokens(
        &self,
        booking_id: &BookingId,
        ticket_id: &TicketId,
    ) -> HolderResult<TokenBatch>;
}

/// Plugin backed by a secret held in app-local storage
pub struct LocalSignerPlugin {
    signer: Option<TokenSigner>,
    clock: Arc<dyn Clock>,
}

impl LocalSignerPlugin {
    pub fn new(signer: Option<TokenSigner>, clock: Arc<dyn Clock>) -> Self {
        Self { signer, clock }
    }
}

#[async_trait]
impl NativeTokenPlugin for LocalSignerPlugin {
    fn is_available(&self) -> bool {
        true
    }

    async fn generate_tokens(
        &self,
        booking_id: &BookingId,
        ticket_id: &TicketId,
    ) -> HolderResult<TokenBatch> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| HolderError::Native("no secret provisioned".to_string()))?;
        Ok(signer.issue(booking_id, ticket_id, self.clock.now_ms())?)
    }
}

pub struct NativeSource {
    plugin: Arc<dyn NativeTokenPlugin>,
}

impl NativeSource {
    pub fn new(plugin: Arc<dyn NativeTokenPlugin>) -> Self {
        Self { plugin }
    }
}

#[async_trait]
impl TokenSource for NativeSource {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn try_generate(&self, ctx: &GenerationContext) -> SourceOutcome {
        if !self.plugin.is_available() {
            return SourceOutcome::NotAvailable;
        }
        match self
            .plugin
            .generate_tokens(&ctx.booking_id, &ctx.ticket_id)
            .await
        {
            Ok(batch) => SourceOutcome::Tokens(batch),
            Err(e) => SourceOutcome::Failed(e),
        }
    }
}
