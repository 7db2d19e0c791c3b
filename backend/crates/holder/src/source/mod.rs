//! Token sources
//!
//! Each way of producing a token batch is one `TokenSource`. The generator
//! walks an ordered list of them until one yields tokens.

pub mod cached;
pub mod native;
pub mod server;

pub use cached::CachedSecretSource;
pub use native::{LocalSignerPlugin, NativeSource, NativeTokenPlugin};
pub use server::ServerSource;

use crate::error::HolderError;
use async_trait::async_trait;
use kernel::id::{BookingId, TicketId};
use qr_token::TokenBatch;

/// Inputs to one generation attempt
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub booking_id: BookingId,
    pub ticket_id: TicketId,
    /// Connectivity at the start of the attempt
    pub offline: bool,
}

#[derive(Debug)]
pub enum SourceOutcome {
    Tokens(TokenBatch),
    /// This source cannot run here (no plugin, nothing cached)
    NotAvailable,
    /// This source needs the network and there is none
    Offline,
    Failed(HolderError),
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn try_generate(&self, ctx: &GenerationContext) -> SourceOutcome;
}
