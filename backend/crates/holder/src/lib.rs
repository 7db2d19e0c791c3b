//! Ticket holder client
//!
//! Produces rotating entry codes on the holder's device:
//! - `generator` - ordered token sources (native plugin, cached secret, server)
//! - `cache` - durable offline cache that keeps the signing secret for offline use
//! - `api` - HTTP client for the entry API
//! - `rotator` - per-booking token queues refreshed before the shown code expires
//!
//! Tokens from every source are signed the same way, so the gate verifies
//! them identically.

pub mod api;
pub mod cache;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod generator;
pub mod queue;
pub mod rotator;
pub mod source;

pub use api::{HttpTokenApi, TokenApi};
pub use cache::{FileStorage, MemoryStorage, OfflineCache};
pub use config::HolderConfig;
pub use connectivity::ConnectivitySignal;
pub use error::{HolderError, HolderResult, OFFLINE_MESSAGE, StorageError};
pub use generator::ClientTokenGenerator;
pub use queue::TokenQueue;
pub use rotator::{RefreshStatus, TicketRotator, TokenDisplay};
