//! Entry Backend Module
//!
//! Server side of the rotating QR entry-token protocol.
//!
//! Clean Architecture structure:
//! - `domain/` - Entry state machine, caller identity, authorization rules, repository traits
//! - `application/` - Use cases (issue, redeem, validate, reset, secret distribution)
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers
//!
//! ## Security Model
//! - The server is the sole authority for entry state transitions
//! - Entry is recorded by a conditional update, so one booking admits once
//! - Format and signature failures look identical to the scanner
//! - The signing secret is released only to privileged callers or booking holders, and audited

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::EntryConfig;
pub use application::resolve_caller::sign_session_token;
pub use domain::caller::{Caller, UserRole};
pub use error::{EntryError, EntryResult};
pub use infra::memory::InMemoryEntryRepository;
pub use infra::postgres::PgEntryRepository;
pub use presentation::router::{entry_router, entry_router_generic};
