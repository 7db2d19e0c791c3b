//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by the entry-token crates:
//! - Common error types and result aliases
//! - Opaque typed identifiers (booking, ticket, event, user)

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
