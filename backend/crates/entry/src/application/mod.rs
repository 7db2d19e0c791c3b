//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config;
pub mod distribute_secret;
pub(crate) mod gate;
pub mod issue_tokens;
pub mod redeem;
pub mod reset;
pub mod resolve_caller;
pub mod secret_store;
pub mod validate;

pub use distribute_secret::DistributeSecretUseCase;
pub use issue_tokens::IssueTokensUseCase;
pub use redeem::{RedeemTokenInput, RedeemTokenUseCase};
pub use reset::ResetEntryUseCase;
pub use resolve_caller::ResolveCallerUseCase;
pub use validate::ValidateTicketUseCase;
