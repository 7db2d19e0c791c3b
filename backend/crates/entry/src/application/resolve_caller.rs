//! Resolve Caller Use Case
//!
//! Session tokens are minted by the auth collaborator as
//! `{sessionUuid}.{base64url(HMAC-SHA256(secret, sessionUuid))}`.

use crate::application::config::EntryConfig;
use crate::domain::caller::Caller;
use crate::domain::repository::IdentityRepository;
use crate::error::{EntryError, EntryResult};
use platform::clock::Clock;
use std::sync::Arc;
use uuid::Uuid;

pub struct ResolveCallerUseCase<I>
where
    I: IdentityRepository,
{
    identity_repo: Arc<I>,
    config: Arc<EntryConfig>,
    clock: Arc<dyn Clock>,
}

impl<I> ResolveCallerUseCase<I>
where
    I: IdentityRepository,
{
    pub fn new(identity_repo: Arc<I>, config: Arc<EntryConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity_repo,
            config,
            clock,
        }
    }

    pub async fn execute(&self, token: Option<&str>) -> EntryResult<Caller> {
        let token = token.ok_or(EntryError::Unauthenticated)?;
        let session_id = parse_session_token(token, &self.config.session_secret)
            .ok_or(EntryError::Unauthenticated)?;

        let caller = self
            .identity_repo
            .find_caller_by_session(session_id, self.clock.now_ms())
            .await?;

        match caller {
            Some(caller) => Ok(caller),
            None => {
                tracing::debug!(session_id = %session_id, "Session not found or expired");
                Err(EntryError::Unauthenticated)
            }
        }
    }
}

/// Mint a session token the way the auth collaborator does
pub fn sign_session_token(session_id: Uuid, session_secret: &[u8]) -> String {
    let id = session_id.to_string();
    let tag = platform::crypto::hmac_sha256(session_secret, id.as_bytes());
    format!("{}.{}", id, platform::crypto::to_base64url(&tag))
}

/// Verify the signature and return the session id
pub fn parse_session_token(token: &str, session_secret: &[u8]) -> Option<Uuid> {
    let (id, signature_b64) = token.split_once('.')?;
    let signature = platform::crypto::from_base64url(signature_b64).ok()?;
    if !platform::crypto::verify_hmac_sha256(session_secret, id.as_bytes(), &signature) {
        return None;
    }
    id.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_roundtrip() {
        let secret = [7u8; 32];
        let id = Uuid::new_v4();
        let token = sign_session_token(id, &secret);
        assert_eq!(parse_session_token(&token, &secret), Some(id));
    }

    #[test]
    fn test_session_token_rejects_forgery() {
        let secret = [7u8; 32];
        let token = sign_session_token(Uuid::new_v4(), &secret);
        assert_eq!(parse_session_token(&token, &[8u8; 32]), None);

        let (_, sig) = token.split_once('.').unwrap();
        let swapped = format!("{}.{}", Uuid::new_v4(), sig);
        assert_eq!(parse_session_token(&swapped, &secret), None);

        assert_eq!(parse_session_token("no-dot", &secret), None);
        assert_eq!(parse_session_token("a.b.c", &secret), None);
    }
}
