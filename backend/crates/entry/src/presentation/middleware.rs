//! Entry Middleware
//!
//! Resolves the caller from the auth session cookie (or a bearer token) and
//! stores it in request extensions for the handlers.

use crate::application::ResolveCallerUseCase;
use crate::domain::repository::{BookingRepository, IdentityRepository};
use crate::error::EntryError;
use crate::presentation::handlers::EntryAppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Middleware that requires an authenticated caller
pub async fn require_caller<R>(
    State(state): State<EntryAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, EntryError>
where
    R: BookingRepository + IdentityRepository + Clone + Send + Sync + 'static,
{
    let token =
        platform::cookie::extract_session_token(req.headers(), &state.config.session_cookie_name);

    let use_case =
        ResolveCallerUseCase::new(state.repo.clone(), state.config.clone(), state.clock.clone());
    let caller = use_case.execute(token.as_deref()).await?;

    tracing::debug!(user_id = %caller.user_id, role = %caller.role, "Caller resolved");

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}
