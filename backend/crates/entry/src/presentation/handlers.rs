//! HTTP Handlers

use crate::application::config::EntryConfig;
use crate::application::{
    DistributeSecretUseCase, IssueTokensUseCase, RedeemTokenInput, RedeemTokenUseCase,
    ResetEntryUseCase, ValidateTicketUseCase,
};
use crate::domain::caller::Caller;
use crate::domain::repository::{BookingRepository, IdentityRepository};
use crate::error::{EntryError, EntryResult};
use crate::presentation::dto::{
    ResetResponse, ScanRequest, ScanResponse, ValidateRequest, ValidateResponse,
};
use axum::Json;
use axum::extract::{Extension, Path, State};
use kernel::id::BookingId;
use platform::clock::Clock;
use qr_token::{SecretEnvelope, TokenBatch};
use std::sync::Arc;

/// Shared state for entry handlers
#[derive(Clone)]
pub struct EntryAppState<R>
where
    R: BookingRepository + IdentityRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<EntryConfig>,
    pub clock: Arc<dyn Clock>,
}

fn booking_id_from_path(raw: String) -> EntryResult<BookingId> {
    BookingId::parse(raw).map_err(|_| EntryError::BookingNotFound)
}

/// POST /api/entry/bookings/{booking_id}/tokens
pub async fn issue_tokens<R>(
    State(state): State<EntryAppState<R>>,
    Extension(caller): Extension<Caller>,
    Path(booking_id): Path<String>,
) -> EntryResult<Json<TokenBatch>>
where
    R: BookingRepository + IdentityRepository + Clone + Send + Sync + 'static,
{
    let booking_id = booking_id_from_path(booking_id)?;
    let use_case =
        IssueTokensUseCase::new(state.repo.clone(), state.config.clone(), state.clock.clone());
    let batch = use_case.execute(&caller, &booking_id).await?;
    Ok(Json(batch))
}

/// GET /api/entry/secret
pub async fn get_secret<R>(
    State(state): State<EntryAppState<R>>,
    Extension(caller): Extension<Caller>,
) -> EntryResult<Json<SecretEnvelope>>
where
    R: BookingRepository + IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case = DistributeSecretUseCase::new(state.repo.clone(), state.config.clone());
    let envelope = use_case.execute(&caller).await?;
    Ok(Json(envelope))
}

/// POST /api/entry/scan
pub async fn scan<R>(
    State(state): State<EntryAppState<R>>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<ScanRequest>,
) -> EntryResult<Json<ScanResponse>>
where
    R: BookingRepository + IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        RedeemTokenUseCase::new(state.repo.clone(), state.config.clone(), state.clock.clone());
    let input = RedeemTokenInput {
        token: req.token,
        mark_scanned: req.mark_scanned.unwrap_or(true),
    };
    let outcome = use_case.execute(&caller, input).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/entry/validate
pub async fn validate<R>(
    State(state): State<EntryAppState<R>>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<ValidateRequest>,
) -> EntryResult<Json<ValidateResponse>>
where
    R: BookingRepository + IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        ValidateTicketUseCase::new(state.repo.clone(), state.config.clone(), state.clock.clone());
    let outcome = use_case.execute(&caller, &req.token).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/entry/bookings/{booking_id}/reset
pub async fn reset_scan<R>(
    State(state): State<EntryAppState<R>>,
    Extension(caller): Extension<Caller>,
    Path(booking_id): Path<String>,
) -> EntryResult<Json<ResetResponse>>
where
    R: BookingRepository + IdentityRepository + Clone + Send + Sync + 'static,
{
    let booking_id = booking_id_from_path(booking_id)?;
    let use_case = ResetEntryUseCase::new(state.repo.clone());
    let reset = use_case.reset_scan(&caller, &booking_id).await?;
    Ok(Json(ResetResponse { reset }))
}

/// POST /api/entry/bookings/{booking_id}/validation/reset
pub async fn reset_validation<R>(
    State(state): State<EntryAppState<R>>,
    Extension(caller): Extension<Caller>,
    Path(booking_id): Path<String>,
) -> EntryResult<Json<ResetResponse>>
where
    R: BookingRepository + IdentityRepository + Clone + Send + Sync + 'static,
{
    let booking_id = booking_id_from_path(booking_id)?;
    let use_case = ResetEntryUseCase::new(state.repo.clone());
    let reset = use_case.clear_validation(&caller, &booking_id).await?;
    Ok(Json(ResetResponse { reset }))
}
