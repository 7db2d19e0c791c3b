//! Entry Router

use crate::application::config::EntryConfig;
use crate::domain::repository::{BookingRepository, IdentityRepository};
use crate::infra::postgres::PgEntryRepository;
use crate::presentation::handlers::{self, EntryAppState};
use crate::presentation::middleware::require_caller;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use platform::clock::{Clock, SystemClock};
use std::sync::Arc;

/// Create the entry router with PostgreSQL repository
pub fn entry_router(repo: PgEntryRepository, config: EntryConfig) -> Router {
    entry_router_generic(repo, config, Arc::new(SystemClock))
}

/// Create a generic entry router for any repository implementation
pub fn entry_router_generic<R>(repo: R, config: EntryConfig, clock: Arc<dyn Clock>) -> Router
where
    R: BookingRepository + IdentityRepository + Clone + Send + Sync + 'static,
{
    let state = EntryAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
        clock,
    };

    Router::new()
        .route(
            "/bookings/{booking_id}/tokens",
            post(handlers::issue_tokens::<R>),
        )
        .route("/secret", get(handlers::get_secret::<R>))
        .route("/scan", post(handlers::scan::<R>))
        .route("/validate", post(handlers::validate::<R>))
        .route(
            "/bookings/{booking_id}/reset",
            post(handlers::reset_scan::<R>),
        )
        .route(
            "/bookings/{booking_id}/validation/reset",
            post(handlers::reset_validation::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_caller::<R>,
        ))
        .with_state(state)
}
