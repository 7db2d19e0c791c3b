//! Entry Error Types
//!
//! Entry-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! Format and authenticity failures share one public message and status so
//! a scanner cannot tell which check rejected a code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use qr_token::{Slot, TokenError};
use thiserror::Error;

pub type EntryResult<T> = Result<T, EntryError>;

const REJECTED_MESSAGE: &str = "Invalid QR code";

#[derive(Debug, Error)]
pub enum EntryError {
    /// Scanned text is not a token
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// Signature or ticket does not match the booking
    #[error("invalid or tampered token")]
    Tampered,

    #[error("token expired (slot {slot}, current {current})")]
    Expired { slot: Slot, current: Slot },

    #[error("token not yet valid (slot {slot}, current {current})")]
    NotYetValid { slot: Slot, current: Slot },

    #[error("booking not found")]
    BookingNotFound,

    /// Tokens are not issued for a booking that has already entered
    #[error("ticket already used")]
    TicketAlreadyUsed,

    #[error("not authorized")]
    NotAuthorized,

    #[error("authentication required")]
    Unauthenticated,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EntryError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EntryError::InvalidFormat(_) | EntryError::Tampered => {
                ErrorKind::UnprocessableEntity
            }
            EntryError::Expired { .. } => ErrorKind::Gone,
            EntryError::NotYetValid { .. } => ErrorKind::UnprocessableEntity,
            EntryError::BookingNotFound => ErrorKind::NotFound,
            EntryError::TicketAlreadyUsed => ErrorKind::Conflict,
            EntryError::NotAuthorized => ErrorKind::Forbidden,
            EntryError::Unauthenticated => ErrorKind::Unauthorized,
            EntryError::Database(_) | EntryError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Text shown to the caller
    pub fn public_message(&self) -> &'static str {
        match self {
            EntryError::InvalidFormat(_) | EntryError::Tampered => REJECTED_MESSAGE,
            EntryError::Expired { .. } => "QR code expired",
            EntryError::NotYetValid { .. } => "QR code not yet valid",
            EntryError::BookingNotFound => "Booking not found",
            EntryError::TicketAlreadyUsed => "Ticket already used",
            EntryError::NotAuthorized => "Not authorized",
            EntryError::Unauthenticated => "Must be signed in",
            EntryError::Database(_) | EntryError::Internal(_) => "Internal server error",
        }
    }

    fn action(&self) -> Option<&'static str> {
        match self {
            EntryError::InvalidFormat(_) | EntryError::Tampered => Some("Scan the code again"),
            EntryError::Expired { .. } | EntryError::NotYetValid { .. } => {
                Some("Ask the holder to let their code refresh, then scan again")
            }
            EntryError::TicketAlreadyUsed => Some("Ask an operator to reset the booking"),
            _ => None,
        }
    }

    fn log(&self) {
        match self {
            EntryError::Database(e) => {
                tracing::error!(error = %e, "Entry database error");
            }
            EntryError::Internal(msg) => {
                tracing::error!(message = %msg, "Entry internal error");
            }
            EntryError::Tampered | EntryError::NotAuthorized => {
                tracing::warn!(error = %self, "Entry request rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Entry error");
            }
        }
    }
}

impl From<TokenError> for EntryError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidFormat(reason) => EntryError::InvalidFormat(reason),
            TokenError::Tampered => EntryError::Tampered,
            TokenError::Expired { slot, current } => EntryError::Expired { slot, current },
            TokenError::NotYetValid { slot, current } => EntryError::NotYetValid { slot, current },
            other => EntryError::Internal(other.to_string()),
        }
    }
}

impl From<EntryError> for AppError {
    fn from(err: EntryError) -> Self {
        let mut app = AppError::new(err.kind(), err.public_message());
        if let Some(action) = err.action() {
            app = app.with_action(action);
        }
        app.with_source(err)
    }
}

impl IntoResponse for EntryError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_tamper_are_indistinguishable() {
        let format = EntryError::InvalidFormat("expected value".to_string());
        let tamper = EntryError::Tampered;
        assert_eq!(format.status_code(), tamper.status_code());
        assert_eq!(format.public_message(), tamper.public_message());
        assert_eq!(format.action(), tamper.action());
    }

    #[test]
    fn test_freshness_is_distinct() {
        let expired = EntryError::Expired {
            slot: Slot::new(1),
            current: Slot::new(3),
        };
        assert_eq!(expired.status_code(), StatusCode::GONE);
        assert_ne!(expired.public_message(), EntryError::Tampered.public_message());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(EntryError::BookingNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(EntryError::TicketAlreadyUsed.status_code(), StatusCode::CONFLICT);
        assert_eq!(EntryError::NotAuthorized.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(EntryError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            EntryError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(
            EntryError::from(TokenError::Tampered),
            EntryError::Tampered
        ));
        assert!(matches!(
            EntryError::from(TokenError::InvalidWindow(0)),
            EntryError::Internal(_)
        ));
    }

    #[test]
    fn test_app_error_hides_detail() {
        let app: AppError = EntryError::InvalidFormat("line 1 column 2".to_string()).into();
        assert_eq!(app.message(), "Invalid QR code");
        assert_eq!(app.status_code(), 422);
    }
}
