//! Conversions into [`AppError`] and its HTTP rendering

use super::app_error::AppError;
use super::kind::ErrorKind;
use crate::id::IdError;

impl From<IdError> for AppError {
    fn from(err: IdError) -> Self {
        AppError::new(ErrorKind::BadRequest, "Invalid identifier").with_source(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::new(ErrorKind::BadRequest, "Malformed JSON").with_source(err)
        } else {
            AppError::new(ErrorKind::InternalServerError, "Internal server error").with_source(err)
        }
    }
}

/// RFC 7807 problem body
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().title(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_error_is_bad_request() {
        let app_err: AppError = IdError::Empty.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_json_error_is_bad_request() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }
}
