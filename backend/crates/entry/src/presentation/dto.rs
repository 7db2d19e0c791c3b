//! API DTOs (Data Transfer Objects)
//!
//! Token batches and the secret envelope are served as the shared
//! `qr_token` wire types.

use crate::domain::entity::BookingSummary;
use crate::domain::outcome::{RedemptionOutcome, ValidationOutcome};
use serde::{Deserialize, Serialize};

/// Request for POST /api/entry/scan
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub token: String,
    /// Defaults to true
    #[serde(default)]
    pub mark_scanned: Option<bool>,
}

/// Request for POST /api/entry/validate
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    pub token: String,
}

/// Response for POST /api/entry/scan
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanResponse {
    Ok { booking: BookingSummary },
    AlreadyUsed { booking: BookingSummary },
}

impl From<RedemptionOutcome> for ScanResponse {
    fn from(outcome: RedemptionOutcome) -> Self {
        match outcome {
            RedemptionOutcome::Admitted(booking) => ScanResponse::Ok { booking },
            RedemptionOutcome::AlreadyUsed(booking) => ScanResponse::AlreadyUsed { booking },
        }
    }
}

/// Response for POST /api/entry/validate
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidateResponse {
    Ok { booking: BookingSummary },
    AlreadyValidated { booking: BookingSummary },
    AlreadyEntered { booking: BookingSummary },
}

impl From<ValidationOutcome> for ValidateResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Validated(booking) => ValidateResponse::Ok { booking },
            ValidationOutcome::AlreadyValidated(booking) => {
                ValidateResponse::AlreadyValidated { booking }
            }
            ValidationOutcome::AlreadyEntered(booking) => ValidateResponse::AlreadyEntered { booking },
        }
    }
}

/// Response for the reset endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub reset: bool,
}
