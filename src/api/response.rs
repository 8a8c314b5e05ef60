//! Response types for the FOI Deadline Engine API.
//!
//! This module defines the success bodies, the error body and the mapping
//! from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AuditTrace, RequestRecord, Trigger};

/// Response body for `POST /requests/derive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveResponse {
    /// The record with its derived fields recomputed.
    pub record: RequestRecord,
    /// The derivation groups that ran, in cascade order.
    pub triggers: Vec<Trigger>,
    /// The derivation audit trail.
    pub audit_trace: AuditTrace,
}

/// Response body for `POST /business-days/add`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBusinessDaysResponse {
    /// The start date (`dd/mm/yyyy`).
    pub start: String,
    /// Number of business days added.
    pub days: u32,
    /// The resulting date (`dd/mm/yyyy`).
    pub result: String,
}

/// Response body for `POST /business-days/count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountBusinessDaysResponse {
    /// The start date (`dd/mm/yyyy`).
    pub start: String,
    /// The end date (`dd/mm/yyyy`).
    pub end: String,
    /// Business days in the span, both ends included.
    pub business_days: u32,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an error for a date outside the representable calendar.
    pub fn date_out_of_range(start: &str, days: u32) -> Self {
        Self::with_details(
            "DATE_OUT_OF_RANGE",
            format!("Adding {} business days to {} leaves the calendar", days, start),
            "The resulting date cannot be represented",
        )
    }

    /// Creates an error for a business-day addition above the accepted maximum.
    pub fn days_out_of_range(days: u32, max: u32) -> Self {
        Self::with_details(
            "DAYS_OUT_OF_RANGE",
            format!("Cannot add {} business days", days),
            format!("At most {} business days can be added", max),
        )
    }

    /// Creates an error for a count span longer than the accepted maximum.
    pub fn span_too_long(start: &str, end: &str, max: i64) -> Self {
        Self::with_details(
            "SPAN_TOO_LONG",
            format!("The span from {} to {} is too long", start, end),
            format!("Spans may cover at most {} calendar days", max),
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates an error response with the given status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::RequestNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("REQUEST_NOT_FOUND", format!("Request not found: {}", id)),
            },
            EngineError::DuplicateRequest { id } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("DUPLICATE_REQUEST", format!("Duplicate request id: {}", id)),
            },
            EngineError::InvalidDate { field, value } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "INVALID_DATE",
                    format!("Invalid date for '{}': {}", field, value),
                    "Dates must be dd/mm/yyyy, d/m/yyyy, dd-mm-yyyy or yyyy-mm-dd",
                ),
            },
            EngineError::Report { message } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "REPORT_ERROR",
                    "Report could not be produced",
                    message,
                ),
            },
        }
    }
}
