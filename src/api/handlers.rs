//! HTTP request handlers for the FOI Deadline Engine API.
//!
//! The service is stateless: records travel in the request body and come back
//! with their derived fields recomputed. Each request is logged under a fresh
//! correlation id.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{CascadeOutcome, format_date, holidays_for_year, parse_date};
use crate::error::EngineError;
use crate::models::{RequestRecord, Trigger};
use crate::report::{csv_report, summarize};

use super::request::{
    AddBusinessDaysRequest, CountBusinessDaysRequest, DeriveRequest, MAX_BUSINESS_DAYS_TO_ADD,
    MAX_COUNT_SPAN_DAYS,
};
use super::response::{
    AddBusinessDaysResponse, ApiError, ApiErrorResponse, CountBusinessDaysResponse,
    DeriveResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/requests/derive", post(derive_handler))
        .route("/business-days/add", post(add_business_days_handler))
        .route("/business-days/count", post(count_business_days_handler))
        .route("/holidays/:year", get(holidays_handler))
        .route("/reports/summary", post(summary_handler))
        .route("/reports/csv", post(csv_handler))
        .with_state(state)
}

/// Handler for POST /requests/derive.
///
/// Applies the submitted changes through the update cascade. With no changes
/// every derived field is recomputed.
async fn derive_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeriveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing derive request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let cascade = state.cascade();
    let outcome = if request.changes.is_empty() {
        let mut record = request.record;
        let audit_trace = cascade.refresh(&mut record);
        CascadeOutcome {
            record,
            triggers: Trigger::ALL.to_vec(),
            audit_trace,
        }
    } else {
        cascade.apply(&request.record, &request.changes)
    };

    info!(
        correlation_id = %correlation_id,
        request_id = %outcome.record.id,
        statute = %state.config().statute.code,
        changes = request.changes.len(),
        triggers = ?outcome.triggers,
        warnings = outcome.audit_trace.warnings.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Derivation completed"
    );

    json_response(DeriveResponse {
        record: outcome.record,
        triggers: outcome.triggers,
        audit_trace: outcome.audit_trace,
    })
}

/// Handler for POST /business-days/add.
///
/// `days` above [`MAX_BUSINESS_DAYS_TO_ADD`] is rejected with 422 before any
/// walk starts.
async fn add_business_days_handler(
    State(state): State<AppState>,
    payload: Result<Json<AddBusinessDaysRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing business-day addition");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let start = match required_date("start", &request.start) {
        Ok(date) => date,
        Err(err) => return error_response(correlation_id, err.into()),
    };

    if request.days > MAX_BUSINESS_DAYS_TO_ADD {
        return error_response(
            correlation_id,
            ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::days_out_of_range(request.days, MAX_BUSINESS_DAYS_TO_ADD),
            ),
        );
    }

    let calendar = state.cascade().calendar();
    match calendar.add_business_days(start, request.days) {
        Some(result) => {
            info!(
                correlation_id = %correlation_id,
                start = %start,
                days = request.days,
                result = %result,
                "Business days added"
            );
            json_response(AddBusinessDaysResponse {
                start: format_date(start),
                days: request.days,
                result: format_date(result),
            })
        }
        None => error_response(
            correlation_id,
            ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::date_out_of_range(&request.start, request.days),
            ),
        ),
    }
}

/// Handler for POST /business-days/count.
///
/// Spans longer than [`MAX_COUNT_SPAN_DAYS`] are rejected with 422. A reversed
/// span is not checked and counts zero.
async fn count_business_days_handler(
    State(state): State<AppState>,
    payload: Result<Json<CountBusinessDaysRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing business-day count");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let dates = required_date("start", &request.start)
        .and_then(|start| required_date("end", &request.end).map(|end| (start, end)));
    let (start, end) = match dates {
        Ok(dates) => dates,
        Err(err) => return error_response(correlation_id, err.into()),
    };

    if (end - start).num_days() > MAX_COUNT_SPAN_DAYS {
        return error_response(
            correlation_id,
            ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::span_too_long(&request.start, &request.end, MAX_COUNT_SPAN_DAYS),
            ),
        );
    }

    let business_days = state.cascade().calendar().count_business_days(start, end);
    info!(
        correlation_id = %correlation_id,
        start = %start,
        end = %end,
        business_days,
        "Business days counted"
    );

    json_response(CountBusinessDaysResponse {
        start: format_date(start),
        end: format_date(end),
        business_days,
    })
}

/// Handler for GET /holidays/:year.
async fn holidays_handler(year: Result<Path<i32>, PathRejection>) -> Response {
    let correlation_id = Uuid::new_v4();

    let year = match year {
        Ok(Path(year)) => year,
        Err(rejection) => {
            return error_response(
                correlation_id,
                ApiErrorResponse::new(
                    StatusCode::BAD_REQUEST,
                    ApiError::with_details(
                        "INVALID_YEAR",
                        "Year must be an integer",
                        rejection.body_text(),
                    ),
                ),
            );
        }
    };

    let holidays = holidays_for_year(year);
    info!(
        correlation_id = %correlation_id,
        year,
        holidays = holidays.len(),
        "Holidays listed"
    );
    json_response(holidays)
}

/// Handler for POST /reports/summary.
async fn summary_handler(payload: Result<Json<Vec<RequestRecord>>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing summary report");

    let records = match payload {
        Ok(Json(records)) => records,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let summary = summarize(&records);
    info!(
        correlation_id = %correlation_id,
        total = summary.total,
        on_time = summary.on_time,
        overdue = summary.overdue,
        "Summary report completed"
    );
    json_response(summary)
}

/// Handler for POST /reports/csv.
async fn csv_handler(
    State(state): State<AppState>,
    payload: Result<Json<Vec<RequestRecord>>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing CSV report");

    let records = match payload {
        Ok(Json(records)) => records,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    match csv_report(&records, state.csv_options()) {
        Ok(csv) => {
            info!(
                correlation_id = %correlation_id,
                rows = records.len(),
                bytes = csv.len(),
                "CSV report completed"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
                csv,
            )
                .into_response()
        }
        Err(err) => error_response(correlation_id, err.into()),
    }
}

/// Parses a mandatory date field.
fn required_date(field: &str, value: &str) -> Result<NaiveDate, EngineError> {
    parse_date(value).ok_or_else(|| EngineError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn json_response<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, error: ApiErrorResponse) -> Response {
    warn!(
        correlation_id = %correlation_id,
        status = %error.status,
        code = %error.error.code,
        message = %error.error.message,
        "Request failed"
    );
    (
        error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error.error),
    )
        .into_response()
}

/// Maps a JSON extraction failure to a 400 response.
fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    error_response(
        correlation_id,
        ApiErrorResponse::new(StatusCode::BAD_REQUEST, error),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{FieldChange, IntakeDetails};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        AppState::new(EngineConfig::default())
    }

    fn create_record() -> RequestRecord {
        RequestRecord::from_intake(IntakeDetails {
            request_number: "AH010T0000001".to_string(),
            applicant_name: "Ana Rojas".to_string(),
            intake_date: "01/01/2025".to_string(),
            initial_due_date: "29/01/2025".to_string(),
        })
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_derive_applies_changes() {
        let router = create_router(create_test_state());
        let request = DeriveRequest {
            record: create_record(),
            changes: vec![FieldChange::ClosureDate(Some("31/01/2025".to_string()))],
        };

        let response = router
            .oneshot(post_json(
                "/requests/derive",
                serde_json::to_string(&request).unwrap(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: DeriveResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(result.record.elapsed_business_days, Some(22));
        assert_eq!(result.triggers, vec![Trigger::ClosureChanged]);
        assert_eq!(result.audit_trace.steps.len(), 1);
    }

    #[tokio::test]
    async fn test_derive_without_changes_refreshes_everything() {
        let router = create_router(create_test_state());
        let mut record = create_record();
        record.dispatch_date = Some("06/01/2025".to_string());
        record.extension = true;
        let request = DeriveRequest {
            record,
            changes: vec![],
        };

        let response = router
            .oneshot(post_json(
                "/requests/derive",
                serde_json::to_string(&request).unwrap(),
            ))
            .await
            .unwrap();

        let result: DeriveResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(result.triggers.len(), 3);
        assert_eq!(
            result.record.adjusted_due_date_label.as_deref(),
            Some("20/01/2025")
        );
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/requests/derive", "{invalid json".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_add_business_days_invalid_date_returns_422() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/business-days/add",
                r#"{"start": "next monday", "days": 5}"#.to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "INVALID_DATE");
    }

    #[tokio::test]
    async fn test_holidays_rejects_non_numeric_year() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/holidays/next")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "INVALID_YEAR");
    }

    #[tokio::test]
    async fn test_csv_of_empty_set_returns_422() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/reports/csv", "[]".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "REPORT_ERROR");
    }
}
