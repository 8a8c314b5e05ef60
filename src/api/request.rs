//! Request types for the FOI Deadline Engine API.
//!
//! Dates arrive as text in any accepted input format and are parsed by the
//! handlers, so an unparseable date is reported as `INVALID_DATE` rather than
//! a JSON error.

use serde::{Deserialize, Serialize};

use crate::models::{FieldChange, RequestRecord};

/// Largest `days` accepted by `POST /business-days/add`, roughly ten years of
/// business days.
pub const MAX_BUSINESS_DAYS_TO_ADD: u32 = 2_600;

/// Longest span in calendar days accepted by `POST /business-days/count`.
pub const MAX_COUNT_SPAN_DAYS: i64 = 3_660;

/// Request body for `POST /requests/derive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveRequest {
    /// The record as currently stored.
    pub record: RequestRecord,
    /// Edits to apply. When empty every derived field is recomputed.
    #[serde(default)]
    pub changes: Vec<FieldChange>,
}

/// Request body for `POST /business-days/add`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBusinessDaysRequest {
    /// The date to count from (exclusive).
    pub start: String,
    /// Number of business days to add, at most [`MAX_BUSINESS_DAYS_TO_ADD`].
    pub days: u32,
}

/// Request body for `POST /business-days/count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountBusinessDaysRequest {
    /// First date of the span (inclusive).
    pub start: String,
    /// Last date of the span (inclusive). At most [`MAX_COUNT_SPAN_DAYS`]
    /// after `start`.
    pub end: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_request_changes_default_to_empty() {
        let json = r#"{
            "record": {
                "id": "00000000-0000-0000-0000-000000000001",
                "request_number": "AH010T0000001",
                "applicant_name": "Ana Rojas",
                "intake_date": "01/01/2025",
                "initial_due_date": "29/01/2025"
            }
        }"#;

        let request: DeriveRequest = serde_json::from_str(json).unwrap();
        assert!(request.changes.is_empty());
        assert_eq!(request.record.request_number, "AH010T0000001");
    }

    #[test]
    fn test_derive_request_parses_tagged_changes() {
        let json = r#"{
            "record": {
                "id": "00000000-0000-0000-0000-000000000001",
                "request_number": "AH010T0000001",
                "applicant_name": "Ana Rojas",
                "intake_date": "01/01/2025",
                "initial_due_date": "29/01/2025"
            },
            "changes": [
                {"field": "closure_date", "value": "31/01/2025"},
                {"field": "objection", "value": true}
            ]
        }"#;

        let request: DeriveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.changes,
            vec![
                FieldChange::ClosureDate(Some("31/01/2025".to_string())),
                FieldChange::Objection(true),
            ]
        );
    }

    #[test]
    fn test_add_business_days_request_rejects_negative_days() {
        let result: Result<AddBusinessDaysRequest, _> =
            serde_json::from_str(r#"{"start": "06/01/2025", "days": -1}"#);
        assert!(result.is_err());
    }
}
