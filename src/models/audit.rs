//! Audit trail models.
//!
//! Every derivation run by the update cascade records an [`AuditStep`] so a
//! reviewer can see which statutory rule produced each derived field and from
//! which inputs.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a derivation.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "compliance_classification".to_string(),
///     rule_name: "Compliance Classification".to_string(),
///     statute_ref: "Art. 14".to_string(),
///     input: serde_json::json!({"elapsed_business_days": 18}),
///     output: serde_json::json!({"verdict": "on_time"}),
///     reasoning: "18 business days is within the 20 day limit".to_string(),
/// };
/// assert_eq!(step.rule_id, "compliance_classification");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statutory provision behind this rule.
    pub statute_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated while deriving fields.
///
/// Warnings flag inputs that could not be used (an unparseable date, for
/// instance) without aborting the update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Warning for a date field whose text could not be parsed.
    pub fn unparseable_date(field: &str, value: &str) -> Self {
        Self {
            code: "UNPARSEABLE_DATE".to_string(),
            message: format!(
                "{} '{}' is not a recognised date; derived fields cleared",
                field, value
            ),
            severity: "low".to_string(),
        }
    }

    /// Warning for a record whose intake date cannot anchor the statutory clock.
    pub fn unparseable_intake(value: &str) -> Self {
        Self {
            code: "UNPARSEABLE_INTAKE_DATE".to_string(),
            message: format!(
                "intake_date '{}' is not a recognised date; elapsed days not computed",
                value
            ),
            severity: "medium".to_string(),
        }
    }
}

/// The complete audit trace for one update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of derivation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during derivation.
    pub warnings: Vec<AuditWarning>,
    /// The total derivation duration in microseconds.
    pub duration_us: u64,
}
