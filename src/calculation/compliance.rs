//! Compliance classification of closed requests.

use serde_json::json;

use crate::models::{AuditStep, AuditWarning, ComplianceVerdict};

use super::business_days::BusinessCalendar;
use super::date_parser::parse_date;

/// The statutory response window in business days.
pub const COMPLIANCE_THRESHOLD_DAYS: u32 = 20;

const COMPLIANCE_REF: &str = "Art. 14";

/// Classifies a request closed after `elapsed_business_days`.
///
/// The limit is inclusive: a request closed on business day 20 is on time.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::calculation::classify;
/// use foi_deadline_engine::models::ComplianceVerdict;
///
/// assert_eq!(classify(20), ComplianceVerdict::OnTime);
/// assert_eq!(classify(21), ComplianceVerdict::Overdue);
/// ```
pub fn classify(elapsed_business_days: u32) -> ComplianceVerdict {
    if elapsed_business_days <= COMPLIANCE_THRESHOLD_DAYS {
        ComplianceVerdict::OnTime
    } else {
        ComplianceVerdict::Overdue
    }
}

/// The result of classifying a closure.
///
/// `elapsed_business_days` and `verdict` are always both present or both absent.
#[derive(Debug, Clone)]
pub struct ComplianceResult {
    /// Business days from intake to closure, inclusive.
    pub elapsed_business_days: Option<u32>,
    /// The compliance verdict.
    pub verdict: Option<ComplianceVerdict>,
    /// The audit step recording this derivation.
    pub audit_step: AuditStep,
    /// Warnings about inputs that could not be used.
    pub warnings: Vec<AuditWarning>,
}

/// Counts business days from intake to closure and classifies the result.
pub fn calculate_compliance(
    intake_text: &str,
    closure_text: Option<&str>,
    calendar: &BusinessCalendar,
    step_number: u32,
) -> ComplianceResult {
    let mut warnings = Vec::new();

    let closure = closure_text.and_then(parse_date);
    if let (Some(text), None) = (closure_text, closure) {
        warnings.push(AuditWarning::unparseable_date("closure_date", text));
    }

    let elapsed = closure.and_then(|end| calendar.elapsed_business_days(intake_text, Some(end)));
    if closure.is_some() && elapsed.is_none() {
        warnings.push(AuditWarning::unparseable_intake(intake_text));
    }

    let verdict = elapsed.map(classify);

    let reasoning = match (elapsed, verdict) {
        (Some(days), Some(ComplianceVerdict::OnTime)) => format!(
            "{} business days is within the {} day limit",
            days, COMPLIANCE_THRESHOLD_DAYS
        ),
        (Some(days), _) => format!(
            "{} business days exceeds the {} day limit",
            days, COMPLIANCE_THRESHOLD_DAYS
        ),
        (None, _) => "Closure not computable; elapsed days and verdict cleared".to_string(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "compliance_classification".to_string(),
        rule_name: "Compliance Classification".to_string(),
        statute_ref: COMPLIANCE_REF.to_string(),
        input: json!({
            "intake_date": intake_text,
            "closure_date": closure_text,
            "threshold_business_days": COMPLIANCE_THRESHOLD_DAYS,
            "year_boundary_policy": calendar.policy().to_string(),
        }),
        output: json!({
            "elapsed_business_days": elapsed,
            "compliance_verdict": verdict,
        }),
        reasoning,
    };

    ComplianceResult {
        elapsed_business_days: elapsed,
        verdict,
        audit_step,
        warnings,
    }
}
