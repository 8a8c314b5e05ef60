//! Deadline derivations.
//!
//! Two deadlines are derived for a request: the internal collaboration due
//! date (a fixed window after the case is handed to a partner department) and
//! the adjusted statutory due date (the outward dispatch date pushed back by
//! every active extension flag).

use chrono::NaiveDate;
use serde_json::json;

use crate::models::{AuditStep, AuditWarning, ExtensionFlags};

use super::business_days::BusinessCalendar;
use super::date_parser::{format_date, parse_date};

/// Business days a collaborating department has to respond.
pub const COLLABORATION_WINDOW_DAYS: u32 = 5;

/// Extra business days granted by a third-party objection.
pub const OBJECTION_EXTRA_DAYS: u32 = 3;

/// Extra business days granted when the applicant must remedy the request.
pub const REMEDIATION_EXTRA_DAYS: u32 = 5;

/// Extra business days granted by a formal extension.
pub const EXTENSION_EXTRA_DAYS: u32 = 10;

const COLLABORATION_REF: &str = "Internal collaboration procedure";
const EXTENSION_REF: &str = "Arts. 12, 14, 20";

/// Returns the total extra business days granted by `flags`.
///
/// Contributions are independent and additive.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::calculation::extra_business_days;
/// use foi_deadline_engine::models::ExtensionFlags;
///
/// let all = ExtensionFlags { objection: true, remediation: true, extension: true };
/// assert_eq!(extra_business_days(all), 18);
/// assert_eq!(extra_business_days(ExtensionFlags::default()), 0);
/// ```
pub fn extra_business_days(flags: ExtensionFlags) -> u32 {
    let mut total = 0;
    if flags.objection {
        total += OBJECTION_EXTRA_DAYS;
    }
    if flags.remediation {
        total += REMEDIATION_EXTRA_DAYS;
    }
    if flags.extension {
        total += EXTENSION_EXTRA_DAYS;
    }
    total
}

/// Returns the end of the collaboration window opened on `dispatch`.
pub fn collaboration_due_date(
    calendar: &BusinessCalendar,
    dispatch: NaiveDate,
) -> Option<NaiveDate> {
    calendar.add_business_days(dispatch, COLLABORATION_WINDOW_DAYS)
}

/// Returns the adjusted due date, or `None` when no extension flag is set.
pub fn adjusted_due_date(
    calendar: &BusinessCalendar,
    dispatch: NaiveDate,
    flags: ExtensionFlags,
) -> Option<NaiveDate> {
    if !flags.any() {
        return None;
    }
    calendar.add_business_days(dispatch, extra_business_days(flags))
}

/// The result of deriving the collaboration due date.
#[derive(Debug, Clone)]
pub struct CollaborationDeadlineResult {
    /// The derived due date, absent when the dispatch date is missing or invalid.
    pub due_date: Option<NaiveDate>,
    /// The audit step recording this derivation.
    pub audit_step: AuditStep,
    /// Set when the dispatch date was present but unparseable.
    pub warning: Option<AuditWarning>,
}

/// Derives the collaboration due date from the entered dispatch text.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::calculation::{calculate_collaboration_deadline, BusinessCalendar};
/// use chrono::NaiveDate;
///
/// let calendar = BusinessCalendar::default();
/// let result = calculate_collaboration_deadline(Some("28/04/2025"), &calendar, 1);
/// assert_eq!(result.due_date, NaiveDate::from_ymd_opt(2025, 5, 6));
/// assert_eq!(result.audit_step.rule_id, "collaboration_due_date");
/// ```
pub fn calculate_collaboration_deadline(
    dispatch_text: Option<&str>,
    calendar: &BusinessCalendar,
    step_number: u32,
) -> CollaborationDeadlineResult {
    let dispatch = dispatch_text.and_then(parse_date);
    let due_date = dispatch.and_then(|date| collaboration_due_date(calendar, date));

    let warning = match (dispatch_text, dispatch) {
        (Some(text), None) => Some(AuditWarning::unparseable_date(
            "collaboration_dispatch_date",
            text,
        )),
        _ => None,
    };

    let reasoning = match (dispatch, due_date) {
        (Some(start), Some(due)) => format!(
            "{} plus {} business days is {}",
            format_date(start),
            COLLABORATION_WINDOW_DAYS,
            format_date(due)
        ),
        (Some(start), None) => format!(
            "{} plus {} business days is out of range",
            format_date(start),
            COLLABORATION_WINDOW_DAYS
        ),
        (None, _) => "No valid collaboration dispatch date; due date cleared".to_string(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "collaboration_due_date".to_string(),
        rule_name: "Collaboration Window".to_string(),
        statute_ref: COLLABORATION_REF.to_string(),
        input: json!({
            "collaboration_dispatch_date": dispatch_text,
            "window_business_days": COLLABORATION_WINDOW_DAYS,
            "year_boundary_policy": calendar.policy().to_string(),
        }),
        output: json!({
            "collaboration_due_date": due_date.map(format_date),
        }),
        reasoning,
    };

    CollaborationDeadlineResult {
        due_date,
        audit_step,
        warning,
    }
}

/// The result of deriving the adjusted due date.
#[derive(Debug, Clone)]
pub struct AdjustedDeadlineResult {
    /// The derived `dd/mm/yyyy` label, absent when there is nothing to adjust.
    pub label: Option<String>,
    /// The total extra business days granted by the active flags.
    pub extra_days: u32,
    /// The audit step recording this derivation.
    pub audit_step: AuditStep,
    /// Set when the dispatch date was present but unparseable.
    pub warning: Option<AuditWarning>,
}

/// Derives the adjusted due date label from the dispatch text and all three flags.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::calculation::{calculate_adjusted_deadline, BusinessCalendar};
/// use foi_deadline_engine::models::ExtensionFlags;
///
/// let flags = ExtensionFlags { remediation: true, ..Default::default() };
/// let calendar = BusinessCalendar::default();
/// let result = calculate_adjusted_deadline(Some("06/01/2025"), flags, &calendar, 1);
/// assert_eq!(result.label.as_deref(), Some("13/01/2025"));
/// assert_eq!(result.extra_days, 5);
/// ```
pub fn calculate_adjusted_deadline(
    dispatch_text: Option<&str>,
    flags: ExtensionFlags,
    calendar: &BusinessCalendar,
    step_number: u32,
) -> AdjustedDeadlineResult {
    let dispatch = dispatch_text.and_then(parse_date);
    let extra_days = extra_business_days(flags);
    let label = dispatch
        .and_then(|date| adjusted_due_date(calendar, date, flags))
        .map(format_date);

    let warning = match (dispatch_text, dispatch) {
        (Some(text), None) => Some(AuditWarning::unparseable_date("dispatch_date", text)),
        _ => None,
    };

    let reasoning = match (dispatch, &label) {
        (None, _) => "No valid dispatch date; adjusted due date cleared".to_string(),
        (Some(_), None) if extra_days == 0 => {
            "No extension flag set; the initial due date stands".to_string()
        }
        (Some(start), None) => format!(
            "{} plus {} business days is out of range",
            format_date(start),
            extra_days
        ),
        (Some(start), Some(label)) => format!(
            "{} plus {} business days is {}",
            format_date(start),
            extra_days,
            label
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "adjusted_due_date".to_string(),
        rule_name: "Extension Adjustment".to_string(),
        statute_ref: EXTENSION_REF.to_string(),
        input: json!({
            "dispatch_date": dispatch_text,
            "objection": flags.objection,
            "remediation": flags.remediation,
            "extension": flags.extension,
            "year_boundary_policy": calendar.policy().to_string(),
        }),
        output: json!({
            "extra_business_days": extra_days,
            "adjusted_due_date": label,
        }),
        reasoning,
    };

    AdjustedDeadlineResult {
        label,
        extra_days,
        audit_step,
        warning,
    }
}
