//! Deadline and compliance calculations for the FOI Deadline Engine.
//!
//! This module contains the national holiday calendar, business-day
//! arithmetic, tolerant date parsing, the collaboration and adjusted deadline
//! derivations, compliance classification, and the update cascade that keeps a
//! request's derived fields consistent with its inputs.

mod business_days;
mod cascade;
mod compliance;
mod date_parser;
mod deadlines;
mod holidays;

pub use business_days::{
    BusinessCalendar, YearBoundaryPolicy, add_business_days, count_business_days,
    elapsed_business_days, is_business_day,
};
pub use cascade::{
    CascadeOutcome, UpdateCascade, derive_on_closure, derive_on_collaboration_dispatch,
    derive_on_dispatch_or_flag_change,
};
pub use compliance::{COMPLIANCE_THRESHOLD_DAYS, ComplianceResult, calculate_compliance, classify};
pub use date_parser::{CANONICAL_DATE_FORMAT, format_date, normalize_date_text, parse_date};
pub use deadlines::{
    AdjustedDeadlineResult, COLLABORATION_WINDOW_DAYS, CollaborationDeadlineResult,
    EXTENSION_EXTRA_DAYS, OBJECTION_EXTRA_DAYS, REMEDIATION_EXTRA_DAYS, adjusted_due_date,
    calculate_adjusted_deadline, calculate_collaboration_deadline, collaboration_due_date,
    extra_business_days,
};
pub use holidays::{FIXED_HOLIDAYS, Holiday, holiday_dates, holidays_for_year, is_fixed_holiday};
