//! Summary statistics over a set of request records.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{ComplianceVerdict, Department, RequestRecord, RequestStatus};

/// Requests assigned to one responding department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentCount {
    /// The department.
    pub department: Department,
    /// Number of requests assigned to it.
    pub count: usize,
}

/// Aggregate figures for a set of requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of requests.
    pub total: usize,
    /// Requests closed within the statutory window.
    pub on_time: usize,
    /// Requests closed after the statutory window.
    pub overdue: usize,
    /// Mean elapsed business days over requests with a positive count,
    /// rounded to one decimal place. Absent when no request qualifies.
    pub average_business_days: Option<Decimal>,
    /// Requests referred to another body.
    pub referred: usize,
    /// Requests denied.
    pub denied: usize,
    /// Requests withdrawn by the applicant.
    pub withdrawn: usize,
    /// Requests with an objection.
    pub with_objection: usize,
    /// Requests with a remediation.
    pub with_remediation: usize,
    /// Requests with an extension.
    pub with_extension: usize,
    /// Per-department counts, in fixed department order. The records office
    /// is not listed.
    pub departments: Vec<DepartmentCount>,
}

/// Computes summary statistics over `records`.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::models::RequestRecord;
/// use foi_deadline_engine::report::summarize;
///
/// let records: Vec<RequestRecord> = vec![];
/// let summary = summarize(&records);
/// assert_eq!(summary.total, 0);
/// assert_eq!(summary.average_business_days, None);
/// ```
pub fn summarize<'a, I>(records: I) -> ReportSummary
where
    I: IntoIterator<Item = &'a RequestRecord>,
{
    let mut summary = ReportSummary {
        total: 0,
        on_time: 0,
        overdue: 0,
        average_business_days: None,
        referred: 0,
        denied: 0,
        withdrawn: 0,
        with_objection: 0,
        with_remediation: 0,
        with_extension: 0,
        departments: Department::RESPONDING
            .iter()
            .map(|&department| DepartmentCount {
                department,
                count: 0,
            })
            .collect(),
    };

    let mut day_total: u64 = 0;
    let mut day_records: u64 = 0;

    for record in records {
        summary.total += 1;

        match record.compliance_verdict {
            Some(ComplianceVerdict::OnTime) => summary.on_time += 1,
            Some(ComplianceVerdict::Overdue) => summary.overdue += 1,
            None => {}
        }

        match record.status {
            Some(RequestStatus::Referred) => summary.referred += 1,
            Some(RequestStatus::Denied) => summary.denied += 1,
            Some(RequestStatus::Withdrawn) => summary.withdrawn += 1,
            Some(RequestStatus::Delivered) | None => {}
        }

        summary.with_objection += usize::from(record.objection);
        summary.with_remediation += usize::from(record.remediation);
        summary.with_extension += usize::from(record.extension);

        if let Some(department) = record.department {
            if let Some(entry) = summary
                .departments
                .iter_mut()
                .find(|d| d.department == department)
            {
                entry.count += 1;
            }
        }

        if let Some(days) = record.elapsed_business_days.filter(|&d| d > 0) {
            day_total += u64::from(days);
            day_records += 1;
        }
    }

    summary.average_business_days = average(day_total, day_records);
    summary
}

fn average(total: u64, count: u64) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    let mut mean = (Decimal::from(total) / Decimal::from(count))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    mean.rescale(1);
    Some(mean)
}
