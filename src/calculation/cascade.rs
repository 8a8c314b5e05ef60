//! The update cascade.
//!
//! Applies a set of field changes to a request and recomputes every derived
//! field whose inputs were touched. Derivations read the full post-update
//! record, so the result depends only on the final field values and not on the
//! order in which the changes were made.

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::debug;

use crate::models::{
    AuditStep, AuditTrace, AuditWarning, DispatchUpdate, FieldChange, RequestRecord, Trigger,
};

use super::business_days::BusinessCalendar;
use super::compliance::calculate_compliance;
use super::deadlines::{calculate_adjusted_deadline, calculate_collaboration_deadline};

/// The result of running the cascade over one update.
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    /// The updated record with every affected derived field recomputed.
    pub record: RequestRecord,
    /// The triggers that ran, in cascade order.
    pub triggers: Vec<Trigger>,
    /// The derivation audit trail.
    pub audit_trace: AuditTrace,
}

/// Recomputes derived request fields after an edit.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::calculation::UpdateCascade;
/// use foi_deadline_engine::models::{FieldChange, IntakeDetails, RequestRecord};
///
/// let record = RequestRecord::from_intake(IntakeDetails {
///     request_number: "AH010T0000001".to_string(),
///     applicant_name: "Ana Rojas".to_string(),
///     intake_date: "06/01/2025".to_string(),
///     initial_due_date: "03/02/2025".to_string(),
/// });
///
/// let outcome = UpdateCascade::default().apply(
///     &record,
///     &[
///         FieldChange::DispatchDate(Some("06/01/2025".to_string())),
///         FieldChange::Remediation(true),
///     ],
/// );
/// assert_eq!(outcome.record.adjusted_due_date_label.as_deref(), Some("13/01/2025"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateCascade {
    calendar: BusinessCalendar,
}

impl UpdateCascade {
    /// Creates a cascade computing against `calendar`.
    pub const fn new(calendar: BusinessCalendar) -> Self {
        Self { calendar }
    }

    /// Returns the business calendar used for derivations.
    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    /// Applies `changes` to a copy of `record` and recomputes the affected derived fields.
    pub fn apply(&self, record: &RequestRecord, changes: &[FieldChange]) -> CascadeOutcome {
        let mut updated = record.clone();
        let (triggers, audit_trace) = self.apply_in_place(&mut updated, changes);
        CascadeOutcome {
            record: updated,
            triggers,
            audit_trace,
        }
    }

    /// Applies `changes` to `record` in place.
    ///
    /// All raw field values are written before any derivation runs. When the
    /// response type is among the changes, a referral then overrides whatever
    /// department the same update set.
    pub fn apply_in_place(
        &self,
        record: &mut RequestRecord,
        changes: &[FieldChange],
    ) -> (Vec<Trigger>, AuditTrace) {
        let mut triggers = BTreeSet::new();
        let mut response_type_changed = false;
        for change in changes {
            change.apply_to(record);
            response_type_changed |= matches!(change, FieldChange::ResponseType(_));
            if let Some(trigger) = change.trigger() {
                triggers.insert(trigger);
            }
        }
        if response_type_changed {
            record.route_referral();
        }

        let triggers: Vec<Trigger> = triggers.into_iter().collect();
        let audit_trace = self.run(record, &triggers);
        (triggers, audit_trace)
    }

    /// Recomputes every derived field of `record` from its current inputs.
    ///
    /// Used when records are loaded from an external store and their derived
    /// fields cannot be trusted.
    pub fn refresh(&self, record: &mut RequestRecord) -> AuditTrace {
        self.run(record, &Trigger::ALL)
    }

    fn run(&self, record: &mut RequestRecord, triggers: &[Trigger]) -> AuditTrace {
        let start_time = Instant::now();
        let mut steps: Vec<AuditStep> = Vec::with_capacity(triggers.len());
        let mut warnings: Vec<AuditWarning> = Vec::new();

        for (index, trigger) in triggers.iter().enumerate() {
            let step_number = index as u32 + 1;
            match trigger {
                Trigger::CollaborationDispatchChanged => {
                    let result = calculate_collaboration_deadline(
                        record.collaboration_dispatch_date.as_deref(),
                        &self.calendar,
                        step_number,
                    );
                    record.collaboration_due_date = result.due_date;
                    steps.push(result.audit_step);
                    warnings.extend(result.warning);
                }
                Trigger::DispatchOrFlagsChanged => {
                    let result = calculate_adjusted_deadline(
                        record.dispatch_date.as_deref(),
                        record.extension_flags(),
                        &self.calendar,
                        step_number,
                    );
                    record.adjusted_due_date_label = result.label;
                    steps.push(result.audit_step);
                    warnings.extend(result.warning);
                }
                Trigger::ClosureChanged => {
                    let result = calculate_compliance(
                        &record.intake_date,
                        record.closure_date.as_deref(),
                        &self.calendar,
                        step_number,
                    );
                    record.elapsed_business_days = result.elapsed_business_days;
                    record.compliance_verdict = result.verdict;
                    steps.push(result.audit_step);
                    warnings.extend(result.warnings);
                }
            }
        }

        debug!(
            request_id = %record.id,
            triggers = ?triggers,
            warnings = warnings.len(),
            "Derived fields recomputed"
        );

        AuditTrace {
            steps,
            warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        }
    }
}

/// Records a new collaboration dispatch date and recomputes the collaboration due date.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::calculation::derive_on_collaboration_dispatch;
/// use foi_deadline_engine::models::{IntakeDetails, RequestRecord};
/// use chrono::NaiveDate;
///
/// let record = RequestRecord::from_intake(IntakeDetails {
///     request_number: "AH010T0000001".to_string(),
///     applicant_name: "Ana Rojas".to_string(),
///     intake_date: "21/04/2025".to_string(),
///     initial_due_date: "20/05/2025".to_string(),
/// });
///
/// let record = derive_on_collaboration_dispatch(record, Some("28/04/2025".to_string()));
/// assert_eq!(record.collaboration_due_date, NaiveDate::from_ymd_opt(2025, 5, 6));
/// ```
pub fn derive_on_collaboration_dispatch(
    record: RequestRecord,
    new_date: Option<String>,
) -> RequestRecord {
    derive(record, &[FieldChange::CollaborationDispatchDate(new_date)])
}

/// Records new dispatch/flag values and recomputes the adjusted due date.
pub fn derive_on_dispatch_or_flag_change(
    record: RequestRecord,
    update: DispatchUpdate,
) -> RequestRecord {
    derive(record, &update.into_changes())
}

/// Records a new closure date and recomputes elapsed business days and the verdict.
pub fn derive_on_closure(record: RequestRecord, new_closure_date: Option<String>) -> RequestRecord {
    derive(record, &[FieldChange::ClosureDate(new_closure_date)])
}

fn derive(mut record: RequestRecord, changes: &[FieldChange]) -> RequestRecord {
    UpdateCascade::default().apply_in_place(&mut record, changes);
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{YearBoundaryPolicy, add_business_days, format_date};
    use crate::models::{ComplianceVerdict, Department, IntakeDetails, ResponseType};
    use chrono::NaiveDate;

    fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_record(intake: &str) -> RequestRecord {
        RequestRecord::from_intake(IntakeDetails {
            request_number: "AH010T0000007".to_string(),
            applicant_name: "Ana Rojas".to_string(),
            intake_date: intake.to_string(),
            initial_due_date: "03/02/2025".to_string(),
        })
    }

    fn text(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    // ==========================================================================
    // Collaboration dispatch
    // ==========================================================================

    #[test]
    fn test_collaboration_dispatch_sets_due_date() {
        let record =
            derive_on_collaboration_dispatch(create_test_record("21/04/2025"), text("28/04/2025"));
        assert_eq!(record.collaboration_due_date, Some(make_date(2025, 5, 6)));
    }

    #[test]
    fn test_clearing_collaboration_dispatch_clears_due_date() {
        let record =
            derive_on_collaboration_dispatch(create_test_record("21/04/2025"), text("28/04/2025"));
        let record = derive_on_collaboration_dispatch(record, None);
        assert_eq!(record.collaboration_dispatch_date, None);
        assert_eq!(record.collaboration_due_date, None);
    }

    #[test]
    fn test_unparseable_collaboration_dispatch_clears_due_date() {
        let record =
            derive_on_collaboration_dispatch(create_test_record("21/04/2025"), text("28/04/2025"));
        let outcome = UpdateCascade::default().apply(
            &record,
            &[FieldChange::CollaborationDispatchDate(text("soon"))],
        );
        assert_eq!(outcome.record.collaboration_dispatch_date.as_deref(), Some("soon"));
        assert_eq!(outcome.record.collaboration_due_date, None);
        assert_eq!(outcome.audit_trace.warnings.len(), 1);
    }

    // ==========================================================================
    // Dispatch and extension flags
    // ==========================================================================

    #[test]
    fn test_dispatch_without_flags_leaves_label_absent() {
        let record = derive_on_dispatch_or_flag_change(
            create_test_record("06/01/2025"),
            DispatchUpdate {
                dispatch_date: Some(text("2025-01-06")),
                ..Default::default()
            },
        );
        assert_eq!(record.adjusted_due_date_label, None);
        assert_eq!(record.effective_due_date(), "03/02/2025");
    }

    #[test]
    fn test_setting_remediation_after_dispatch() {
        let record = derive_on_dispatch_or_flag_change(
            create_test_record("06/01/2025"),
            DispatchUpdate {
                dispatch_date: Some(text("2025-01-06")),
                ..Default::default()
            },
        );
        let record = derive_on_dispatch_or_flag_change(
            record,
            DispatchUpdate {
                remediation: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(record.adjusted_due_date_label.as_deref(), Some("13/01/2025"));
    }

    #[test]
    fn test_flags_accumulate_against_independent_walks() {
        let dispatch = make_date(2025, 1, 6);
        let mut record = create_test_record("06/01/2025");
        record = derive_on_dispatch_or_flag_change(
            record,
            DispatchUpdate {
                dispatch_date: Some(text("06/01/2025")),
                objection: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(
            record.adjusted_due_date_label,
            add_business_days(dispatch, 3).map(format_date)
        );

        record = derive_on_dispatch_or_flag_change(
            record,
            DispatchUpdate {
                remediation: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(
            record.adjusted_due_date_label,
            add_business_days(dispatch, 8).map(format_date)
        );

        record = derive_on_dispatch_or_flag_change(
            record,
            DispatchUpdate {
                extension: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(
            record.adjusted_due_date_label,
            add_business_days(dispatch, 18).map(format_date)
        );
    }

    #[test]
    fn test_sequential_and_simultaneous_flag_toggles_agree() {
        let cascade = UpdateCascade::default();
        let base = cascade
            .apply(
                &create_test_record("06/01/2025"),
                &[FieldChange::DispatchDate(text("06/01/2025"))],
            )
            .record;

        let one_at_a_time = cascade
            .apply(
                &cascade.apply(&base, &[FieldChange::Objection(true)]).record,
                &[FieldChange::Extension(true)],
            )
            .record;
        let together = cascade
            .apply(
                &base,
                &[FieldChange::Extension(true), FieldChange::Objection(true)],
            )
            .record;

        assert_eq!(one_at_a_time, together);
    }

    #[test]
    fn test_clearing_last_flag_clears_label() {
        let cascade = UpdateCascade::default();
        let record = cascade
            .apply(
                &create_test_record("06/01/2025"),
                &[
                    FieldChange::DispatchDate(text("06/01/2025")),
                    FieldChange::Extension(true),
                ],
            )
            .record;
        assert!(record.adjusted_due_date_label.is_some());

        let record = cascade.apply(&record, &[FieldChange::Extension(false)]).record;
        assert_eq!(record.adjusted_due_date_label, None);
    }

    #[test]
    fn test_flag_without_dispatch_date_leaves_label_absent() {
        let outcome = UpdateCascade::default().apply(
            &create_test_record("06/01/2025"),
            &[FieldChange::Objection(true)],
        );
        assert_eq!(outcome.record.adjusted_due_date_label, None);
        assert!(outcome.audit_trace.warnings.is_empty());
    }

    // ==========================================================================
    // Closure
    // ==========================================================================

    #[test]
    fn test_closure_sets_elapsed_days_and_verdict() {
        let record = derive_on_closure(create_test_record("01/01/2025"), text("2025-01-31"));
        assert_eq!(record.elapsed_business_days, Some(22));
        assert_eq!(record.compliance_verdict, Some(ComplianceVerdict::Overdue));
    }

    #[test]
    fn test_clearing_closure_clears_both_fields() {
        let record = derive_on_closure(create_test_record("06/01/2025"), text("31/01/2025"));
        assert_eq!(record.compliance_verdict, Some(ComplianceVerdict::OnTime));

        let record = derive_on_closure(record, None);
        assert_eq!(record.elapsed_business_days, None);
        assert_eq!(record.compliance_verdict, None);
    }

    #[test]
    fn test_invalid_closure_clears_both_fields() {
        let record = derive_on_closure(create_test_record("06/01/2025"), text("31/01/2025"));
        let record = derive_on_closure(record, text("31/02/2025"));
        assert_eq!(record.elapsed_business_days, None);
        assert_eq!(record.compliance_verdict, None);
    }

    #[test]
    fn test_closure_with_unparseable_intake_leaves_pair_absent() {
        let mut record = create_test_record("06/01/2025");
        record.compliance_verdict = Some(ComplianceVerdict::OnTime);
        record.elapsed_business_days = Some(3);
        record.intake_date = "unknown".to_string();

        let record = derive_on_closure(record, text("31/01/2025"));
        assert_eq!(record.elapsed_business_days, None);
        assert_eq!(record.compliance_verdict, None);
    }

    // ==========================================================================
    // Multi-group updates and bookkeeping
    // ==========================================================================

    #[test]
    fn test_update_touching_every_group_runs_every_trigger() {
        let outcome = UpdateCascade::default().apply(
            &create_test_record("21/04/2025"),
            &[
                FieldChange::ClosureDate(text("16/05/2025")),
                FieldChange::CollaborationDispatchDate(text("28/04/2025")),
                FieldChange::DispatchDate(text("12/05/2025")),
                FieldChange::Objection(true),
            ],
        );

        assert_eq!(outcome.triggers, Trigger::ALL.to_vec());
        assert_eq!(outcome.audit_trace.steps.len(), 3);
        assert_eq!(outcome.audit_trace.steps[0].rule_id, "collaboration_due_date");
        assert_eq!(outcome.audit_trace.steps[2].step_number, 3);

        let record = outcome.record;
        assert_eq!(record.collaboration_due_date, Some(make_date(2025, 5, 6)));
        // Monday 12/05 + 3 = Thursday 15/05
        assert_eq!(record.adjusted_due_date_label.as_deref(), Some("15/05/2025"));
        // 21/04 to 16/05: 20 weekdays less Labour Day
        assert_eq!(record.elapsed_business_days, Some(19));
        assert_eq!(record.compliance_verdict, Some(ComplianceVerdict::OnTime));
    }

    #[test]
    fn test_descriptive_change_runs_no_derivation() {
        let outcome = UpdateCascade::default().apply(
            &create_test_record("06/01/2025"),
            &[FieldChange::Label("urgent".to_string())],
        );
        assert!(outcome.triggers.is_empty());
        assert!(outcome.audit_trace.steps.is_empty());
        assert_eq!(outcome.record.label, "urgent");
    }

    #[test]
    fn test_referral_routes_to_records_office() {
        let outcome = UpdateCascade::default().apply(
            &create_test_record("06/01/2025"),
            &[
                FieldChange::Department(Some(Department::Legal)),
                FieldChange::ResponseType(ResponseType::Referral),
            ],
        );
        assert_eq!(outcome.record.department, Some(Department::RecordsOffice));
    }

    #[test]
    fn test_referral_overrides_department_set_later_in_same_update() {
        let outcome = UpdateCascade::default().apply(
            &create_test_record("06/01/2025"),
            &[
                FieldChange::ResponseType(ResponseType::Referral),
                FieldChange::Department(Some(Department::Legal)),
            ],
        );
        assert_eq!(outcome.record.department, Some(Department::RecordsOffice));
    }

    #[test]
    fn test_department_edit_on_existing_referral_is_kept() {
        let mut record = create_test_record("06/01/2025");
        record.response_type = ResponseType::Referral;
        record.department = Some(Department::RecordsOffice);

        let outcome = UpdateCascade::default()
            .apply(&record, &[FieldChange::Department(Some(Department::Legal))]);
        assert_eq!(outcome.record.department, Some(Department::Legal));
    }

    #[test]
    fn test_refresh_recomputes_stale_fields() {
        let mut record = create_test_record("01/01/2025");
        record.closure_date = text("31/01/2025");
        record.compliance_verdict = Some(ComplianceVerdict::OnTime);
        record.elapsed_business_days = Some(1);
        record.adjusted_due_date_label = text("01/01/1999");

        let trace = UpdateCascade::default().refresh(&mut record);

        assert_eq!(trace.steps.len(), 3);
        assert_eq!(record.elapsed_business_days, Some(22));
        assert_eq!(record.compliance_verdict, Some(ComplianceVerdict::Overdue));
        assert_eq!(record.adjusted_due_date_label, None);
        assert_eq!(record.collaboration_due_date, None);
    }

    #[test]
    fn test_cascade_honours_year_boundary_policy() {
        let legacy = UpdateCascade::new(BusinessCalendar::new(YearBoundaryPolicy::StartYearOnly));
        let record = create_test_record("01/12/2025");
        let changes = [FieldChange::CollaborationDispatchDate(text("29/12/2025"))];

        // Dec 30, 31, (Jan 1), Jan 2, 5, 6
        let current = UpdateCascade::default().apply(&record, &changes).record;
        assert_eq!(current.collaboration_due_date, Some(make_date(2026, 1, 6)));

        // Jan 1 counted: Dec 30, 31, Jan 1, 2, 5
        let compatible = legacy.apply(&record, &changes).record;
        assert_eq!(compatible.collaboration_due_date, Some(make_date(2026, 1, 5)));
    }
}
