//! Field changes and the recomputation triggers they raise.
//!
//! An edit to a request is expressed as one or more [`FieldChange`]s. Each
//! change maps to at most one [`Trigger`], which names the group of derived
//! fields that must be recomputed.

use serde::{Deserialize, Serialize};

use super::request::{Department, RequestRecord, RequestStatus, ResponseType};

/// A single edit to a request record.
///
/// Serialized adjacently tagged, e.g. `{"field": "objection", "value": true}`.
/// Date values are carried as entered; `None` clears the field.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::models::{FieldChange, Trigger};
///
/// let change: FieldChange =
///     serde_json::from_str(r#"{"field": "closure_date", "value": "31/01/2025"}"#).unwrap();
/// assert_eq!(change.trigger(), Some(Trigger::ClosureChanged));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldChange {
    /// Hand-off date to a collaborating department.
    CollaborationDispatchDate(Option<String>),
    /// Third-party objection flag.
    Objection(bool),
    /// Remediation flag.
    Remediation(bool),
    /// Extension flag.
    Extension(bool),
    /// Outward dispatch date.
    DispatchDate(Option<String>),
    /// Closure date.
    ClosureDate(Option<String>),
    /// Response type; the cascade moves a referral to the records office.
    ResponseType(ResponseType),
    /// Responsible department.
    Department(Option<Department>),
    /// Recorded outcome.
    Status(Option<RequestStatus>),
    /// Free-text tag.
    Label(String),
}

/// A group of derived fields that must be recomputed.
///
/// Variants are ordered the way the cascade runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Recompute the collaboration due date.
    CollaborationDispatchChanged,
    /// Recompute the adjusted due date.
    DispatchOrFlagsChanged,
    /// Recompute elapsed business days and the compliance verdict.
    ClosureChanged,
}

impl Trigger {
    /// Every trigger, in cascade order.
    pub const ALL: [Trigger; 3] = [
        Trigger::CollaborationDispatchChanged,
        Trigger::DispatchOrFlagsChanged,
        Trigger::ClosureChanged,
    ];
}

impl FieldChange {
    /// Returns the trigger raised by this change, if any.
    pub fn trigger(&self) -> Option<Trigger> {
        match self {
            FieldChange::CollaborationDispatchDate(_) => {
                Some(Trigger::CollaborationDispatchChanged)
            }
            FieldChange::Objection(_)
            | FieldChange::Remediation(_)
            | FieldChange::Extension(_)
            | FieldChange::DispatchDate(_) => Some(Trigger::DispatchOrFlagsChanged),
            FieldChange::ClosureDate(_) => Some(Trigger::ClosureChanged),
            FieldChange::ResponseType(_)
            | FieldChange::Department(_)
            | FieldChange::Status(_)
            | FieldChange::Label(_) => None,
        }
    }

    /// Writes the changed value into `record` without touching derived fields.
    pub(crate) fn apply_to(&self, record: &mut RequestRecord) {
        match self {
            FieldChange::CollaborationDispatchDate(date) => {
                record.collaboration_dispatch_date = date.clone();
            }
            FieldChange::Objection(flag) => record.objection = *flag,
            FieldChange::Remediation(flag) => record.remediation = *flag,
            FieldChange::Extension(flag) => record.extension = *flag,
            FieldChange::DispatchDate(date) => record.dispatch_date = date.clone(),
            FieldChange::ClosureDate(date) => record.closure_date = date.clone(),
            FieldChange::ResponseType(response_type) => record.response_type = *response_type,
            FieldChange::Department(department) => record.department = *department,
            FieldChange::Status(status) => record.status = *status,
            FieldChange::Label(label) => record.label = label.clone(),
        }
    }
}

/// A combined edit of the dispatch date and extension flags.
///
/// `None` leaves a field as it is; for `dispatch_date`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchUpdate {
    /// New dispatch date.
    pub dispatch_date: Option<Option<String>>,
    /// New objection flag.
    pub objection: Option<bool>,
    /// New remediation flag.
    pub remediation: Option<bool>,
    /// New extension flag.
    pub extension: Option<bool>,
}

impl DispatchUpdate {
    /// Expands the update into individual field changes.
    pub fn into_changes(self) -> Vec<FieldChange> {
        let mut changes = Vec::with_capacity(4);
        if let Some(date) = self.dispatch_date {
            changes.push(FieldChange::DispatchDate(date));
        }
        if let Some(flag) = self.objection {
            changes.push(FieldChange::Objection(flag));
        }
        if let Some(flag) = self.remediation {
            changes.push(FieldChange::Remediation(flag));
        }
        if let Some(flag) = self.extension {
            changes.push(FieldChange::Extension(flag));
        }
        changes
    }
}
