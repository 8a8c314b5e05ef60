//! Request record model and related types.
//!
//! This module defines the [`RequestRecord`] tracked through the statutory
//! response workflow, together with the enums describing its routing and
//! outcome.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::normalize_date_text;

/// How the request is being answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// The request is being answered in-house.
    #[default]
    UnderReview,
    /// The request is referred to another public body; routed via the records office.
    Referral,
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseType::UnderReview => write!(f, "Under review"),
            ResponseType::Referral => write!(f, "Referral"),
        }
    }
}

/// The department responsible for answering a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    /// Legal affairs.
    Legal,
    /// Human resources.
    People,
    /// Operations.
    Operations,
    /// Finance.
    Finance,
    /// Information technology.
    It,
    /// Communications.
    Communications,
    /// The records office, which handles all referrals.
    RecordsOffice,
}

impl Department {
    /// Departments that answer requests themselves, in display order.
    pub const RESPONDING: [Department; 6] = [
        Department::Legal,
        Department::People,
        Department::Operations,
        Department::Finance,
        Department::It,
        Department::Communications,
    ];
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Department::Legal => write!(f, "Legal"),
            Department::People => write!(f, "People"),
            Department::Operations => write!(f, "Operations"),
            Department::Finance => write!(f, "Finance"),
            Department::It => write!(f, "IT"),
            Department::Communications => write!(f, "Communications"),
            Department::RecordsOffice => write!(f, "Records Office"),
        }
    }
}

/// The final outcome recorded for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// The information was delivered.
    Delivered,
    /// The request was referred to another body.
    Referred,
    /// Access was denied.
    Denied,
    /// The applicant withdrew the request.
    Withdrawn,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Delivered => write!(f, "Delivered"),
            RequestStatus::Referred => write!(f, "Referred"),
            RequestStatus::Denied => write!(f, "Denied"),
            RequestStatus::Withdrawn => write!(f, "Withdrawn"),
        }
    }
}

/// Whether a closed request was answered within the statutory window.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::models::ComplianceVerdict;
///
/// let verdict: ComplianceVerdict = serde_json::from_str("\"on_time\"").unwrap();
/// assert_eq!(verdict, ComplianceVerdict::OnTime);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceVerdict {
    /// Closed within the statutory number of business days.
    OnTime,
    /// Closed after the statutory number of business days.
    Overdue,
}

impl std::fmt::Display for ComplianceVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceVerdict::OnTime => write!(f, "On time"),
            ComplianceVerdict::Overdue => write!(f, "Overdue"),
        }
    }
}

/// The three independent deadline-extending conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtensionFlags {
    /// A third party objected to disclosure.
    pub objection: bool,
    /// The applicant was asked to remedy the request.
    pub remediation: bool,
    /// The response period was formally extended.
    pub extension: bool,
}

impl ExtensionFlags {
    /// Returns true if at least one flag is set.
    pub fn any(&self) -> bool {
        self.objection || self.remediation || self.extension
    }
}

/// The fields an intake collaborator extracts from a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeDetails {
    /// The public request number (e.g. "AH010T0001234").
    pub request_number: String,
    /// The applicant's full name.
    pub applicant_name: String,
    /// The intake date as written on the source document.
    pub intake_date: String,
    /// The preliminary statutory due date as written on the source document.
    pub initial_due_date: String,
}

/// A freedom-of-information request tracked through the deadline workflow.
///
/// Fields marked *derived* are owned by the update cascade and are rewritten
/// whenever their inputs change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The public request number.
    pub request_number: String,
    /// The applicant's full name.
    pub applicant_name: String,
    /// The statutory clock start (`dd/mm/yyyy`).
    pub intake_date: String,
    /// The preliminary statutory due date supplied at intake.
    pub initial_due_date: String,
    /// Due date after extensions (`dd/mm/yyyy`). *Derived.*
    #[serde(default)]
    pub adjusted_due_date_label: Option<String>,
    /// How the request is being answered.
    #[serde(default)]
    pub response_type: ResponseType,
    /// The responsible department.
    #[serde(default)]
    pub department: Option<Department>,
    /// When the case was handed to a collaborating department.
    #[serde(default)]
    pub collaboration_dispatch_date: Option<String>,
    /// Collaboration window end. *Derived.*
    #[serde(default)]
    pub collaboration_due_date: Option<NaiveDate>,
    /// Third-party objection flag.
    #[serde(default)]
    pub objection: bool,
    /// Remediation flag.
    #[serde(default)]
    pub remediation: bool,
    /// Extension flag.
    #[serde(default)]
    pub extension: bool,
    /// When the final response was sent out.
    #[serde(default)]
    pub dispatch_date: Option<String>,
    /// The recorded outcome.
    #[serde(default)]
    pub status: Option<RequestStatus>,
    /// When the case was formally closed.
    #[serde(default)]
    pub closure_date: Option<String>,
    /// Business days from intake to closure, inclusive. *Derived.*
    #[serde(default)]
    pub elapsed_business_days: Option<u32>,
    /// On-time or overdue. *Derived.*
    #[serde(default)]
    pub compliance_verdict: Option<ComplianceVerdict>,
    /// Free-text tag.
    #[serde(default)]
    pub label: String,
}

impl RequestRecord {
    /// Creates a new record from intake details.
    ///
    /// The record gets a fresh id, the intake date is normalized to
    /// `dd/mm/yyyy` where possible, the response type starts as
    /// [`ResponseType::UnderReview`], all flags are clear and no derived field
    /// is populated.
    ///
    /// # Example
    ///
    /// ```
    /// use foi_deadline_engine::models::{IntakeDetails, RequestRecord, ResponseType};
    ///
    /// let record = RequestRecord::from_intake(IntakeDetails {
    ///     request_number: "AH010T0001234".to_string(),
    ///     applicant_name: "Ana Rojas".to_string(),
    ///     intake_date: "2025-01-06".to_string(),
    ///     initial_due_date: "03/02/2025".to_string(),
    /// });
    ///
    /// assert_eq!(record.intake_date, "06/01/2025");
    /// assert_eq!(record.response_type, ResponseType::UnderReview);
    /// assert!(record.compliance_verdict.is_none());
    /// ```
    pub fn from_intake(details: IntakeDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            request_number: details.request_number,
            applicant_name: details.applicant_name,
            intake_date: normalize_date_text(&details.intake_date),
            initial_due_date: details.initial_due_date,
            adjusted_due_date_label: None,
            response_type: ResponseType::UnderReview,
            department: None,
            collaboration_dispatch_date: None,
            collaboration_due_date: None,
            objection: false,
            remediation: false,
            extension: false,
            dispatch_date: None,
            status: None,
            closure_date: None,
            elapsed_business_days: None,
            compliance_verdict: None,
            label: String::new(),
        }
    }

    /// Returns the current extension flags.
    pub fn extension_flags(&self) -> ExtensionFlags {
        ExtensionFlags {
            objection: self.objection,
            remediation: self.remediation,
            extension: self.extension,
        }
    }

    /// Returns the due date to display: the adjusted one if any, else the initial one.
    pub fn effective_due_date(&self) -> &str {
        self.adjusted_due_date_label
            .as_deref()
            .unwrap_or(&self.initial_due_date)
    }

    /// Returns the trailing run of digits in the request number, or 0 if there is none.
    /// A run too large for `u64` saturates to `u64::MAX` so it still sorts last.
    ///
    /// # Example
    ///
    /// ```
    /// use foi_deadline_engine::models::{IntakeDetails, RequestRecord};
    ///
    /// let record = RequestRecord::from_intake(IntakeDetails {
    ///     request_number: "AH010T0001234".to_string(),
    ///     applicant_name: String::new(),
    ///     intake_date: String::new(),
    ///     initial_due_date: String::new(),
    /// });
    /// assert_eq!(record.sequence_number(), 1234);
    /// ```
    pub fn sequence_number(&self) -> u64 {
        let digits_start = self
            .request_number
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .len();
        let digits = &self.request_number[digits_start..];
        if digits.is_empty() {
            return 0;
        }
        // Only overflow can fail on a non-empty ASCII digit run
        digits.parse().unwrap_or(u64::MAX)
    }

    /// Forces referrals onto the records office.
    pub(crate) fn route_referral(&mut self) {
        if self.response_type == ResponseType::Referral {
            self.department = Some(Department::RecordsOffice);
        }
    }
}
