//! Core data models for the FOI Deadline Engine.
//!
//! This module contains the request record, the field changes that edit it,
//! and the audit trail produced when derived fields are recomputed.

mod audit;
mod change;
mod request;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use change::{DispatchUpdate, FieldChange, Trigger};
pub use request::{
    ComplianceVerdict, Department, ExtensionFlags, IntakeDetails, RequestRecord, RequestStatus,
    ResponseType,
};
