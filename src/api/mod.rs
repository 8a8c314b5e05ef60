//! HTTP API module for the FOI Deadline Engine.
//!
//! This module exposes the deadline derivations, business-day calculators,
//! the holiday calendar and the reports as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AddBusinessDaysRequest, CountBusinessDaysRequest, DeriveRequest, MAX_BUSINESS_DAYS_TO_ADD,
    MAX_COUNT_SPAN_DAYS,
};
pub use response::{
    AddBusinessDaysResponse, ApiError, ApiErrorResponse, CountBusinessDaysResponse,
    DeriveResponse,
};
pub use state::AppState;
