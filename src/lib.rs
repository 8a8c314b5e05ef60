//! FOI Deadline Engine
//!
//! This crate computes the statutory deadlines of freedom-of-information
//! requests in business days, keeps each request's derived deadline fields
//! consistent as it is edited, and classifies closed requests as on time or
//! overdue. It also provides CSV and summary reporting and an HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod report;
pub mod telemetry;
