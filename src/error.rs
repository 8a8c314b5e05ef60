//! Error types for the FOI Deadline Engine.
//!
//! The date arithmetic itself never fails: an unparseable or missing date is
//! reported as `None`. The errors here cover the fallible edges around the
//! engine (configuration files, registry lookups, report writing and API
//! payloads).

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the FOI Deadline Engine.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No request with the given id is held by the registry.
    #[error("Request not found: {id}")]
    RequestNotFound {
        /// The id that was looked up.
        id: Uuid,
    },

    /// A request with the given id is already held by the registry.
    #[error("Duplicate request id: {id}")]
    DuplicateRequest {
        /// The conflicting id.
        id: Uuid,
    },

    /// A caller-supplied date could not be parsed where one is mandatory.
    #[error("Invalid date for '{field}': {value}")]
    InvalidDate {
        /// The name of the input field.
        field: String,
        /// The text that failed to parse.
        value: String,
    },

    /// A report could not be produced.
    #[error("Report error: {message}")]
    Report {
        /// A description of the failure.
        message: String,
    },
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::Report {
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
