//! Configuration types for the deadline engine.
//!
//! These structures are deserialized from `engine.yaml`. Every section has a
//! default, so a file only needs to name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::calculation::{BusinessCalendar, YearBoundaryPolicy};
use crate::report::CsvReportOptions;

/// Metadata about the governing statute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatuteMetadata {
    /// Short code for the statute (e.g., "LEY-20285").
    pub code: String,
    /// The human-readable name of the statute.
    pub name: String,
    /// URL to the official text.
    pub source_url: String,
}

impl Default for StatuteMetadata {
    fn default() -> Self {
        Self {
            code: "LEY-20285".to_string(),
            name: "Access to Public Information Act".to_string(),
            source_url: "https://www.bcn.cl/leychile/navegar?idNorma=276363".to_string(),
        }
    }
}

/// Holiday calendar settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Which years' holidays apply to a span of dates.
    pub year_boundary: YearBoundaryPolicy,
}

impl CalendarConfig {
    /// Builds the business calendar these settings describe.
    pub fn business_calendar(&self) -> BusinessCalendar {
        BusinessCalendar::new(self.year_boundary)
    }
}

/// Report output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Prefix CSV exports with a UTF-8 byte order mark.
    pub include_bom: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { include_bom: true }
    }
}

impl ReportConfig {
    /// Returns the CSV writer options for these settings.
    pub fn csv_options(&self) -> CsvReportOptions {
        CsvReportOptions {
            include_bom: self.include_bom,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Statute metadata.
    pub statute: StatuteMetadata,
    /// Holiday calendar settings.
    pub calendar: CalendarConfig,
    /// Report output settings.
    pub report: ReportConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub telemetry: TelemetryConfig,
}
