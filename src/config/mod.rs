//! Configuration loading for the FOI Deadline Engine.
//!
//! Configuration is a single YAML file naming the governing statute, the
//! holiday year-boundary policy, report options, the HTTP bind address and
//! the log filter. Statutory windows are fixed in code, not configured.
//!
//! # Example
//!
//! ```no_run
//! use foi_deadline_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config").unwrap();
//! println!("Loaded statute: {}", loader.config().statute.name);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{
    CalendarConfig, EngineConfig, ReportConfig, ServerConfig, StatuteMetadata, TelemetryConfig,
};
