//! Application state for the FOI Deadline Engine API.

use std::sync::Arc;

use crate::calculation::UpdateCascade;
use crate::config::EngineConfig;
use crate::report::CsvReportOptions;

/// Shared application state.
///
/// Holds the loaded configuration and the update cascade built from it.
/// Neither changes after startup.
#[derive(Clone)]
pub struct AppState {
    config: Arc<EngineConfig>,
    cascade: UpdateCascade,
}

impl AppState {
    /// Creates a new application state from the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        let cascade = UpdateCascade::new(config.calendar.business_calendar());
        Self {
            config: Arc::new(config),
            cascade,
        }
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the update cascade.
    pub fn cascade(&self) -> &UpdateCascade {
        &self.cascade
    }

    /// Returns the CSV writer options.
    pub fn csv_options(&self) -> CsvReportOptions {
        self.config.report.csv_options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::YearBoundaryPolicy;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_cascade_follows_configured_policy() {
        let mut config = EngineConfig::default();
        config.calendar.year_boundary = YearBoundaryPolicy::StartYearOnly;
        let state = AppState::new(config);
        assert_eq!(
            state.cascade().calendar().policy(),
            YearBoundaryPolicy::StartYearOnly
        );
    }

    #[test]
    fn test_config_is_shared_between_clones() {
        let state = AppState::new(EngineConfig::default());
        let clone = state.clone();
        assert!(std::ptr::eq(state.config(), clone.config()));
        assert_eq!(clone.config().statute, EngineConfig::default().statute);
    }
}
