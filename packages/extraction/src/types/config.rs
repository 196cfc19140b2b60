//! Configuration for a pipeline run.

use std::time::Duration;

/// Timing and currency settings for the pipeline coordinator.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pause after normalizing and after classifying. Default: 5s.
    pub stage_cooldown: Duration,

    /// Upper bound on everything before delivery. Default: 300s.
    pub run_timeout: Duration,

    /// Currency the booking system stores amounts in. Default: CAD.
    pub home_currency: String,

    /// Bound on the single exchange rate lookup. Default: 10s.
    pub rate_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_cooldown: Duration::from_secs(5),
            run_timeout: Duration::from_secs(300),
            home_currency: "CAD".to_string(),
            rate_timeout: Duration::from_secs(10),
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cooldown between model-backed stages.
    pub fn with_stage_cooldown(mut self, cooldown: Duration) -> Self {
        self.stage_cooldown = cooldown;
        self
    }

    /// Set the run timeout.
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    /// Set the home currency (three-letter code).
    pub fn with_home_currency(mut self, currency: impl Into<String>) -> Self {
        self.home_currency = currency.into().to_ascii_uppercase();
        self
    }

    /// Set the exchange rate lookup timeout.
    pub fn with_rate_timeout(mut self, timeout: Duration) -> Self {
        self.rate_timeout = timeout;
        self
    }
}
