use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::ConfigError;

/// Runtime tuning for the engine and scheduler.
///
/// Loaded from camelCase JSON. Every field is optional and falls back to the
/// defaults in [`crate::constants`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Delay between reconciliation passes, in milliseconds
    pub poll_interval_ms: u64,
    /// Delay between probes for a non-empty window, in milliseconds
    pub probe_delay_ms: u64,
    /// Probes before falling back to the long wait
    pub probe_retries: u32,
    /// First long wait after an exhausted probe, in milliseconds
    pub backoff_base_ms: u64,
    /// Cap for the doubling long wait, in milliseconds
    pub backoff_max_ms: u64,
    /// Distinct recent authors kept per root message
    pub max_recent_authors: usize,
    /// Scroll offset at or below which older messages are requested
    pub pagination_threshold: f64,
    /// Host application title used for detection
    pub host_title: String,
    /// Class of the counters painted into the page
    pub counter_class: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: constants::LOOP_DELAY.as_millis() as u64,
            probe_delay_ms: constants::FAST_LOOP_DELAY.as_millis() as u64,
            probe_retries: constants::PROBE_RETRIES,
            backoff_base_ms: constants::LOOP_DELAY.as_millis() as u64,
            backoff_max_ms: constants::MAX_BACKOFF_DELAY.as_millis() as u64,
            max_recent_authors: constants::MAX_RECENT_AUTHORS,
            pagination_threshold: constants::INFINITE_SCROLL_HEIGHT,
            host_title: constants::HOST_APP_TITLE.to_string(),
            counter_class: constants::COUNTER_CLASS.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate config from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "pollIntervalMs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.probe_retries == 0 {
            return Err(ConfigError::Invalid {
                field: "probeRetries",
                reason: "must probe at least once".to_string(),
            });
        }
        if self.max_recent_authors == 0 {
            return Err(ConfigError::Invalid {
                field: "maxRecentAuthors",
                reason: "must keep at least one author".to_string(),
            });
        }
        if self.backoff_max_ms < self.backoff_base_ms {
            return Err(ConfigError::Invalid {
                field: "backoffMaxMs",
                reason: format!(
                    "{} is below backoffBaseMs ({})",
                    self.backoff_max_ms, self.backoff_base_ms
                ),
            });
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn probe_delay(&self) -> Duration {
        Duration::from_millis(self.probe_delay_ms)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn backoff_max(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }
}
