//! Monitor Configuration
//!
//! Settings of a drift monitoring run. Values come from defaults, optionally a JSON
//! file, then environment variables, and are validated before a run starts.
use crate::constants::{DEFAULT_ARCHIVE_PREFIX, DEFAULT_DRIFT_THRESHOLD, DEFAULT_TARGET_COLUMNS};
use crate::drift::stats::KsMethod;
use crate::errors::DriftError;
use crate::utils::validate_number_parameter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const ENV_THRESHOLD: &str = "DRIFT_THRESHOLD";
pub const ENV_TARGET_COLUMNS: &str = "DRIFT_TARGET_COLUMNS";
pub const ENV_ALERT_WEBHOOK: &str = "DRIFT_ALERT_WEBHOOK";
pub const ENV_ARCHIVE_PREFIX: &str = "DRIFT_ARCHIVE_PREFIX";

fn default_threshold() -> f64 {
    DEFAULT_DRIFT_THRESHOLD
}
fn default_target_columns() -> Vec<String> {
    DEFAULT_TARGET_COLUMNS.iter().map(|c| c.to_string()).collect()
}
fn default_parallel() -> bool {
    true
}
fn default_num_threads() -> Option<usize> {
    None
}
fn default_archive_prefix() -> String {
    DEFAULT_ARCHIVE_PREFIX.to_string()
}
fn default_alert_webhook() -> Option<String> {
    None
}

/// Configuration for the `DriftMonitor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Tolerated share of drifted features, an alert is raised above it.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Label columns left out of the comparison.
    #[serde(default = "default_target_columns")]
    pub target_columns: Vec<String>,
    /// How KS p-values are computed.
    #[serde(default)]
    pub ks_method: KsMethod,
    /// Whether features are tested in parallel.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Number of threads for parallel tests, the global pool is used when unset.
    #[serde(default = "default_num_threads")]
    pub num_threads: Option<usize>,
    /// Key prefix of archived reports.
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,
    /// Webhook receiving drift alerts.
    #[serde(default = "default_alert_webhook")]
    pub alert_webhook: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            threshold: default_threshold(),
            target_columns: default_target_columns(),
            ks_method: KsMethod::Auto,
            parallel: default_parallel(),
            num_threads: default_num_threads(),
            archive_prefix: default_archive_prefix(),
            alert_webhook: default_alert_webhook(),
        }
    }
}

impl MonitorConfig {
    /// Load a configuration from a JSON string, missing fields take their defaults.
    pub fn from_json(json_str: &str) -> Result<Self, DriftError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| DriftError::UnableToReadConfig(e.to_string()))
    }

    /// Dump the configuration as a JSON string.
    pub fn json_dump(&self) -> Result<String, DriftError> {
        serde_json::to_string_pretty(self).map_err(|e| DriftError::UnableToWrite(e.to_string()))
    }

    /// Load a configuration from a JSON file.
    ///
    /// * `path` - Path of the JSON file.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Self, DriftError> {
        let json_str = fs::read_to_string(path).map_err(|e| DriftError::UnableToReadConfig(e.to_string()))?;
        Self::from_json(&json_str)
    }

    /// Save the configuration as a JSON file.
    pub fn save_config<P: AsRef<Path>>(&self, path: P) -> Result<(), DriftError> {
        fs::write(path, self.json_dump()?).map_err(|e| DriftError::UnableToWrite(e.to_string()))
    }

    /// Override settings from process environment variables.
    pub fn apply_env(self) -> Result<Self, DriftError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Override settings from variables provided by `lookup`.
    ///
    /// Empty values are ignored. `DRIFT_TARGET_COLUMNS` is a comma separated list.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self, DriftError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_THRESHOLD) {
            self.threshold = v.trim().parse::<f64>().map_err(|_| {
                DriftError::InvalidParameter(ENV_THRESHOLD.to_string(), "a real number".to_string(), v.clone())
            })?;
        }
        if let Some(v) = get(ENV_TARGET_COLUMNS) {
            self.target_columns = v
                .split(',')
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(|c| c.to_string())
                .collect();
        }
        if let Some(v) = get(ENV_ALERT_WEBHOOK) {
            self.alert_webhook = Some(v);
        }
        if let Some(v) = get(ENV_ARCHIVE_PREFIX) {
            self.archive_prefix = v;
        }
        Ok(self)
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<(), DriftError> {
        validate_number_parameter(self.threshold, "threshold")?;
        if self.num_threads == Some(0) {
            return Err(DriftError::InvalidParameter(
                "num_threads".to_string(),
                "a positive number of threads".to_string(),
                "0".to_string(),
            ));
        }
        Ok(())
    }

    // Set methods for parameters

    /// Set the drift threshold.
    /// * `threshold` - Tolerated share of drifted features.
    pub fn set_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the label columns left out of the comparison.
    pub fn set_target_columns(mut self, target_columns: Vec<String>) -> Self {
        self.target_columns = target_columns;
        self
    }

    /// Set how KS p-values are computed.
    pub fn set_ks_method(mut self, ks_method: KsMethod) -> Self {
        self.ks_method = ks_method;
        self
    }

    /// Set whether features are tested in parallel.
    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the number of threads.
    /// * `num_threads` - Threads used for parallel tests, `None` uses the global pool.
    pub fn set_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn set_archive_prefix(mut self, archive_prefix: impl Into<String>) -> Self {
        self.archive_prefix = archive_prefix.into();
        self
    }

    pub fn set_alert_webhook(mut self, alert_webhook: Option<String>) -> Self {
        self.alert_webhook = alert_webhook;
        self
    }
}
