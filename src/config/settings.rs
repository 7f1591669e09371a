//! User settings for SplitWallet
//!
//! Manages alert thresholds, threshold-service access, retry bounds and the
//! reset scheduler interval.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// How the ledger reaches the threshold evaluator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdSettings {
    /// Remote evaluator URL; the in-process evaluator is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff between attempts, doubled after each failure
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_timeout_ms() -> u64 {
    2_000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    100
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl ThresholdSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// User settings for SplitWallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Currency symbol printed in front of amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Percent of the allowance at which a near-limit alert fires
    #[serde(default = "default_near_limit_percent")]
    pub near_limit_percent: f64,

    #[serde(default)]
    pub threshold: ThresholdSettings,

    /// Re-read/re-apply attempts after a concurrent-write conflict
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,

    /// Participant accounts updated in parallel for one expense
    #[serde(default = "default_allocation_concurrency")]
    pub allocation_concurrency: usize,

    /// Seconds between scheduled reset sweeps
    #[serde(default = "default_reset_interval_secs")]
    pub reset_interval_secs: u64,
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_near_limit_percent() -> f64 {
    80.0
}

fn default_max_conflict_retries() -> u32 {
    5
}

fn default_allocation_concurrency() -> usize {
    8
}

fn default_reset_interval_secs() -> u64 {
    3_600
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency(),
            near_limit_percent: default_near_limit_percent(),
            threshold: ThresholdSettings::default(),
            max_conflict_retries: default_max_conflict_retries(),
            allocation_concurrency: default_allocation_concurrency(),
            reset_interval_secs: default_reset_interval_secs(),
        }
    }
}

impl Settings {
    pub fn reset_interval(&self) -> Duration {
        Duration::from_secs(self.reset_interval_secs.max(1))
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !(self.near_limit_percent > 0.0 && self.near_limit_percent < 100.0) {
            return Err(LedgerError::Config(format!(
                "near_limit_percent must be between 0 and 100, got {}",
                self.near_limit_percent
            )));
        }
        if self.threshold.max_attempts == 0 {
            return Err(LedgerError::Config(
                "threshold.max_attempts must be at least 1".into(),
            ));
        }
        if self.allocation_concurrency == 0 {
            return Err(LedgerError::Config(
                "allocation_concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                LedgerError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            LedgerError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
