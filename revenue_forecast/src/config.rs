//! Caller-owned forecasting configuration

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Default number of recent observations behind the daily average
pub const DEFAULT_RECENT_WINDOW: usize = 15;

/// Smallest fixed variance override, in percent
pub const MIN_VARIANCE_OVERRIDE: f64 = 10.0;

/// Largest fixed variance override, in percent
pub const MAX_VARIANCE_OVERRIDE: f64 = 50.0;

/// Settings passed explicitly into every forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastConfig {
    /// Fixed confidence width in percent; `0` means derive it from history.
    /// Values outside 10..=50 are ignored.
    pub variance_override: f64,
    /// Observations averaged for the recent daily run rate
    pub recent_window: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            variance_override: 0.0,
            recent_window: DEFAULT_RECENT_WINDOW,
        }
    }
}

impl ForecastConfig {
    /// Set a fixed variance override in percent
    pub fn with_variance_override(mut self, percent: f64) -> Self {
        self.variance_override = percent;
        self
    }

    /// Set the recent-average window
    pub fn with_recent_window(mut self, window: usize) -> Self {
        self.recent_window = window;
        self
    }

    /// The override as a fraction, or `None` when variance should be computed.
    ///
    /// An out-of-range value is treated as "auto", never as an error.
    pub fn variance_override_fraction(&self) -> Option<f64> {
        let percent = self.variance_override;
        if percent == 0.0 {
            return None;
        }
        if (MIN_VARIANCE_OVERRIDE..=MAX_VARIANCE_OVERRIDE).contains(&percent) {
            Some(percent / 100.0)
        } else {
            warn!(percent, "ignoring out-of-range variance override");
            None
        }
    }

    /// Window for the recent daily average, never zero
    pub fn effective_recent_window(&self) -> usize {
        if self.recent_window == 0 {
            warn!("recent window of 0 replaced with default");
            DEFAULT_RECENT_WINDOW
        } else {
            self.recent_window
        }
    }

    /// Parse configuration from a JSON document; missing keys take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ForecastError::ConfigError(e.to_string()))
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
