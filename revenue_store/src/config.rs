//! Store configuration

use crate::error::{Result, StoreError};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default cache lifetime: one day
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

/// Longest cache lifetime honored
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Lifetime of cached results, in seconds
    pub cache_ttl_secs: u64,
    /// Directory holding one history file per project
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            data_dir: PathBuf::from("."),
        }
    }
}

impl StoreConfig {
    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Cache lifetime as a duration, clamped to a year
    pub fn cache_ttl(&self) -> Duration {
        let secs = self.cache_ttl_secs.min(MAX_CACHE_TTL_SECS);
        Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| StoreError::ConfigError(e.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.cache_ttl(), Duration::hours(24));
    }

    #[test]
    fn test_ttl_is_clamped() {
        let config = StoreConfig::default().with_cache_ttl_secs(u64::MAX);
        assert_eq!(config.cache_ttl(), Duration::days(365));
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = StoreConfig::from_json_str(r#"{"cacheTtlSecs": "soon"}"#).unwrap_err();
        assert!(matches!(err, StoreError::ConfigError(_)));
    }
}
