//! History stores.
//!
//! A store maps a project id to that project's observation history.
//! Loading a project that was never saved yields an empty history.

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::merge::merge_by_date;
use chrono::{DateTime, Utc};
use revenue_forecast::Observation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persistence contract for per-project revenue history
pub trait SeriesStore {
    /// Stored history of `project`, ascending by date
    fn load(&self, project: &str) -> Result<Vec<Observation>>;

    /// Replace the stored history of `project`
    fn save(&mut self, project: &str, observations: &[Observation]) -> Result<()>;

    /// Fold `incoming` into the stored history and persist the result
    fn merge(&mut self, project: &str, incoming: &[Observation]) -> Result<Vec<Observation>> {
        let existing = self.load(project)?;
        let merged = merge_by_date(&existing, incoming);
        debug!(
            project,
            existing = existing.len(),
            incoming = incoming.len(),
            merged = merged.len(),
            "merged revenue history"
        );
        self.save(project, &merged)?;
        Ok(merged)
    }
}

/// Non-persistent store, mostly for tests and short-lived callers
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    histories: HashMap<String, Vec<Observation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects with a saved history
    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.histories.keys().map(String::as_str)
    }
}

impl SeriesStore for MemoryStore {
    fn load(&self, project: &str) -> Result<Vec<Observation>> {
        Ok(self.histories.get(project).cloned().unwrap_or_default())
    }

    fn save(&mut self, project: &str, observations: &[Observation]) -> Result<()> {
        self.histories
            .insert(project.to_string(), observations.to_vec());
        Ok(())
    }
}

/// On-disk document for one project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredHistory {
    data: Vec<Observation>,
    updated_at: DateTime<Utc>,
}

/// One `revenue_history_<project>.json` file per project in a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.data_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the history of `project`
    pub fn path_for(&self, project: &str) -> Result<PathBuf> {
        validate_project(project)?;
        Ok(self.dir.join(format!("revenue_history_{}.json", project)))
    }

    /// When `project` was last saved, if ever
    pub fn updated_at(&self, project: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read(project)?.map(|stored| stored.updated_at))
    }

    fn read(&self, project: &str) -> Result<Option<StoredHistory>> {
        let path = self.path_for(project)?;
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }
}

impl SeriesStore for JsonFileStore {
    fn load(&self, project: &str) -> Result<Vec<Observation>> {
        Ok(self
            .read(project)?
            .map(|stored| stored.data)
            .unwrap_or_default())
    }

    fn save(&mut self, project: &str, observations: &[Observation]) -> Result<()> {
        let path = self.path_for(project)?;
        fs::create_dir_all(&self.dir)?;

        let stored = StoredHistory {
            data: observations.to_vec(),
            updated_at: Utc::now(),
        };
        fs::write(&path, serde_json::to_string_pretty(&stored)?)?;
        debug!(
            project,
            path = %path.display(),
            points = observations.len(),
            "saved revenue history"
        );
        Ok(())
    }
}

fn validate_project(project: &str) -> Result<()> {
    let valid = !project.is_empty()
        && project
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidProject(project.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_validation() {
        assert!(validate_project("proj_1a-B").is_ok());
        assert!(validate_project("").is_err());
        assert!(validate_project("../etc").is_err());
        assert!(validate_project("a b").is_err());
    }

    #[test]
    fn test_memory_store_unknown_project_is_empty() {
        let store = MemoryStore::new();
        assert!(store.load("nope").unwrap().is_empty());
    }
}
