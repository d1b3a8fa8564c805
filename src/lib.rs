//! # Revenue Lens
//!
//! `revenue_lens` ties the workspace together: it folds each fresh scrape
//! of a project's revenue into stored history, runs the forecasting
//! engine over the merged series and keeps the result in a cache until
//! it expires.
//!
//! ## Example
//!
//! ```
//! use chrono::{Duration, NaiveDate, TimeZone, Utc};
//! use revenue_lens::{ForecastConfig, MemoryStore, Observation, RevenueLens, StoreConfig};
//!
//! let mut lens = RevenueLens::new(
//!     MemoryStore::new(),
//!     ForecastConfig::default(),
//!     &StoreConfig::default(),
//! );
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let scrape: Vec<Observation> = (0..20)
//!     .map(|i| Observation::new(start + Duration::days(i), 50.0))
//!     .collect();
//!
//! let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
//! let now = Utc.with_ymd_and_hms(2025, 1, 20, 9, 0, 0).unwrap();
//! let result = lens.refresh("my_app", &scrape, today, now).unwrap().unwrap();
//! assert_eq!(result.data_points, 20);
//! assert!(lens.cached("my_app", now).is_some());
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::debug;

pub use keyword_roi;
pub use revenue_forecast::{
    calculate_forecasts, ForecastConfig, ForecastResult, Granularity, Observation,
};
pub use revenue_math;
pub use revenue_store::{JsonFileStore, MemoryStore, SeriesStore, StoreConfig, StoreError, TtlCache};

#[derive(Debug, Error)]
pub enum LensError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, LensError>;

/// Forecasts for many projects over one history store.
#[derive(Debug)]
pub struct RevenueLens<S: SeriesStore> {
    store: S,
    cache: TtlCache<ForecastResult>,
    config: ForecastConfig,
}

impl<S: SeriesStore> RevenueLens<S> {
    /// Creates a lens over `store`, caching results for the configured TTL.
    pub fn new(store: S, config: ForecastConfig, store_config: &StoreConfig) -> Self {
        Self {
            store,
            cache: TtlCache::from_config(store_config),
            config,
        }
    }

    /// Returns the forecasting configuration.
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merges `incoming` into the project's history and forecasts over it.
    ///
    /// A forecast is cached under `project` as of `now`. `Ok(None)` means the
    /// merged history is still too short to forecast; any earlier cached
    /// result for the project is dropped in that case.
    pub fn refresh(
        &mut self,
        project: &str,
        incoming: &[Observation],
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Option<ForecastResult>> {
        let history = self.store.merge(project, incoming)?;
        let result = calculate_forecasts(&history, None, &self.config, today);

        match &result {
            Some(forecast) => {
                self.cache.insert(project, forecast.clone(), None, now);
                debug!(project, points = forecast.data_points, "cached forecast");
            }
            None => {
                self.cache.remove(project);
                debug!(project, points = history.len(), "history too short to forecast");
            }
        }
        Ok(result)
    }

    /// Returns the project's cached forecast if it has not expired.
    pub fn cached(&mut self, project: &str, now: DateTime<Utc>) -> Option<&ForecastResult> {
        self.cache.get(project, now)
    }

    /// Returns the project's stored history.
    pub fn history(&self, project: &str) -> Result<Vec<Observation>> {
        Ok(self.store.load(project)?)
    }

    /// Drops every cached forecast.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
