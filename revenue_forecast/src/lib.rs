//! # Revenue Forecast
//!
//! Forward-looking revenue projections from a scraped history of
//! `{date, revenue}` observations.
//!
//! ## Features
//!
//! - Normalization of noisy input: malformed rows are dropped, dates are
//!   sorted as calendar dates and granularity is inferred when missing
//! - Aggregates over the history: month totals, recent averages,
//!   year-over-year growth and month-to-month variance
//! - Four projections per call: current month, next month, year-to-date
//!   comparison and full year, each with a confidence band
//! - Day-of-month and weekend seasonality with a single headline insight
//!
//! ## Time Granularity Support
//!
//! Observations can be daily, weekly or monthly through the `Granularity` enum.
//! Daily and weekly series share one pipeline; monthly series use a
//! month-bucketed pipeline and never produce seasonality patterns.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use revenue_forecast::{calculate_forecasts, ForecastConfig, Granularity, Observation};
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let history: Vec<Observation> = (0..40)
//!     .map(|i| Observation::new(start + chrono::Duration::days(i), 100.0))
//!     .collect();
//!
//! let today = NaiveDate::from_ymd_opt(2025, 2, 9).unwrap();
//! let config = ForecastConfig::default();
//! let result = calculate_forecasts(&history, Some(Granularity::Daily), &config, today)
//!     .expect("enough history");
//!
//! let current = result.current_month.expect("current month");
//! assert!(current.band.low <= current.band.projected);
//! ```
//!
//! Every operation is pure: "today" is always an argument, and
//! insufficient data yields `None` rather than an error.

pub mod aggregates;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod parse;
pub mod patterns;
pub mod pipeline;
pub mod result;
pub mod series;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::engine::{
    calculate_forecasts, calculate_forecasts_from_raw, calculate_forecasts_today,
};
pub use crate::error::{ForecastError, Result};
pub use crate::parse::{parse_currency, parse_date, RawObservation, RawRevenue};
pub use crate::patterns::{Insight, PatternAnalysis};
pub use crate::result::{Band, ConfidenceTier, ForecastResult, Projection};
pub use crate::series::{normalize, DataQuality, Granularity, Observation, Series};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
