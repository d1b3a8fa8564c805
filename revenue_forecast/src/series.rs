//! Revenue series model and the normalizer that every forecast runs through

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Fewest valid observations any forecast is attempted with
pub const MIN_OBSERVATIONS: usize = 3;

/// Time resolution of the observations in a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One observation per calendar day
    Daily,
    /// One observation per week
    Weekly,
    /// One observation per calendar month
    Monthly,
}

impl Granularity {
    /// Infer granularity from the gap between two consecutive observations
    pub fn infer(first: NaiveDate, second: NaiveDate) -> Self {
        let gap = (second - first).num_days().abs();
        if gap >= 28 {
            Granularity::Monthly
        } else if gap >= 6 {
            Granularity::Weekly
        } else {
            Granularity::Daily
        }
    }

    /// Days of revenue one observation represents
    pub fn days_per_observation(self) -> f64 {
        match self {
            Granularity::Daily => 1.0,
            Granularity::Weekly => 7.0,
            Granularity::Monthly => 365.25 / 12.0,
        }
    }

    /// Series length at which recent averages become stable
    pub fn stable_len(self) -> usize {
        match self {
            Granularity::Daily | Granularity::Weekly => 15,
            Granularity::Monthly => 6,
        }
    }

    /// Series length considered ideal for confident projections
    pub fn ideal_len(self) -> usize {
        match self {
            Granularity::Daily | Granularity::Weekly => 30,
            Granularity::Monthly => 12,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(Granularity::Daily),
            "weekly" | "week" | "w" => Ok(Granularity::Weekly),
            "monthly" | "month" | "m" => Ok(Granularity::Monthly),
            other => Err(ForecastError::ParseError(format!(
                "Unsupported granularity: {}",
                other
            ))),
        }
    }
}

/// A single revenue observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Revenue amount, in one implicit currency
    pub revenue: f64,
    /// Granularity tag attached by the data source, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<Granularity>,
}

impl Observation {
    /// Create an untagged observation
    pub fn new(date: NaiveDate, revenue: f64) -> Self {
        Self {
            date,
            revenue,
            granularity: None,
        }
    }

    /// Attach a granularity tag
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    fn is_valid(&self) -> bool {
        self.revenue.is_finite() && self.revenue >= 0.0
    }
}

/// How much history backs a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    /// Enough to attempt a forecast
    Minimal,
    /// Enough for a stable recent average
    Stable,
    /// Enough for full confidence
    Ideal,
}

/// A validated series: sorted ascending by date, one observation per date
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    observations: Vec<Observation>,
    granularity: Granularity,
}

impl Series {
    /// Observations in ascending date order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Iterate observations in ascending date order
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// Resolved granularity
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Never true for a normalized series, kept for API symmetry
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Data sufficiency tier for this series
    pub fn data_quality(&self) -> DataQuality {
        let len = self.len();
        if len >= self.granularity.ideal_len() {
            DataQuality::Ideal
        } else if len >= self.granularity.stable_len() {
            DataQuality::Stable
        } else {
            DataQuality::Minimal
        }
    }
}

/// Validate, sort and deduplicate observations into a `Series`.
///
/// The input is never mutated. Observations with a non-finite or negative
/// revenue are dropped; when a date repeats, the later entry in input order
/// wins. Granularity comes from `granularity` if given, else from the first
/// tagged observation, else from the gap between the first two dates.
/// Returns `None` when fewer than [`MIN_OBSERVATIONS`] remain.
pub fn normalize(observations: &[Observation], granularity: Option<Granularity>) -> Option<Series> {
    let mut valid: Vec<Observation> = observations
        .iter()
        .filter(|obs| obs.is_valid())
        .cloned()
        .collect();

    let dropped = observations.len() - valid.len();
    if dropped > 0 {
        debug!(dropped, "dropped observations with unusable revenue");
    }

    // Stable sort keeps input order among equal dates
    valid.sort_by_key(|obs| obs.date);

    let mut deduped: Vec<Observation> = Vec::with_capacity(valid.len());
    for obs in valid {
        match deduped.last_mut() {
            Some(last) if last.date == obs.date => *last = obs,
            _ => deduped.push(obs),
        }
    }

    if deduped.len() < MIN_OBSERVATIONS {
        debug!(
            count = deduped.len(),
            required = MIN_OBSERVATIONS,
            "not enough observations to forecast"
        );
        return None;
    }

    let granularity = granularity
        .or_else(|| deduped.iter().find_map(|obs| obs.granularity))
        .unwrap_or_else(|| Granularity::infer(deduped[0].date, deduped[1].date));

    Some(Series {
        observations: deduped,
        granularity,
    })
}
