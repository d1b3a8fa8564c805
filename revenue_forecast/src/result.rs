//! Forecast output types.
//!
//! Everything here serializes to plain JSON with camelCase keys; values
//! that cannot be computed are `null`.

use crate::error::Result;
use crate::patterns::PatternAnalysis;
use crate::series::{DataQuality, Granularity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How far a projection can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Lower,
    Medium,
    High,
}

impl ConfidenceTier {
    /// Tier for a current-month projection with `days_remaining` left
    pub fn from_days_remaining(days_remaining: u32) -> Self {
        match days_remaining {
            0..=5 => ConfidenceTier::High,
            6..=15 => ConfidenceTier::Medium,
            _ => ConfidenceTier::Lower,
        }
    }
}

/// A point estimate with its confidence interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub projected: f64,
    pub low: f64,
    pub high: f64,
}

impl Band {
    /// `projected × (1 ± spread)`, with the low side floored at zero
    pub fn around(projected: f64, spread: f64) -> Self {
        Self {
            projected,
            low: (projected * (1.0 - spread)).max(0.0),
            high: projected * (1.0 + spread),
        }
    }

    /// `high - low`
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Whether `value` lies inside the band
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Fields shared by every projection, whichever pipeline produced it
pub trait Projection {
    fn band(&self) -> &Band;

    fn confidence(&self) -> ConfidenceTier;

    fn projected(&self) -> f64 {
        self.band().projected
    }

    fn low(&self) -> f64 {
        self.band().low
    }

    fn high(&self) -> f64 {
        self.band().high
    }

    fn width(&self) -> f64 {
        self.band().width()
    }
}

/// Projection for the month containing "today"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPeriodForecast {
    /// Month name, e.g. "February"
    pub name: String,
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub band: Band,
    /// Revenue already booked this month
    pub mtd_actual: f64,
    pub days_remaining: u32,
    pub days_in_month: u32,
    /// Percent versus the same month last year
    pub vs_last_year: Option<f64>,
    /// Percent versus the previous month
    #[serde(rename = "vsMoM")]
    pub vs_mom: Option<f64>,
    pub confidence: ConfidenceTier,
    /// Fractional spread applied to the band
    pub variance: f64,
    pub based_on: String,
    pub calc_details: CurrentPeriodDetails,
}

/// Pipeline-specific working for the current-month projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pipeline", rename_all = "lowercase")]
pub enum CurrentPeriodDetails {
    Daily(DailyCurrentDetails),
    Monthly(MonthlyCurrentDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCurrentDetails {
    /// Recent average revenue per day
    pub daily_average: f64,
    pub window: usize,
    /// `daily_average × days_remaining`
    pub remaining_forecast: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCurrentDetails {
    pub partial_revenue: f64,
    pub day_of_month: u32,
    /// Whether the partial total was scaled up to a full month
    pub extrapolated: bool,
    /// Used only when the current month has no revenue yet
    pub recent_monthly_average: Option<f64>,
}

/// Which estimate won the next-month projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NextPeriodBasis {
    /// The recent run rate
    RecentTrend,
    /// Same month last year scaled by year-over-year growth
    LastYearGrowth,
}

/// Projection for the calendar month after "today"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPeriodForecast {
    pub name: String,
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub band: Band,
    pub days_in_month: u32,
    pub basis: NextPeriodBasis,
    pub based_on: String,
    pub confidence: ConfidenceTier,
    pub variance: f64,
    pub calc_details: NextPeriodDetails,
}

/// Both candidate estimates behind a next-month projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPeriodDetails {
    /// Run-rate estimate: daily average × days, or the recent monthly average
    pub recent_estimate: Option<f64>,
    /// Same month last year × growth ratio
    pub last_year_estimate: Option<f64>,
    pub last_year_total: f64,
    pub growth_ratio: f64,
}

/// Year-to-date revenue against the same span last year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtdComparison {
    pub current: f64,
    pub last_year: f64,
    /// `None` when last year's span has no revenue
    pub pct_change: Option<f64>,
    pub as_of: NaiveDate,
    pub current_year: i32,
    pub last_year_label: i32,
}

/// How the full-year projection was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FullYearBasis {
    /// Last year's total grown at the year-to-date rate
    PriorYearGrowth,
    /// This year's run rate extrapolated to twelve months
    YtdRunRate,
}

/// Projection for the whole current calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullYearForecast {
    pub year: i32,
    #[serde(flatten)]
    pub band: Band,
    pub last_year_total: Option<f64>,
    /// Fractional growth applied to last year's total
    pub growth_rate: Option<f64>,
    /// Percent versus last year's total
    pub pct_change: Option<f64>,
    pub basis: FullYearBasis,
    pub based_on: String,
    pub confidence: ConfidenceTier,
}

impl Projection for CurrentPeriodForecast {
    fn band(&self) -> &Band {
        &self.band
    }

    fn confidence(&self) -> ConfidenceTier {
        self.confidence
    }
}

impl Projection for NextPeriodForecast {
    fn band(&self) -> &Band {
        &self.band
    }

    fn confidence(&self) -> ConfidenceTier {
        self.confidence
    }
}

impl Projection for FullYearForecast {
    fn band(&self) -> &Band {
        &self.band
    }

    fn confidence(&self) -> ConfidenceTier {
        self.confidence
    }
}

/// The engine's single output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub granularity: Granularity,
    pub current_month: Option<CurrentPeriodForecast>,
    pub next_month: Option<NextPeriodForecast>,
    pub ytd: Option<YtdComparison>,
    pub full_year: Option<FullYearForecast>,
    /// Always `None` unless the series is daily
    pub patterns: Option<PatternAnalysis>,
    pub insight: Option<String>,
    pub data_points: usize,
    pub data_quality: DataQuality,
}

impl ForecastResult {
    /// Serialize for the rendering layer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// All projections carrying a confidence band
    pub fn projections(&self) -> Vec<&dyn Projection> {
        let mut out: Vec<&dyn Projection> = Vec::with_capacity(3);
        if let Some(current) = &self.current_month {
            out.push(current);
        }
        if let Some(next) = &self.next_month {
            out.push(next);
        }
        if let Some(full) = &self.full_year {
            out.push(full);
        }
        out
    }
}
