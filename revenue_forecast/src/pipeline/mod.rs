//! Projection pipelines.
//!
//! Daily and weekly series go through [`DailyPipeline`], monthly series
//! through [`MonthlyPipeline`]. Both produce the same four projections and
//! share the policies that do not depend on resolution: the next-month
//! estimator choice, the band widths and the full-year growth tie.

use crate::aggregates::{month_total, resolve_variance, year_total, yoy_growth_ratio};
use crate::calendar::{days_in_month, month_name, next_month, previous_month};
use crate::config::ForecastConfig;
use crate::patterns::PatternAnalysis;
use crate::result::{
    Band, ConfidenceTier, CurrentPeriodDetails, CurrentPeriodForecast, FullYearBasis,
    FullYearForecast, NextPeriodBasis, NextPeriodDetails, NextPeriodForecast, YtdComparison,
};
use crate::series::Series;
use chrono::{Datelike, NaiveDate};
use revenue_math::pct_change;

pub mod daily;
pub mod monthly;

pub use daily::DailyPipeline;
pub use monthly::MonthlyPipeline;

/// Next-month bands are this many times wider than current-month bands
pub const NEXT_PERIOD_SPREAD_MULTIPLIER: f64 = 1.5;

/// Fixed spread of the full-year band
pub const FULL_YEAR_SPREAD: f64 = 0.15;

/// Inputs resolved once per run and shared by every projector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastContext {
    /// Evaluation date
    pub today: NaiveDate,
    /// Fractional confidence spread, from the override or from history
    pub variance: f64,
    /// Year-over-year growth ratio
    pub growth: f64,
    /// Observations behind the recent daily average
    pub recent_window: usize,
}

impl ForecastContext {
    pub fn new(series: &Series, config: &ForecastConfig, today: NaiveDate) -> Self {
        Self {
            today,
            variance: resolve_variance(series, config, today),
            growth: yoy_growth_ratio(series, today),
            recent_window: config.effective_recent_window(),
        }
    }
}

/// A resolution-specific way of producing the four projections
pub trait ForecastPipeline {
    /// Name of the pipeline
    fn name(&self) -> &str;

    /// Projection for the month containing today
    fn current_period(&self, series: &Series, ctx: &ForecastContext)
        -> Option<CurrentPeriodForecast>;

    /// Projection for the following calendar month
    fn next_period(&self, series: &Series, ctx: &ForecastContext) -> Option<NextPeriodForecast>;

    /// Year-to-date against the same span last year
    fn year_to_date(&self, series: &Series, ctx: &ForecastContext) -> Option<YtdComparison>;

    /// Projection for the whole calendar year
    fn full_year(&self, series: &Series, ctx: &ForecastContext) -> Option<FullYearForecast>;

    /// Seasonality analysis; only meaningful at daily resolution
    fn patterns(&self, _series: &Series) -> Option<PatternAnalysis> {
        None
    }
}

/// Pick the larger of the two next-month estimates; a tie goes to the recent trend
pub fn choose_next_estimate(
    recent: Option<f64>,
    last_year: Option<f64>,
) -> Option<(f64, NextPeriodBasis)> {
    match (recent, last_year) {
        (Some(r), Some(l)) if l > r => Some((l, NextPeriodBasis::LastYearGrowth)),
        (Some(r), _) => Some((r, NextPeriodBasis::RecentTrend)),
        (None, Some(l)) => Some((l, NextPeriodBasis::LastYearGrowth)),
        (None, None) => None,
    }
}

/// Fill in the parts of a current-month projection both pipelines share
pub(crate) fn build_current_period(
    series: &Series,
    ctx: &ForecastContext,
    mtd_actual: f64,
    projected: f64,
    based_on: String,
    calc_details: CurrentPeriodDetails,
) -> CurrentPeriodForecast {
    let (year, month) = (ctx.today.year(), ctx.today.month());
    let days_in_month = days_in_month(year, month);
    let days_remaining = days_in_month.saturating_sub(ctx.today.day());

    let last_year_total = month_total(series, month, year - 1);
    let (prev_year, prev_month) = previous_month(year, month);
    let previous_total = month_total(series, prev_month, prev_year);

    CurrentPeriodForecast {
        name: month_name(month).to_string(),
        year,
        month,
        band: Band::around(projected, ctx.variance),
        mtd_actual,
        days_remaining,
        days_in_month,
        vs_last_year: pct_change(projected, last_year_total),
        vs_mom: pct_change(projected, previous_total),
        confidence: ConfidenceTier::from_days_remaining(days_remaining),
        variance: ctx.variance,
        based_on,
        calc_details,
    }
}

/// Next month's calendar position: `(year, month, days)`
pub(crate) fn next_period_target(today: NaiveDate) -> (i32, u32, u32) {
    let (year, month) = next_month(today.year(), today.month());
    (year, month, days_in_month(year, month))
}

/// Apply the max-of-two policy to a pipeline's run-rate estimate
pub(crate) fn build_next_period(
    series: &Series,
    ctx: &ForecastContext,
    recent_estimate: Option<f64>,
) -> Option<NextPeriodForecast> {
    let (year, month, days_in_month) = next_period_target(ctx.today);

    let last_year_total = month_total(series, month, year - 1);
    let last_year_estimate = (last_year_total > 0.0).then(|| last_year_total * ctx.growth);

    let (projected, basis) = choose_next_estimate(recent_estimate, last_year_estimate)?;
    let based_on = match basis {
        NextPeriodBasis::RecentTrend => "Recent trend".to_string(),
        NextPeriodBasis::LastYearGrowth => {
            format!("{} {} adjusted for growth", month_name(month), year - 1)
        }
    };
    let spread = ctx.variance * NEXT_PERIOD_SPREAD_MULTIPLIER;

    Some(NextPeriodForecast {
        name: month_name(month).to_string(),
        year,
        month,
        band: Band::around(projected, spread),
        days_in_month,
        basis,
        based_on,
        confidence: ConfidenceTier::Lower,
        variance: spread,
        calc_details: NextPeriodDetails {
            recent_estimate,
            last_year_estimate,
            last_year_total,
            growth_ratio: ctx.growth,
        },
    })
}

/// Grow last year's total at the year-to-date rate, else use `run_rate`.
///
/// When last year has data the full-year percent change is the YTD percent
/// change by construction.
pub(crate) fn build_full_year(
    series: &Series,
    ytd: &YtdComparison,
    run_rate: Option<f64>,
) -> Option<FullYearForecast> {
    let last_year_total = year_total(series, ytd.last_year_label);
    let last_year = (last_year_total > 0.0).then_some(last_year_total);

    if let (Some(total), Some(pct)) = (last_year, ytd.pct_change) {
        let growth_rate = pct / 100.0;
        return Some(FullYearForecast {
            year: ytd.current_year,
            band: Band::around(total * (1.0 + growth_rate), FULL_YEAR_SPREAD),
            last_year_total: last_year,
            growth_rate: Some(growth_rate),
            pct_change: Some(pct),
            basis: FullYearBasis::PriorYearGrowth,
            based_on: format!("{} total at year-to-date growth", ytd.last_year_label),
            confidence: ConfidenceTier::Medium,
        });
    }

    let projected = run_rate.filter(|p| *p > 0.0)?;
    Some(FullYearForecast {
        year: ytd.current_year,
        band: Band::around(projected, FULL_YEAR_SPREAD),
        last_year_total: last_year,
        growth_rate: None,
        pct_change: last_year.and_then(|total| pct_change(projected, total)),
        basis: FullYearBasis::YtdRunRate,
        based_on: "Year-to-date run rate".to_string(),
        confidence: ConfidenceTier::Lower,
    })
}
