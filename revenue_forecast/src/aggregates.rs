//! Pure reducers over a normalized series.
//!
//! Every function takes "today" explicitly. Months with a zero total are
//! treated as missing data, not as genuine zero-revenue months.

use crate::calendar::{months_between, shift_month};
use crate::config::ForecastConfig;
use crate::series::Series;
use chrono::{Datelike, NaiveDate};
use revenue_math::{capped_coefficient_of_variation, mean, safe_ratio, RollingMean};

/// Calendar months looked back over for averages and variance
pub const RECENT_MONTHS: i32 = 6;

/// Variance assumed when fewer than two qualifying months exist
pub const DEFAULT_MONTHLY_VARIANCE: f64 = 0.2;

/// Upper bound on the computed monthly variance
pub const MAX_MONTHLY_VARIANCE: f64 = 0.5;

/// Sum of revenue dated in `month` (1-based) of `year`
pub fn month_total(series: &Series, month: u32, year: i32) -> f64 {
    series
        .iter()
        .filter(|obs| obs.date.month() == month && obs.date.year() == year)
        .map(|obs| obs.revenue)
        .sum()
}

/// Sum of revenue dated within `from..=to`
pub fn period_total(series: &Series, from: NaiveDate, to: NaiveDate) -> f64 {
    series
        .iter()
        .filter(|obs| obs.date >= from && obs.date <= to)
        .map(|obs| obs.revenue)
        .sum()
}

/// Sum of revenue dated in `year`
pub fn year_total(series: &Series, year: i32) -> f64 {
    series
        .iter()
        .filter(|obs| obs.date.year() == year)
        .map(|obs| obs.revenue)
        .sum()
}

/// Mean daily revenue over the last `window` observations dated before `today`.
///
/// Today's own observation is left out since the day is still in progress.
/// Weekly observations are spread over their seven days.
pub fn recent_daily_average(series: &Series, window: usize, today: NaiveDate) -> Option<f64> {
    let mut rolling = RollingMean::new(window).ok()?;
    let days = series.granularity().days_per_observation();

    for obs in series.iter().take_while(|obs| obs.date < today) {
        rolling.push(obs.revenue / days);
    }

    rolling.value()
}

/// Non-zero totals of the `months` calendar months before today's month,
/// most recent first
pub fn trailing_month_totals(series: &Series, months: i32, today: NaiveDate) -> Vec<f64> {
    (1..=months)
        .map(|back| {
            let (year, month) = shift_month(today.year(), today.month(), -back);
            month_total(series, month, year)
        })
        .filter(|total| *total > 0.0)
        .collect()
}

/// Mean of up to the last six completed months' totals
pub fn recent_monthly_average(series: &Series, today: NaiveDate) -> Option<f64> {
    mean(&trailing_month_totals(series, RECENT_MONTHS, today))
}

/// Revenue of the trailing twelve months over the twelve before that.
///
/// Months are counted by calendar month with today's month as month zero.
/// Falls back to `1.0` (no growth) when either side is empty.
pub fn yoy_growth_ratio(series: &Series, today: NaiveDate) -> f64 {
    let mut recent = 0.0;
    let mut previous = 0.0;

    for obs in series.iter() {
        match months_between(obs.date, today) {
            0..=11 => recent += obs.revenue,
            12..=23 => previous += obs.revenue,
            _ => {}
        }
    }

    if recent <= 0.0 {
        return 1.0;
    }
    safe_ratio(recent, previous).unwrap_or(1.0)
}

/// Coefficient of variation of the trailing non-zero monthly totals, capped at 50%
pub fn monthly_variance(series: &Series, today: NaiveDate) -> f64 {
    let totals = trailing_month_totals(series, RECENT_MONTHS, today);
    capped_coefficient_of_variation(&totals, MAX_MONTHLY_VARIANCE)
        .unwrap_or(DEFAULT_MONTHLY_VARIANCE)
}

/// Confidence spread to use: the configured override, else the computed variance
pub fn resolve_variance(series: &Series, config: &ForecastConfig, today: NaiveDate) -> f64 {
    config
        .variance_override_fraction()
        .unwrap_or_else(|| monthly_variance(series, today))
}
