//! Pipeline for monthly series.
//!
//! Each observation stands for a whole calendar month, so the current month
//! is extrapolated from its partial total rather than from a daily rate.

use super::{build_current_period, build_full_year, build_next_period};
use super::{ForecastContext, ForecastPipeline};
use crate::aggregates::{month_total, recent_monthly_average};
use crate::calendar::days_in_month;
use crate::result::{
    CurrentPeriodDetails, CurrentPeriodForecast, FullYearForecast, MonthlyCurrentDetails,
    NextPeriodForecast, YtdComparison,
};
use crate::series::Series;
use chrono::{Datelike, NaiveDate};
use revenue_math::{pct_change, safe_ratio};

/// A partial month is only extrapolated while more than this many days remain
pub const EXTRAPOLATION_MIN_DAYS_REMAINING: u32 = 5;

/// Month-bucketed projections
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyPipeline;

impl ForecastPipeline for MonthlyPipeline {
    fn name(&self) -> &str {
        "monthly"
    }

    fn current_period(
        &self,
        series: &Series,
        ctx: &ForecastContext,
    ) -> Option<CurrentPeriodForecast> {
        forecast_current_period(series, ctx)
    }

    fn next_period(&self, series: &Series, ctx: &ForecastContext) -> Option<NextPeriodForecast> {
        forecast_next_period(series, ctx)
    }

    fn year_to_date(&self, series: &Series, ctx: &ForecastContext) -> Option<YtdComparison> {
        year_to_date_comparison(series, ctx.today)
    }

    fn full_year(&self, series: &Series, ctx: &ForecastContext) -> Option<FullYearForecast> {
        full_year_forecast(series, ctx.today)
    }
}

/// Extrapolate this month's partial total, or fall back to the recent monthly average
pub fn forecast_current_period(
    series: &Series,
    ctx: &ForecastContext,
) -> Option<CurrentPeriodForecast> {
    let today = ctx.today;
    let (year, month, day) = (today.year(), today.month(), today.day());
    let dim = days_in_month(year, month);
    let days_remaining = dim.saturating_sub(day);

    let partial_revenue = month_total(series, month, year);

    let (projected, based_on, details) = if partial_revenue > 0.0 {
        let extrapolated = days_remaining > EXTRAPOLATION_MIN_DAYS_REMAINING;
        let projected = if extrapolated {
            partial_revenue / f64::from(day) * f64::from(dim)
        } else {
            partial_revenue
        };
        let based_on = if extrapolated {
            "Month-to-date extrapolated"
        } else {
            "Month-to-date actual"
        };
        (
            projected,
            based_on,
            MonthlyCurrentDetails {
                partial_revenue,
                day_of_month: day,
                extrapolated,
                recent_monthly_average: None,
            },
        )
    } else {
        let average = recent_monthly_average(series, today)?;
        (
            average,
            "Recent monthly average",
            MonthlyCurrentDetails {
                partial_revenue,
                day_of_month: day,
                extrapolated: false,
                recent_monthly_average: Some(average),
            },
        )
    };

    Some(build_current_period(
        series,
        ctx,
        partial_revenue,
        projected,
        based_on.to_string(),
        CurrentPeriodDetails::Monthly(details),
    ))
}

/// Larger of the recent monthly average and last year's month grown
pub fn forecast_next_period(series: &Series, ctx: &ForecastContext) -> Option<NextPeriodForecast> {
    build_next_period(series, ctx, recent_monthly_average(series, ctx.today))
}

/// Months January through today's month, with last year's matching month
/// prorated to today's day
pub fn year_to_date_comparison(series: &Series, today: NaiveDate) -> Option<YtdComparison> {
    let (year, month) = (today.year(), today.month());
    let current = months_total_through(series, year, month);

    let completed_last_year = months_total_through(series, year - 1, month - 1);
    let fraction = f64::from(today.day()) / f64::from(days_in_month(year - 1, month));
    let last_year = completed_last_year + month_total(series, month, year - 1) * fraction.min(1.0);

    Some(YtdComparison {
        current,
        last_year,
        pct_change: pct_change(current, last_year),
        as_of: today,
        current_year: year,
        last_year_label: year - 1,
    })
}

/// Last year's total grown at the YTD rate, else the YTD monthly run rate
pub fn full_year_forecast(series: &Series, today: NaiveDate) -> Option<FullYearForecast> {
    let ytd = year_to_date_comparison(series, today)?;
    let elapsed_months = f64::from(today.month() - 1)
        + f64::from(today.day()) / f64::from(days_in_month(today.year(), today.month()));
    let run_rate = safe_ratio(ytd.current, elapsed_months).map(|per_month| per_month * 12.0);

    build_full_year(series, &ytd, run_rate)
}

/// Sum of the months `1..=through` of `year`; zero when `through` is zero
fn months_total_through(series: &Series, year: i32, through: u32) -> f64 {
    series
        .iter()
        .filter(|obs| obs.date.year() == year && obs.date.month() <= through)
        .map(|obs| obs.revenue)
        .sum()
}
