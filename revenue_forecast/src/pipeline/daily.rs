//! Pipeline for daily and weekly series.

use super::{build_current_period, build_full_year, build_next_period, next_period_target};
use super::{ForecastContext, ForecastPipeline};
use crate::aggregates::{period_total, recent_daily_average};
use crate::calendar::{days_in_month, same_day_last_year, start_of_year};
use crate::patterns::{analyze_patterns, PatternAnalysis};
use crate::result::{
    CurrentPeriodDetails, CurrentPeriodForecast, DailyCurrentDetails, FullYearForecast,
    NextPeriodForecast, YtdComparison,
};
use crate::series::Series;
use chrono::{Datelike, NaiveDate};
use revenue_math::{pct_change, safe_ratio};

/// Days in the year assumed by the run-rate fallback
const DAYS_PER_YEAR: f64 = 365.0;

/// Run-rate projections from the recent daily average
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyPipeline;

impl ForecastPipeline for DailyPipeline {
    fn name(&self) -> &str {
        "daily"
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

    fn patterns(&self, series: &Series) -> Option<PatternAnalysis> {
        analyze_patterns(series)
    }
}

/// Month-to-date actual plus the recent daily average over the days left
pub fn forecast_current_period(
    series: &Series,
    ctx: &ForecastContext,
) -> Option<CurrentPeriodForecast> {
    let today = ctx.today;
    let month_start = today.with_day(1)?;
    let days_remaining = days_in_month(today.year(), today.month()).saturating_sub(today.day());

    let mtd_actual = period_total(series, month_start, today);
    let daily_average = recent_daily_average(series, ctx.recent_window, today)?;
    let remaining_forecast = daily_average * f64::from(days_remaining);

    Some(build_current_period(
        series,
        ctx,
        mtd_actual,
        mtd_actual + remaining_forecast,
        format!("Month-to-date plus {}-day average", ctx.recent_window),
        CurrentPeriodDetails::Daily(DailyCurrentDetails {
            daily_average,
            window: ctx.recent_window,
            remaining_forecast,
        }),
    ))
}

/// Larger of the daily run rate over next month and last year's month grown
pub fn forecast_next_period(series: &Series, ctx: &ForecastContext) -> Option<NextPeriodForecast> {
    let (_, _, days_in_next) = next_period_target(ctx.today);
    let recent = recent_daily_average(series, ctx.recent_window, ctx.today)
        .map(|average| average * f64::from(days_in_next));

    build_next_period(series, ctx, recent)
}

/// January 1st through today against the same span one year earlier
pub fn year_to_date_comparison(series: &Series, today: NaiveDate) -> Option<YtdComparison> {
    let year = today.year();
    let current = period_total(series, start_of_year(year)?, today);
    let last_year = period_total(series, start_of_year(year - 1)?, same_day_last_year(today)?);

    Some(YtdComparison {
        current,
        last_year,
        pct_change: pct_change(current, last_year),
        as_of: today,
        current_year: year,
        last_year_label: year - 1,
    })
}

/// Last year's total grown at the YTD rate, else the YTD daily run rate
pub fn full_year_forecast(series: &Series, today: NaiveDate) -> Option<FullYearForecast> {
    let ytd = year_to_date_comparison(series, today)?;
    let run_rate = safe_ratio(ytd.current, f64::from(today.ordinal()))
        .map(|per_day| per_day * DAYS_PER_YEAR);

    build_full_year(series, &ytd, run_rate)
}
