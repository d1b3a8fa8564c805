//! Entry points: normalize, pick a pipeline, assemble the result.

use crate::config::ForecastConfig;
use crate::parse::{parse_observations, RawObservation};
use crate::patterns::select_insight;
use crate::pipeline::{DailyPipeline, ForecastContext, ForecastPipeline, MonthlyPipeline};
use crate::result::ForecastResult;
use crate::series::{normalize, Granularity, Observation, Series};
use chrono::{Local, NaiveDate};
use tracing::debug;

/// Compute every projection for `observations` as of `today`.
///
/// `granularity` overrides both per-observation tags and inference. Returns
/// `None` when fewer than three valid observations remain after normalization.
pub fn calculate_forecasts(
    observations: &[Observation],
    granularity: Option<Granularity>,
    config: &ForecastConfig,
    today: NaiveDate,
) -> Option<ForecastResult> {
    let Some(series) = normalize(observations, granularity) else {
        debug!(
            input = observations.len(),
            "not enough valid observations to forecast"
        );
        return None;
    };

    let result = match series.granularity() {
        Granularity::Daily | Granularity::Weekly => run(&DailyPipeline, &series, config, today),
        Granularity::Monthly => run(&MonthlyPipeline, &series, config, today),
    };
    Some(result)
}

/// Same as [`calculate_forecasts`] for loosely typed rows; bad rows are skipped
pub fn calculate_forecasts_from_raw(
    raw: &[RawObservation],
    granularity: Option<Granularity>,
    config: &ForecastConfig,
    today: NaiveDate,
) -> Option<ForecastResult> {
    calculate_forecasts(&parse_observations(raw), granularity, config, today)
}

/// Same as [`calculate_forecasts`] with today taken from the local clock
pub fn calculate_forecasts_today(
    observations: &[Observation],
    granularity: Option<Granularity>,
    config: &ForecastConfig,
) -> Option<ForecastResult> {
    calculate_forecasts(observations, granularity, config, Local::now().date_naive())
}

fn run<P: ForecastPipeline>(
    pipeline: &P,
    series: &Series,
    config: &ForecastConfig,
    today: NaiveDate,
) -> ForecastResult {
    let ctx = ForecastContext::new(series, config, today);
    debug!(
        pipeline = pipeline.name(),
        points = series.len(),
        variance = ctx.variance,
        growth = ctx.growth,
        %today,
        "running forecast pipeline"
    );

    let patterns = pipeline.patterns(series);
    let insight = patterns
        .as_ref()
        .and_then(select_insight)
        .map(|insight| insight.to_string());

    ForecastResult {
        granularity: series.granularity(),
        current_month: pipeline.current_period(series, &ctx),
        next_month: pipeline.next_period(series, &ctx),
        ytd: pipeline.year_to_date(series, &ctx),
        full_year: pipeline.full_year(series, &ctx),
        patterns,
        insight,
        data_points: series.len(),
        data_quality: series.data_quality(),
    }
}
