use approx::assert_relative_eq;
use chrono::{Datelike, Duration, NaiveDate};
use revenue_forecast::pipeline::{FULL_YEAR_SPREAD, NEXT_PERIOD_SPREAD_MULTIPLIER};
use revenue_forecast::result::{CurrentPeriodDetails, FullYearBasis, NextPeriodBasis};
use revenue_forecast::{
    calculate_forecasts, ConfidenceTier, ForecastConfig, Granularity, Observation, Projection,
};
use rstest::rstest;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// One observation per day from `from` through `to`, revenue picked by `f`
fn daily(from: NaiveDate, to: NaiveDate, f: impl Fn(NaiveDate) -> f64) -> Vec<Observation> {
    let mut out = Vec::new();
    let mut day = from;
    while day <= to {
        out.push(Observation::new(day, f(day)));
        day += Duration::days(1);
    }
    out
}

// January at 100/day, February 1st to 10th at 120/day
fn january_then_february() -> Vec<Observation> {
    daily(date(2025, 1, 1), date(2025, 2, 10), |d| {
        if d < date(2025, 2, 1) {
            100.0
        } else {
            120.0
        }
    })
}

#[test]
fn test_daily_current_month_projection() {
    let history = january_then_february();
    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 2, 10)).unwrap();

    assert_eq!(result.granularity, Granularity::Daily);
    let current = result.current_month.unwrap();
    assert_eq!(current.name, "February");
    assert_eq!(current.days_remaining, 18);
    assert_relative_eq!(current.mtd_actual, 1200.0);
    assert_relative_eq!(current.band.projected, 3216.0, epsilon = 1e-9);

    match current.calc_details {
        CurrentPeriodDetails::Daily(details) => {
            assert_relative_eq!(details.daily_average, 112.0, epsilon = 1e-9);
            assert_relative_eq!(details.remaining_forecast, 2016.0, epsilon = 1e-9);
            assert_eq!(details.window, 15);
        }
        other => panic!("expected daily details, got {other:?}"),
    }

    // Only January completed, so the default 20% spread applies
    assert_relative_eq!(current.variance, 0.2);
    assert_relative_eq!(current.band.low, 3216.0 * 0.8, epsilon = 1e-9);
    assert_relative_eq!(current.band.high, 3216.0 * 1.2, epsilon = 1e-9);
    assert_eq!(current.confidence, ConfidenceTier::Lower);

    assert!(current.vs_last_year.is_none());
    assert_relative_eq!(current.vs_mom.unwrap(), (3216.0 / 3100.0 - 1.0) * 100.0, epsilon = 1e-9);
}

#[test]
fn test_variance_override_widens_bands() {
    let history = january_then_february();
    let config = ForecastConfig::default().with_variance_override(30.0);
    let result = calculate_forecasts(&history, None, &config, date(2025, 2, 10)).unwrap();

    let current = result.current_month.unwrap();
    assert_relative_eq!(current.low(), current.projected() * 0.7, epsilon = 1e-9);
    assert_relative_eq!(current.high(), current.projected() * 1.3, epsilon = 1e-9);

    let next = result.next_month.unwrap();
    assert_eq!(next.name, "March");
    assert_eq!(next.basis, NextPeriodBasis::RecentTrend);
    assert_relative_eq!(next.projected(), 112.0 * 31.0, epsilon = 1e-9);
    assert_relative_eq!(next.variance, 0.3 * NEXT_PERIOD_SPREAD_MULTIPLIER, epsilon = 1e-12);
    assert_relative_eq!(next.low(), next.projected() * 0.55, epsilon = 1e-9);
    assert_relative_eq!(next.high(), next.projected() * 1.45, epsilon = 1e-9);
}

#[test]
fn test_out_of_range_override_is_ignored() {
    let history = january_then_february();
    let config = ForecastConfig::default().with_variance_override(75.0);
    let result = calculate_forecasts(&history, None, &config, date(2025, 2, 10)).unwrap();

    assert_relative_eq!(result.current_month.unwrap().variance, 0.2);
}

#[rstest]
#[case(date(2025, 1, 5), ConfidenceTier::Lower)]
#[case(date(2025, 1, 20), ConfidenceTier::Medium)]
#[case(date(2025, 1, 28), ConfidenceTier::High)]
#[case(date(2025, 1, 31), ConfidenceTier::High)]
fn test_confidence_by_days_remaining(#[case] today: NaiveDate, #[case] expected: ConfidenceTier) {
    let history = daily(date(2024, 12, 1), date(2025, 1, 31), |_| 100.0);
    let result = calculate_forecasts(&history, None, &ForecastConfig::default(), today).unwrap();
    assert_eq!(result.current_month.unwrap().confidence, expected);
}

#[test]
fn test_confidence_never_drops_as_month_progresses() {
    let history = daily(date(2024, 12, 1), date(2025, 1, 31), |_| 100.0);
    let tiers: Vec<ConfidenceTier> = (1..=31)
        .map(|day| {
            calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 1, day))
                .and_then(|r| r.current_month)
                .map(|c| c.confidence)
                .unwrap()
        })
        .collect();

    assert!(tiers.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_band_width_never_grows_as_month_progresses() {
    // Uneven completed months so the computed spread is not the default
    let history = daily(date(2024, 10, 1), date(2025, 1, 31), |d| match d.month() {
        10 => 50.0,
        11 => 150.0,
        _ => 100.0,
    });
    let widths: Vec<f64> = (1..=31)
        .map(|day| {
            let current =
                calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 1, day))
                    .and_then(|r| r.current_month)
                    .unwrap();
            assert!(current.variance > 0.2);
            current.high() - current.low()
        })
        .collect();

    assert!(widths.windows(2).all(|pair| pair[1] <= pair[0] + 1e-9));
}

#[test]
fn test_full_year_matches_ytd_growth() {
    let history = daily(date(2024, 1, 1), date(2025, 3, 15), |d| {
        if d < date(2025, 1, 1) {
            100.0
        } else {
            110.0
        }
    });
    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 3, 15)).unwrap();

    let ytd = result.ytd.unwrap();
    // 74 days of 2025 against 75 days of leap-year 2024
    assert_relative_eq!(ytd.current, 74.0 * 110.0, epsilon = 1e-9);
    assert_relative_eq!(ytd.last_year, 75.0 * 100.0, epsilon = 1e-9);

    let full = result.full_year.unwrap();
    assert_eq!(full.basis, FullYearBasis::PriorYearGrowth);
    assert_eq!(full.pct_change, ytd.pct_change);
    assert_relative_eq!(full.last_year_total.unwrap(), 36600.0, epsilon = 1e-9);
    let growth = ytd.pct_change.unwrap() / 100.0;
    assert_relative_eq!(full.projected(), 36600.0 * (1.0 + growth), epsilon = 1e-6);
    assert_relative_eq!(full.low(), full.projected() * (1.0 - FULL_YEAR_SPREAD), epsilon = 1e-6);
}

#[test]
fn test_full_year_falls_back_to_run_rate() {
    let history = january_then_february();
    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 2, 10)).unwrap();

    let ytd = result.ytd.unwrap();
    assert!(ytd.pct_change.is_none());

    let full = result.full_year.unwrap();
    assert_eq!(full.basis, FullYearBasis::YtdRunRate);
    assert_eq!(full.confidence, ConfidenceTier::Lower);
    // 4300 over 41 days of the year
    assert_relative_eq!(full.projected(), 4300.0 / 41.0 * 365.0, epsilon = 1e-6);
    assert!(full.pct_change.is_none());
}

#[test]
fn test_next_month_prefers_last_year_when_larger() {
    // Last March was a big month; this year runs at the same daily rate
    let history = daily(date(2024, 1, 1), date(2025, 2, 10), |d| {
        if d >= date(2024, 3, 1) && d <= date(2024, 3, 31) {
            500.0
        } else {
            100.0
        }
    });
    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 2, 10)).unwrap();

    let next = result.next_month.unwrap();
    assert_eq!(next.basis, NextPeriodBasis::LastYearGrowth);
    assert_relative_eq!(next.calc_details.last_year_total, 15500.0, epsilon = 1e-9);
    assert!(next.projected() >= next.calc_details.recent_estimate.unwrap());
}

#[test]
fn test_weekly_series_spreads_over_days() {
    let history: Vec<Observation> = [
        date(2025, 1, 6),
        date(2025, 1, 13),
        date(2025, 1, 20),
        date(2025, 1, 27),
        date(2025, 2, 3),
    ]
    .into_iter()
    .map(|d| Observation::new(d, 700.0))
    .collect();

    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 2, 5)).unwrap();

    assert_eq!(result.granularity, Granularity::Weekly);
    assert!(result.patterns.is_none());
    let current = result.current_month.unwrap();
    assert_relative_eq!(current.mtd_actual, 700.0);
    assert_relative_eq!(current.projected(), 700.0 + 100.0 * 23.0, epsilon = 1e-9);
}

#[test]
fn test_monthly_current_month_extrapolates_partial() {
    let history: Vec<Observation> = (1..=6)
        .map(|m| Observation::new(date(2025, m, 1), if m == 6 { 500.0 } else { 3000.0 }))
        .collect();
    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 6, 10)).unwrap();

    assert_eq!(result.granularity, Granularity::Monthly);
    let current = result.current_month.unwrap();
    // 500 over 10 of June's 30 days
    assert_relative_eq!(current.projected(), 1500.0, epsilon = 1e-9);
    match current.calc_details {
        CurrentPeriodDetails::Monthly(details) => assert!(details.extrapolated),
        other => panic!("expected monthly details, got {other:?}"),
    }

    let next = result.next_month.unwrap();
    assert_relative_eq!(next.projected(), 3000.0, epsilon = 1e-9);
}

#[test]
fn test_monthly_late_in_month_uses_partial_as_is() {
    let history: Vec<Observation> = (1..=6)
        .map(|m| Observation::new(date(2025, m, 1), 3000.0))
        .collect();
    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 6, 27)).unwrap();

    let current = result.current_month.unwrap();
    assert_relative_eq!(current.projected(), 3000.0);
    assert_eq!(current.confidence, ConfidenceTier::High);
}

#[test]
fn test_monthly_without_current_partial_uses_average() {
    let history: Vec<Observation> = (1..=5)
        .map(|m| Observation::new(date(2025, m, 1), 1000.0 * f64::from(m)))
        .collect();
    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 6, 3)).unwrap();

    let current = result.current_month.unwrap();
    assert_relative_eq!(current.projected(), 3000.0, epsilon = 1e-9);
    match current.calc_details {
        CurrentPeriodDetails::Monthly(details) => {
            assert_eq!(details.recent_monthly_average, Some(3000.0));
        }
        other => panic!("expected monthly details, got {other:?}"),
    }
}

#[test]
fn test_monthly_variance_override_sets_every_band() {
    let mut history: Vec<Observation> = [1000.0, 4000.0, 2000.0, 5000.0, 3000.0]
        .into_iter()
        .zip(1..)
        .map(|(revenue, m)| Observation::new(date(2025, m, 1), revenue))
        .collect();
    history.push(Observation::new(date(2025, 6, 1), 500.0));
    let today = date(2025, 6, 10);

    let auto = calculate_forecasts(&history, None, &ForecastConfig::default(), today).unwrap();
    let auto_variance = auto.current_month.unwrap().variance;
    assert_relative_eq!(auto_variance, 2.0_f64.sqrt() / 3.0, epsilon = 1e-9);

    let config = ForecastConfig::default().with_variance_override(30.0);
    let result = calculate_forecasts(&history, None, &config, today).unwrap();
    assert_eq!(result.granularity, Granularity::Monthly);

    let current = result.current_month.unwrap();
    assert_relative_eq!(current.projected(), 1500.0, epsilon = 1e-9);
    assert_relative_eq!(current.low(), current.projected() * 0.7, epsilon = 1e-9);
    assert_relative_eq!(current.high(), current.projected() * 1.3, epsilon = 1e-9);

    let next = result.next_month.unwrap();
    assert_relative_eq!(next.variance, 0.3 * NEXT_PERIOD_SPREAD_MULTIPLIER, epsilon = 1e-12);
    assert_relative_eq!(next.low(), next.projected() * 0.55, epsilon = 1e-9);
    assert_relative_eq!(next.high(), next.projected() * 1.45, epsilon = 1e-9);

    let full = result.full_year.unwrap();
    assert_relative_eq!(full.low(), full.projected() * (1.0 - FULL_YEAR_SPREAD), epsilon = 1e-6);
    assert_relative_eq!(full.high(), full.projected() * (1.0 + FULL_YEAR_SPREAD), epsilon = 1e-6);
}

#[test]
fn test_explicit_granularity_overrides_inference() {
    let history = january_then_february();
    let result = calculate_forecasts(
        &history,
        Some(Granularity::Monthly),
        &ForecastConfig::default(),
        date(2025, 2, 10),
    )
    .unwrap();

    assert_eq!(result.granularity, Granularity::Monthly);
    assert!(result.patterns.is_none());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
fn test_short_history_yields_none(#[case] points: i64) {
    let history: Vec<Observation> = (0..points)
        .map(|i| Observation::new(date(2025, 1, 1) + Duration::days(i), 100.0))
        .collect();
    assert!(
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 1, 10)).is_none()
    );
}

#[test]
fn test_invalid_revenue_does_not_count_toward_minimum() {
    let history = vec![
        Observation::new(date(2025, 1, 1), 100.0),
        Observation::new(date(2025, 1, 2), f64::NAN),
        Observation::new(date(2025, 1, 3), -5.0),
        Observation::new(date(2025, 1, 4), 100.0),
    ];
    assert!(
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 1, 5)).is_none()
    );
}

#[test]
fn test_projections_are_never_inverted() {
    let history = january_then_february();
    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 2, 10)).unwrap();

    let projections = result.projections();
    assert_eq!(projections.len(), 3);
    for projection in projections {
        assert!(projection.low() <= projection.projected());
        assert!(projection.projected() <= projection.high());
        assert!(projection.low() >= 0.0);
    }
}
