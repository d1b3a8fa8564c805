use chrono::{Datelike, Duration, NaiveDate, Weekday};
use revenue_forecast::patterns::{analyze_patterns, select_insight};
use revenue_forecast::{
    calculate_forecasts, normalize, DataQuality, ForecastConfig, Granularity, Insight,
    Observation,
};
use serde_json::Value;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn daily(from: NaiveDate, days: i64, f: impl Fn(NaiveDate) -> f64) -> Vec<Observation> {
    (0..days)
        .map(|i| {
            let day = from + Duration::days(i);
            Observation::new(day, f(day))
        })
        .collect()
}

#[test]
fn test_json_uses_camel_case_keys() {
    let history = daily(date(2025, 1, 1), 40, |_| 100.0);
    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 2, 9)).unwrap();

    let json: Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(json["granularity"], "daily");
    assert_eq!(json["dataPoints"], 40);
    assert_eq!(json["dataQuality"], "ideal");

    let current = &json["currentMonth"];
    assert!(current["projected"].is_number());
    assert!(current["mtdActual"].is_number());
    assert!(current.get("vsMoM").is_some());
    assert!(current["vsLastYear"].is_null());
    assert_eq!(current["calcDetails"]["pipeline"], "daily");

    assert_eq!(json["nextMonth"]["basis"], "recentTrend");
    assert!(json["ytd"]["asOf"].is_string());
    assert!(json["fullYear"]["high"].is_number());
}

#[test]
fn test_monthly_json_has_null_patterns() {
    let history: Vec<Observation> = (1..=4)
        .map(|m| Observation::new(date(2025, m, 1), 2000.0))
        .collect();
    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 4, 12)).unwrap();

    assert_eq!(result.data_quality, DataQuality::Minimal);
    let json: Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert!(json["patterns"].is_null());
    assert!(json["insight"].is_null());
    assert_eq!(json["currentMonth"]["calcDetails"]["pipeline"], "monthly");
}

#[test]
fn test_renewal_day_insight() {
    // Day 1 books five times a normal day
    let history = daily(date(2025, 1, 1), 90, |d| if d.day() == 1 { 500.0 } else { 100.0 });
    let result =
        calculate_forecasts(&history, None, &ForecastConfig::default(), date(2025, 4, 1)).unwrap();

    let patterns = result.patterns.as_ref().unwrap();
    assert!(patterns.day(1).unwrap().is_high);
    assert_eq!(patterns.best_day, Some(1));
    assert_eq!(
        result.insight.as_deref(),
        Some("Day 1 of month typically 4.4x average (likely renewal day)")
    );
}

#[test]
fn test_best_day_insight_when_day_one_is_flat() {
    let history = daily(date(2025, 1, 1), 90, |d| {
        if d.day() == 15 {
            200.0
        } else {
            100.0
        }
    });
    let series = normalize(&history, None).unwrap();
    let patterns = analyze_patterns(&series).unwrap();

    match select_insight(&patterns) {
        Some(Insight::BestDay { day, relative }) => {
            assert_eq!(day, 15);
            assert!(relative > 1.3);
        }
        other => panic!("expected best-day insight, got {other:?}"),
    }
}

#[test]
fn test_weekend_skew_insight() {
    let history = daily(date(2025, 1, 1), 90, |d| match d.weekday() {
        Weekday::Sat | Weekday::Sun => 50.0,
        _ => 100.0,
    });
    let series = normalize(&history, None).unwrap();
    let patterns = analyze_patterns(&series).unwrap();

    let insight = select_insight(&patterns).unwrap();
    assert_eq!(insight, Insight::WeekendSkew { ratio: 0.5 });
    assert_eq!(insight.to_string(), "Weekend revenue is 50% lower than weekdays");
}

#[test]
fn test_flat_series_has_no_insight() {
    let history = daily(date(2025, 1, 1), 60, |_| 100.0);
    let series = normalize(&history, Some(Granularity::Daily)).unwrap();
    let patterns = analyze_patterns(&series).unwrap();

    assert!(select_insight(&patterns).is_none());
    assert!(patterns.by_day.values().all(|p| !p.is_high && !p.is_low));
}
