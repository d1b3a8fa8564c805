use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use revenue_forecast::parse::parse_observations_json;
use revenue_forecast::{
    calculate_forecasts_from_raw, normalize, ForecastConfig, Granularity, Observation,
    RawObservation,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_normalize_is_idempotent() {
    let input = vec![
        Observation::new(date(2025, 1, 3), 30.0),
        Observation::new(date(2025, 1, 1), 10.0),
        Observation::new(date(2025, 1, 2), 20.0),
        Observation::new(date(2025, 1, 2), 25.0),
    ];

    let once = normalize(&input, None).unwrap();
    let twice = normalize(once.observations(), None).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_normalize_sorts_and_keeps_last_duplicate() {
    let input = vec![
        Observation::new(date(2025, 1, 3), 30.0),
        Observation::new(date(2025, 1, 2), 20.0),
        Observation::new(date(2025, 1, 1), 10.0),
        Observation::new(date(2025, 1, 2), 25.0),
    ];

    let series = normalize(&input, None).unwrap();
    let revenues: Vec<f64> = series.iter().map(|obs| obs.revenue).collect();
    assert_eq!(revenues, vec![10.0, 25.0, 30.0]);
    assert_eq!(series.granularity(), Granularity::Daily);
    // The input is left as given
    assert_eq!(input[0].date, date(2025, 1, 3));
}

#[test]
fn test_tagged_granularity_wins_over_inference() {
    let input = vec![
        Observation::new(date(2025, 1, 1), 10.0).with_granularity(Granularity::Weekly),
        Observation::new(date(2025, 1, 2), 10.0),
        Observation::new(date(2025, 1, 3), 10.0),
    ];

    assert_eq!(normalize(&input, None).unwrap().granularity(), Granularity::Weekly);
    assert_eq!(
        normalize(&input, Some(Granularity::Monthly)).unwrap().granularity(),
        Granularity::Monthly
    );
}

#[test]
fn test_raw_rows_with_mixed_formats() {
    let raw: Vec<RawObservation> = serde_json::from_str(
        r#"[
            {"date": "Jan 01 '25", "revenue": "$1,200.50"},
            {"day": "2025-01-02", "amount": 900},
            {"date": "01/03/2025", "revenue": 1000.0},
            {"date": "not a date", "revenue": 10},
            {"date": "2025-01-04", "revenue": "n/a"}
        ]"#,
    )
    .unwrap();

    let result =
        calculate_forecasts_from_raw(&raw, None, &ForecastConfig::default(), date(2025, 1, 4))
            .unwrap();
    assert_eq!(result.data_points, 3);
}

#[test]
fn test_observations_from_json_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"[{{"date": "2025-01-01", "revenue": 10}}, {{"date": "2025-02-01", "revenue": 20}}, 42]"#
    )
    .unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let observations = parse_observations_json(&text).unwrap();
    assert_eq!(observations.len(), 2);
    assert_eq!(observations[1].date, date(2025, 2, 1));
}

#[test]
fn test_non_array_json_is_an_error() {
    assert!(parse_observations_json(r#"{"date": "2025-01-01"}"#).is_err());
}
