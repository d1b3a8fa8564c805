//! Date-keyed merging of a stored history with a fresh scrape

use chrono::NaiveDate;
use revenue_forecast::Observation;
use std::collections::BTreeMap;

/// Union of two histories keyed by date, sorted ascending.
///
/// Where both sides have a date, `incoming` wins. Neither input is modified.
pub fn merge_by_date(existing: &[Observation], incoming: &[Observation]) -> Vec<Observation> {
    let mut by_date: BTreeMap<NaiveDate, Observation> = BTreeMap::new();
    for obs in existing.iter().chain(incoming) {
        by_date.insert(obs.date, obs.clone());
    }
    by_date.into_values().collect()
}
