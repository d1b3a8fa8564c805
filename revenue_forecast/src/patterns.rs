//! Day-of-month and weekend seasonality for daily series

use crate::calendar::is_weekend;
use crate::series::{Granularity, Series};
use chrono::Datelike;
use revenue_math::{mean, safe_ratio};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Relative level above which a bucket counts as high
pub const HIGH_RELATIVE: f64 = 1.1;

/// Relative level below which a bucket counts as low
pub const LOW_RELATIVE: f64 = 0.9;

/// Fewest daily observations worth analyzing
pub const MIN_PATTERN_OBSERVATIONS: usize = 7;

const RENEWAL_DAY_RELATIVE: f64 = 1.5;
const BEST_DAY_RELATIVE: f64 = 1.3;
const WEEKEND_LOW_RATIO: f64 = 0.7;
const WEEKEND_HIGH_RATIO: f64 = 1.3;

/// Revenue level of one day of the month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPattern {
    pub average: f64,
    /// `average / overall average`
    pub relative: f64,
    pub samples: usize,
    pub is_high: bool,
    pub is_low: bool,
}

/// Seasonality summary of a daily series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAnalysis {
    /// Keyed by day of month, 1 to 31
    pub by_day: BTreeMap<u32, DayPattern>,
    pub overall_average: f64,
    pub weekend_avg: Option<f64>,
    pub weekday_avg: Option<f64>,
    /// `weekend_avg / weekday_avg`
    pub weekend_vs_weekday: Option<f64>,
    pub best_day: Option<u32>,
    pub worst_day: Option<u32>,
}

impl PatternAnalysis {
    /// Pattern of a given day of month
    pub fn day(&self, day: u32) -> Option<&DayPattern> {
        self.by_day.get(&day)
    }
}

/// Bucket a daily series by day of month and weekend/weekday.
///
/// Returns `None` for weekly or monthly series, or when the series is
/// too short to say anything.
pub fn analyze_patterns(series: &Series) -> Option<PatternAnalysis> {
    if series.granularity() != Granularity::Daily || series.len() < MIN_PATTERN_OBSERVATIONS {
        return None;
    }

    let mut by_day_revenues: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    let mut weekend = Vec::new();
    let mut weekday = Vec::new();
    let mut all = Vec::with_capacity(series.len());

    for obs in series.iter() {
        by_day_revenues
            .entry(obs.date.day())
            .or_default()
            .push(obs.revenue);
        if is_weekend(obs.date) {
            weekend.push(obs.revenue);
        } else {
            weekday.push(obs.revenue);
        }
        all.push(obs.revenue);
    }

    let overall_average = mean(&all)?;

    let by_day: BTreeMap<u32, DayPattern> = by_day_revenues
        .into_iter()
        .filter_map(|(day, revenues)| {
            let average = mean(&revenues)?;
            let relative = safe_ratio(average, overall_average).unwrap_or(1.0);
            Some((
                day,
                DayPattern {
                    average,
                    relative,
                    samples: revenues.len(),
                    is_high: relative > HIGH_RELATIVE,
                    is_low: relative < LOW_RELATIVE,
                },
            ))
        })
        .collect();

    let weekend_avg = mean(&weekend);
    let weekday_avg = mean(&weekday);
    let weekend_vs_weekday = match (weekend_avg, weekday_avg) {
        (Some(we), Some(wd)) => safe_ratio(we, wd),
        _ => None,
    };

    let mut best: Option<(u32, f64)> = None;
    let mut worst: Option<(u32, f64)> = None;
    for (&day, pattern) in &by_day {
        if best.map_or(true, |(_, r)| pattern.relative > r) {
            best = Some((day, pattern.relative));
        }
        if worst.map_or(true, |(_, r)| pattern.relative < r) {
            worst = Some((day, pattern.relative));
        }
    }

    Some(PatternAnalysis {
        by_day,
        overall_average,
        weekend_avg,
        weekday_avg,
        weekend_vs_weekday,
        best_day: best.map(|(day, _)| day),
        worst_day: worst.map(|(day, _)| day),
    })
}

/// The single headline observation about a series' seasonality
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Insight {
    /// The 1st of the month stands out, usually subscription renewals
    RenewalDay { relative: f64 },
    /// Some other day of the month stands out
    BestDay { day: u32, relative: f64 },
    /// Weekends differ markedly from weekdays
    WeekendSkew { ratio: f64 },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Insight::RenewalDay { relative } => write!(
                f,
                "Day 1 of month typically {:.1}x average (likely renewal day)",
                relative
            ),
            Insight::BestDay { day, relative } => {
                write!(f, "Day {} performs {:.1}x above average", day, relative)
            }
            Insight::WeekendSkew { ratio } if ratio < 1.0 => write!(
                f,
                "Weekend revenue is {:.0}% lower than weekdays",
                (1.0 - ratio) * 100.0
            ),
            Insight::WeekendSkew { ratio } => write!(
                f,
                "Weekend revenue is {:.0}% higher than weekdays",
                (ratio - 1.0) * 100.0
            ),
        }
    }
}

/// Pick at most one insight: renewal day, then best day, then weekend skew
pub fn select_insight(patterns: &PatternAnalysis) -> Option<Insight> {
    if let Some(day_one) = patterns.day(1) {
        if day_one.relative > RENEWAL_DAY_RELATIVE {
            return Some(Insight::RenewalDay {
                relative: day_one.relative,
            });
        }
    }

    if let Some(best) = patterns.best_day.and_then(|d| patterns.day(d).map(|p| (d, p))) {
        if best.1.relative > BEST_DAY_RELATIVE {
            return Some(Insight::BestDay {
                day: best.0,
                relative: best.1.relative,
            });
        }
    }

    match patterns.weekend_vs_weekday {
        Some(ratio) if !(WEEKEND_LOW_RATIO..=WEEKEND_HIGH_RATIO).contains(&ratio) => {
            Some(Insight::WeekendSkew { ratio })
        }
        _ => None,
    }
}
