//! Parsing of scraped dates, currency amounts and raw observation records

use crate::calendar::month_from_name;
use crate::error::{ForecastError, Result};
use crate::series::{Granularity, Observation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parse a date as it appears in dashboards and exports.
///
/// Accepted forms:
/// - ISO `2026-01-25`, optionally followed by a time part
/// - short-year headers `Jan 25 '26` (years below 50 are 20xx)
/// - `Jan 25, 2026` and `January 25 2026`
/// - US `01/25/2026`
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ForecastError::ParseError("empty date".to_string()));
    }

    if let Some(date) = trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    {
        return Ok(date);
    }

    if let Some(date) = parse_month_day_year(trimmed) {
        return Ok(date);
    }

    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y")
        .map_err(|_| ForecastError::ParseError(format!("Unrecognized date: {}", trimmed)))
}

fn parse_month_day_year(text: &str) -> Option<NaiveDate> {
    let cleaned = text.replace(',', " ");
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    let [month, day, year] = parts.as_slice() else {
        return None;
    };

    let month = month_from_name(month)?;
    let day: u32 = day.parse().ok()?;
    let year = match year.strip_prefix('\'') {
        Some(short) if short.len() == 2 => {
            let short: i32 = short.parse().ok()?;
            if short < 50 {
                2000 + short
            } else {
                1900 + short
            }
        }
        Some(_) => return None,
        None if year.len() == 4 => year.parse().ok()?,
        None => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a currency amount such as `$1,234.50` or `USD 552`
pub fn parse_currency(text: &str) -> Result<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return Err(ForecastError::ParseError(format!(
            "No amount in: {}",
            text.trim()
        )));
    }

    cleaned
        .parse::<f64>()
        .map_err(|_| ForecastError::ParseError(format!("Invalid amount: {}", text.trim())))
}

/// Revenue as delivered by a scraper: a number or a formatted string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRevenue {
    Number(f64),
    Text(String),
}

impl RawRevenue {
    /// Numeric value of the revenue
    pub fn amount(&self) -> Result<f64> {
        match self {
            RawRevenue::Number(value) => Ok(*value),
            RawRevenue::Text(text) => parse_currency(text),
        }
    }
}

/// An observation before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(default, alias = "day", alias = "timestamp")]
    pub date: Option<String>,
    #[serde(default, alias = "amount", alias = "value", alias = "total")]
    pub revenue: Option<RawRevenue>,
    #[serde(default)]
    pub granularity: Option<String>,
}

impl RawObservation {
    /// Build a raw record from already-typed parts
    pub fn new(date: impl Into<String>, revenue: f64) -> Self {
        Self {
            date: Some(date.into()),
            revenue: Some(RawRevenue::Number(revenue)),
            granularity: None,
        }
    }

    /// Validate into an `Observation`
    pub fn to_observation(&self) -> Result<Observation> {
        let date = self
            .date
            .as_deref()
            .ok_or_else(|| ForecastError::ParseError("missing date".to_string()))
            .and_then(parse_date)?;

        let revenue = self
            .revenue
            .as_ref()
            .ok_or_else(|| ForecastError::ParseError("missing revenue".to_string()))?
            .amount()?;

        if !revenue.is_finite() || revenue < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Revenue must be a non-negative number, got {}",
                revenue
            )));
        }

        // An unknown granularity tag is not worth losing the observation over
        let granularity = self
            .granularity
            .as_deref()
            .and_then(|g| g.parse::<Granularity>().ok());

        Ok(Observation {
            date,
            revenue,
            granularity,
        })
    }
}

/// Convert raw records, silently dropping the malformed ones
pub fn parse_observations(raw: &[RawObservation]) -> Vec<Observation> {
    raw.iter()
        .filter_map(|record| match record.to_observation() {
            Ok(obs) => Some(obs),
            Err(err) => {
                debug!(error = %err, "dropping malformed observation");
                None
            }
        })
        .collect()
}

/// Parse a JSON array of raw records.
///
/// Only a document that is not an array at all is an error; individual
/// entries that do not look like observations are dropped.
pub fn parse_observations_json(json: &str) -> Result<Vec<Observation>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let raw: Vec<RawObservation> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    Ok(parse_observations(&raw))
}
