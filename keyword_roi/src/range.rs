//! Reporting date ranges

use crate::error::{Result, RoiError};
use chrono::{Duration, NaiveDate};
use revenue_forecast::parse_date;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separators between the two ends of a range, tried in order
const SEPARATORS: [&str; 4] = [" - ", " – ", "–", " to "];

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(RoiError::InvalidRange(format!("{} is after {}", start, end)));
        }
        Ok(Self { start, end })
    }

    /// Parse a header such as `Jul 11 '20 - Feb 03 '26`.
    ///
    /// Each end accepts any format `revenue_forecast::parse_date` does.
    pub fn parse(text: &str) -> Result<Self> {
        let (start, end) = SEPARATORS
            .iter()
            .find_map(|sep| text.split_once(sep))
            .ok_or_else(|| RoiError::ParseError(format!("Not a date range: {}", text.trim())))?;

        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// The `days` days up to and including `today`
    pub fn trailing_days(today: NaiveDate, days: i64) -> Self {
        Self {
            start: today - Duration::days(days.max(0)),
            end: today,
        }
    }

    /// Number of days covered, both ends included
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}
