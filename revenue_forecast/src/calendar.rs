//! Calendar arithmetic on `NaiveDate`, month numbers are 1-based

use chrono::{Datelike, NaiveDate, Weekday};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Whether `year` is a leap year in the proleptic Gregorian calendar
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Move `delta` months away from `(year, month)`
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// The calendar month after `(year, month)`
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    shift_month(year, month, 1)
}

/// The calendar month before `(year, month)`
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    shift_month(year, month, -1)
}

/// Whole calendar months from `date` to `today`; negative when `date` is later
pub fn months_between(date: NaiveDate, today: NaiveDate) -> i32 {
    (today.year() - date.year()) * 12 + today.month() as i32 - date.month() as i32
}

/// Same month and day one year earlier; Feb 29 maps to Feb 28
pub fn same_day_last_year(date: NaiveDate) -> Option<NaiveDate> {
    let year = date.year() - 1;
    NaiveDate::from_ymd_opt(year, date.month(), date.day()).or_else(|| {
        NaiveDate::from_ymd_opt(year, date.month(), days_in_month(year, date.month()))
    })
}

/// English month name for a 1-based month
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// Resolve a month name or three-letter abbreviation, case-insensitively
pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.trim().trim_end_matches('.').to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|full| {
            let full = full.to_lowercase();
            full == lower || full[..3] == lower || (lower == "sept" && full == "september")
        })
        .map(|i| i as u32 + 1)
}

/// Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// First day of `year`
pub fn start_of_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}
