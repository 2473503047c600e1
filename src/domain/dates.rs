/// Calendar date helpers shared by the streak and analytics code
///
/// All dates are timezone-naive calendar days. Completion dates travel as
/// ISO `YYYY-MM-DD` strings and are only turned into `NaiveDate` values
/// here, so every parse failure surfaces as `DomainError::InvalidDateFormat`.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use crate::domain::DomainError;

/// The on-disk and on-wire date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO calendar date, rejecting anything that isn't `YYYY-MM-DD`
///
/// The input must already be canonical: no surrounding whitespace, no sign,
/// zero-padded month and day.
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    // chrono alone would take "+2024-6-1", so check the shape first
    if !is_canonical_shape(value) {
        return Err(DomainError::InvalidDateFormat(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDateFormat(value.to_string()))
}

/// `dddd-dd-dd` with ASCII digits
fn is_canonical_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Format a calendar date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The calendar day before `today`
pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today - Duration::days(1)
}

/// True when `later` is exactly one calendar day after `earlier`
pub fn is_consecutive_day(earlier: NaiveDate, later: NaiveDate) -> bool {
    earlier.succ_opt() == Some(later)
}

/// Monday of the week containing `date`
///
/// Sunday belongs to the week that started six days earlier, never to the
/// week starting the following day.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    // Sunday = 0, Monday = 1 ... Saturday = 6
    let day_index = date.weekday().num_days_from_sunday() as i64;
    let step_back = if day_index == 0 { 6 } else { day_index - 1 };
    date - Duration::days(step_back)
}

/// The seven ISO date strings of the window beginning at `start`
pub fn week_dates(start: NaiveDate) -> [String; 7] {
    std::array::from_fn(|offset| format_date(start + Duration::days(offset as i64)))
}

/// Number of days in a month, `None` for an invalid year/month pair
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next_first - first).num_days() as u32)
}

/// Short label used by the weekly chart ("Mon" .. "Sun")
pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
