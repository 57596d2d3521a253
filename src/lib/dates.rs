//! Date parsing and display for form fields.
//!
//! Records arrive with plain ISO dates (`2024-03-05`), RFC 3339 timestamps from the database,
//! or occasionally US-style `03/05/2024` entered by hand. Forms print dates long-hand
//! (`March 5, 2024`). Anything unparseable is printed as given.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%m/%d/%Y") {
        return Some(date);
    }
    None
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Long-hand date when `value` parses, the trimmed input otherwise.
pub fn display_date(value: &str) -> String {
    match parse_date(value) {
        Some(date) => format_date(date),
        None => value.trim().to_string(),
    }
}

/// Collapses an inclusive range: `March 5-7, 2024`, `March 30 - April 2, 2024`, or two full
/// dates across years. Either end may be missing or unparseable.
pub fn display_range(start: &str, end: &str) -> String {
    match (parse_date(start), parse_date(end)) {
        (Some(s), Some(e)) if s == e => format_date(s),
        (Some(s), Some(e)) if s.year() == e.year() && s.month() == e.month() => {
            format!("{}-{}", s.format("%B %-d"), e.format("%-d, %Y"))
        }
        (Some(s), Some(e)) if s.year() == e.year() => {
            format!("{} - {}", s.format("%B %-d"), e.format("%B %-d, %Y"))
        }
        (Some(s), Some(e)) => format!("{} - {}", format_date(s), format_date(e)),
        _ => {
            let start = display_date(start);
            let end = display_date(end);
            match (start.is_empty(), end.is_empty()) {
                (true, true) => String::new(),
                (false, true) => start,
                (true, false) => end,
                (false, false) => format!("{} - {}", start, end),
            }
        }
    }
}

/// Calendar days from `start` to `end`, both included. `None` when either end is missing or
/// the range runs backwards.
pub fn inclusive_days(start: &str, end: &str) -> Option<f64> {
    let (start, end) = (parse_date(start)?, parse_date(end)?);
    let days = (end - start).num_days();
    if days < 0 {
        None
    } else {
        Some((days + 1) as f64)
    }
}
