use chrono::{Duration, NaiveDate};
use chrono_humanize::HumanTime;
use std::fmt::Write;

pub mod table;

/// Formats `date` with a user-supplied chrono format, falling back to ISO
/// when the format string is invalid.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(format)) {
        Ok(()) => out,
        Err(_) => date.to_string(),
    }
}

/// "today", "tomorrow", "in 2 weeks", "3 days ago".
pub fn relative_day(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        days => HumanTime::from(Duration::days(days)).to_string(),
    }
}
