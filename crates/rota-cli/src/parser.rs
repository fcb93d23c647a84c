use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};
use rota_core::{CoreError, Recurrence};
use std::collections::BTreeSet;
use std::path::Path;

/// Parses an ISO `YYYY-MM-DD` date, or an English phrase such as "tomorrow"
/// or "next friday" relative to `today`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    let noon = today
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| anyhow!("Cannot represent {} as a date and time", today))?;
    parse_date_string(input, Utc.from_utc_datetime(&noon), Dialect::Us)
        .map(|parsed| parsed.date_naive())
        .map_err(|e| anyhow!(CoreError::InvalidInput(format!("Failed to parse date '{}': {}", input, e))))
}

/// Parses a comma-separated list of dates. Blank entries are ignored.
pub fn parse_date_list(input: &str, today: NaiveDate) -> Result<BTreeSet<NaiveDate>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_date(part, today))
        .collect()
}

/// Parses a time of day: `14:30`, `14:30:00`, `9:00 AM` or `9am`.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let normalized = input.trim().to_uppercase();
    // chrono needs minutes to build a time, so "9PM" becomes "9:00 PM"
    let split = normalized
        .len()
        .checked_sub(2)
        .filter(|at| normalized.is_char_boundary(*at))
        .map(|at| normalized.split_at(at));
    let normalized = match split {
        Some((hour, suffix)) if (suffix == "AM" || suffix == "PM") && !hour.contains(':') => {
            format!("{}:00 {}", hour.trim(), suffix)
        }
        _ => normalized,
    };
    ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&normalized, format).ok())
        .ok_or_else(|| anyhow!(CoreError::InvalidInput(format!("Failed to parse time '{}'", input))))
}

/// Loads a rule from a JSON file path, or from inline JSON.
pub fn load_rule(source: &str) -> Result<Recurrence> {
    let path = Path::new(source);
    let json = if path.is_file() {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read rule file '{}'", source))?
    } else if source.trim_start().starts_with('{') {
        source.to_string()
    } else {
        return Err(anyhow!(CoreError::InvalidInput(format!(
            "'{}' is neither a rule file nor inline JSON",
            source
        ))));
    };

    Ok(Recurrence::from_json(&json)?)
}
