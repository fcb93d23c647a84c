use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::str::FromStr;

pub const CONFIG_FILE: &str = "rota.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Zone used to decide what "today" is (IANA format)
    pub timezone: String,
    /// Length of the `list` range when `--to` is omitted
    pub lookahead_days: u32,
    /// Number of occurrences `next` shows by default
    pub preview_count: usize,
    /// chrono format string for printed dates
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: detect_system_timezone(),
            lookahead_days: 30,
            preview_count: 5,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed("ROTA_")),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }

    /// Loads the configuration, falling back to defaults when it cannot be read
    /// and to the system zone when `timezone` is not an IANA name.
    pub fn load() -> Self {
        Self::new()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "invalid configuration, using defaults");
                Self::default()
            })
            .with_valid_timezone()
    }

    fn with_valid_timezone(mut self) -> Self {
        if let Err(e) = validate_timezone(&self.timezone) {
            let fallback = detect_system_timezone();
            tracing::warn!(error = %e, %fallback, "ignoring configured timezone");
            self.timezone = fallback;
        }
        self
    }

    /// Today's calendar date in the configured zone.
    pub fn today(&self) -> Result<NaiveDate> {
        let tz = validate_timezone(&self.timezone).map_err(|e| anyhow!(e))?;
        Ok(Utc::now().with_timezone(&tz).date_naive())
    }
}

/// Validates that a timezone string is a valid IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<Tz, String> {
    Tz::from_str(timezone).map_err(|_| {
        format!(
            "Invalid timezone: '{}'. Use IANA timezone names like 'America/New_York'",
            timezone
        )
    })
}

/// Detects the system timezone, falling back to UTC if detection fails
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(tz) = std::fs::read_to_string("/etc/timezone") {
            let tz = tz.trim();
            if validate_timezone(tz).is_ok() {
                return tz.to_string();
            }
        }
    }

    if let Ok(local_tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&local_tz).is_ok() {
            return local_tz;
        }
    }

    "UTC".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::Serialized;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let figment = Figment::new().merge(Toml::string("lookahead_days = 90\ntimezone = \"Asia/Tokyo\""));
        let config = Config::from_figment(figment).unwrap();
        assert_eq!(config.lookahead_days, 90);
        assert_eq!(config.timezone, "Asia/Tokyo");
        assert_eq!(config.preview_count, 5);
        assert_eq!(config.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let figment = Figment::new().merge(Serialized::default("preview_count", "many"));
        assert!(Config::from_figment(figment).is_err());
    }

    #[test]
    fn test_validate_timezone() {
        assert!(validate_timezone("Europe/Berlin").is_ok());
        assert!(validate_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_bad_zone_falls_back_to_system_zone() {
        let config = Config {
            timezone: "Nowhere".to_string(),
            ..Config::default()
        }
        .with_valid_timezone();
        assert_eq!(config.timezone, detect_system_timezone());
        assert!(config.today().is_ok());
    }

    #[test]
    fn test_good_zone_is_kept() {
        let config = Config {
            timezone: "Asia/Tokyo".to_string(),
            lookahead_days: 7,
            ..Config::default()
        }
        .with_valid_timezone();
        assert_eq!(config.timezone, "Asia/Tokyo");
        assert_eq!(config.lookahead_days, 7);
    }
}
