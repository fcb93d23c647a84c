//! Recurrence rule model.
//!
//! A [`Recurrence`] is an immutable value embedded in its owning task. It carries
//! no anchor: the task's start date is supplied to the evaluator on every call,
//! so changing the start date re-anchors every computation.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::collections::{BTreeMap, BTreeSet};

use crate::calendar::{days_in_month, OrdinalWeek, Weekday, WeekdaySet};
use crate::error::{CoreError, RuleError};

/// Top-level recurrence shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recurrence {
    /// Every calendar day from the anchor on.
    Daily,
    Weekly(WeeklyRule),
    Monthly(MonthlyRule),
    Yearly(YearlyRule),
}

/// Weekly recurrence modes.
///
/// Every mode except `SelectedDays` recurs on the anchor's weekday.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WeeklyRule {
    /// Any date whose weekday is in `days`, with optional per-weekday times.
    SelectedDays {
        days: WeekdaySet,
        #[serde_as(as = "Vec<(_, _)>")]
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        times: BTreeMap<Weekday, NaiveTime>,
    },
    /// Once every `interval` weeks, counted from the anchor's week.
    EveryNWeeks { interval: u32 },
    /// Weeks of the month whose row matches one of `weeks`.
    SpecificWeeksOfMonth { weeks: BTreeSet<OrdinalWeek> },
    /// Weeks where `(week - anchor week) mod k == offset`.
    Modulo { k: u32, offset: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRule {
    pub months: MonthFilter,
    pub days: DaySelector,
}

/// Which months a monthly rule is evaluated in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonthFilter {
    /// Every `interval` months counted from the anchor's month. An interval of
    /// 1 leaves the months unrestricted.
    EveryNMonths { interval: u32 },
    /// Month numbers 1-12.
    SpecificMonths { months: BTreeSet<u32> },
}

/// Which days inside a qualifying month occur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DaySelector {
    /// Days of month 1-31. A day past the month's length is skipped that month.
    Days { days: BTreeSet<u32> },
    Ordinal { patterns: BTreeSet<OrdinalPattern> },
}

/// "The Nth (or last) `weekday` of the month".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrdinalPattern {
    pub ordinal: OrdinalWeek,
    pub weekday: Weekday,
}

impl OrdinalPattern {
    pub const fn new(ordinal: OrdinalWeek, weekday: Weekday) -> Self {
        Self { ordinal, weekday }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum YearlyRule {
    /// Every year on `month`/`day`.
    FixedDate { month: u32, day: u32 },
    /// The anchor's month and day, every `interval` years.
    EveryNYears { interval: u32 },
    /// The anchor's month and day in years where `(year - anchor year) mod k == offset`.
    Modulo { k: u32, offset: u32 },
}

impl Recurrence {
    pub fn selected_days(days: WeekdaySet) -> Self {
        Recurrence::Weekly(WeeklyRule::SelectedDays {
            days,
            times: BTreeMap::new(),
        })
    }

    pub fn every_n_weeks(interval: u32) -> Self {
        Recurrence::Weekly(WeeklyRule::EveryNWeeks { interval })
    }

    pub fn weeks_of_month(weeks: impl IntoIterator<Item = OrdinalWeek>) -> Self {
        Recurrence::Weekly(WeeklyRule::SpecificWeeksOfMonth {
            weeks: weeks.into_iter().collect(),
        })
    }

    pub fn weekly_modulo(k: u32, offset: u32) -> Self {
        Recurrence::Weekly(WeeklyRule::Modulo { k, offset })
    }

    pub fn monthly(months: MonthFilter, days: DaySelector) -> Self {
        Recurrence::Monthly(MonthlyRule { months, days })
    }

    /// Every month on the given days of month.
    pub fn monthly_on_days(days: impl IntoIterator<Item = u32>) -> Self {
        Self::monthly(
            MonthFilter::EveryNMonths { interval: 1 },
            DaySelector::Days {
                days: days.into_iter().collect(),
            },
        )
    }

    /// Every month on the given ordinal weekday patterns.
    pub fn monthly_on_ordinals(patterns: impl IntoIterator<Item = OrdinalPattern>) -> Self {
        Self::monthly(
            MonthFilter::EveryNMonths { interval: 1 },
            DaySelector::Ordinal {
                patterns: patterns.into_iter().collect(),
            },
        )
    }

    pub fn yearly_on(month: u32, day: u32) -> Self {
        Recurrence::Yearly(YearlyRule::FixedDate { month, day })
    }

    pub fn every_n_years(interval: u32) -> Self {
        Recurrence::Yearly(YearlyRule::EveryNYears { interval })
    }

    pub fn yearly_modulo(k: u32, offset: u32) -> Self {
        Recurrence::Yearly(YearlyRule::Modulo { k, offset })
    }

    /// Attaches a time of day to one weekday of a `SelectedDays` rule.
    ///
    /// Other shapes carry no per-day times and are returned unchanged. A time
    /// for a weekday outside `days` is kept but fails [`Recurrence::validate`].
    #[must_use]
    pub fn with_time(mut self, weekday: Weekday, time: NaiveTime) -> Self {
        if let Recurrence::Weekly(WeeklyRule::SelectedDays { times, .. }) = &mut self {
            times.insert(weekday, time);
        }
        self
    }

    /// Per-weekday time of day, if this rule configures one for `weekday`.
    pub fn time_on(&self, weekday: Weekday) -> Option<NaiveTime> {
        match self {
            Recurrence::Weekly(WeeklyRule::SelectedDays { times, .. }) => times.get(&weekday).copied(),
            _ => None,
        }
    }

    /// Validates the rule at the point it is activated.
    ///
    /// # Behavior
    /// - Rejects `interval < 1`, `k < 2`, and `offset >= k`
    /// - Rejects day, month and fixed-date values outside the calendar
    /// - Rejects empty weekday, week, day, month and pattern sets
    /// - Rejects per-weekday times for weekdays that are not selected
    pub fn validate(&self) -> Result<(), RuleError> {
        self.check(false)
    }

    /// Whether the evaluator can interpret this rule.
    ///
    /// Same checks as [`Recurrence::validate`] except that empty sets are
    /// accepted, since they describe a rule that never occurs. Unused
    /// per-weekday times are ignored.
    pub fn is_well_formed(&self) -> bool {
        self.check(true).is_ok()
    }

    fn check(&self, lenient: bool) -> Result<(), RuleError> {
        let require = |empty: bool, what: &'static str| {
            if empty && !lenient {
                Err(RuleError::EmptySet(what))
            } else {
                Ok(())
            }
        };

        match self {
            Recurrence::Daily => Ok(()),
            Recurrence::Weekly(weekly) => match weekly {
                WeeklyRule::SelectedDays { days, times } => {
                    require(days.is_empty(), "weekday")?;
                    match times.keys().find(|day| !days.contains(**day)) {
                        Some(day) if !lenient => Err(RuleError::OrphanTime(*day)),
                        _ => Ok(()),
                    }
                }
                WeeklyRule::EveryNWeeks { interval } => check_interval(*interval),
                WeeklyRule::SpecificWeeksOfMonth { weeks } => require(weeks.is_empty(), "week of month"),
                WeeklyRule::Modulo { k, offset } => check_modulo(*k, *offset),
            },
            Recurrence::Monthly(MonthlyRule { months, days }) => {
                match months {
                    MonthFilter::EveryNMonths { interval } => check_interval(*interval)?,
                    MonthFilter::SpecificMonths { months } => {
                        require(months.is_empty(), "month")?;
                        if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
                            return Err(RuleError::MonthOutOfRange(*bad));
                        }
                    }
                }
                match days {
                    DaySelector::Days { days } => {
                        require(days.is_empty(), "day of month")?;
                        if let Some(bad) = days.iter().find(|d| !(1..=31).contains(*d)) {
                            return Err(RuleError::DayOutOfRange(*bad));
                        }
                        Ok(())
                    }
                    DaySelector::Ordinal { patterns } => require(patterns.is_empty(), "weekday pattern"),
                }
            }
            Recurrence::Yearly(yearly) => match yearly {
                YearlyRule::FixedDate { month, day } => {
                    // Validated against a leap year so that February 29 is accepted.
                    if *day == 0 || *day > days_in_month(2000, *month) {
                        Err(RuleError::InvalidFixedDate { month: *month, day: *day })
                    } else {
                        Ok(())
                    }
                }
                YearlyRule::EveryNYears { interval } => check_interval(*interval),
                YearlyRule::Modulo { k, offset } => check_modulo(*k, *offset),
            },
        }
    }

    /// Decodes a rule from its persisted JSON form.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the rule in its persisted JSON form.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Short English description, resolved against the anchor where a mode
    /// inherits the anchor's weekday or date.
    pub fn describe(&self, anchor: NaiveDate) -> String {
        let weekday = Weekday::of(anchor);
        match self {
            Recurrence::Daily => "Every day".to_string(),
            Recurrence::Weekly(WeeklyRule::SelectedDays { days, .. }) => {
                if *days == WeekdaySet::ALL {
                    "Every day".to_string()
                } else if *days == WeekdaySet::WEEKDAYS {
                    "Every weekday".to_string()
                } else if *days == WeekdaySet::WEEKENDS {
                    "Every weekend".to_string()
                } else {
                    let names: Vec<&str> = days.iter().map(Weekday::short_name).collect();
                    format!("Every week on {}", names.join(", "))
                }
            }
            Recurrence::Weekly(WeeklyRule::EveryNWeeks { interval: 1 }) => format!("Every {}", weekday),
            Recurrence::Weekly(WeeklyRule::EveryNWeeks { interval }) => {
                format!("Every {} weeks on {}", interval, weekday)
            }
            Recurrence::Weekly(WeeklyRule::SpecificWeeksOfMonth { weeks }) => {
                let names: Vec<&str> = weeks.iter().map(|w| ordinal_name(*w)).collect();
                format!("{} in the {} week of the month", weekday, names.join(", "))
            }
            Recurrence::Weekly(WeeklyRule::Modulo { k, offset }) => {
                format!("{} every {} weeks (offset {})", weekday, k, offset)
            }
            Recurrence::Monthly(MonthlyRule { months, days }) => {
                let on = match days {
                    DaySelector::Days { days } => {
                        let list: Vec<String> = days.iter().map(u32::to_string).collect();
                        format!("day {}", list.join(", "))
                    }
                    DaySelector::Ordinal { patterns } => {
                        let list: Vec<String> = patterns
                            .iter()
                            .map(|p| format!("the {} {}", ordinal_name(p.ordinal), p.weekday))
                            .collect();
                        list.join(", ")
                    }
                };
                match months {
                    MonthFilter::EveryNMonths { interval: 1 } => format!("Every month on {}", on),
                    MonthFilter::EveryNMonths { interval } => format!("Every {} months on {}", interval, on),
                    MonthFilter::SpecificMonths { months } => {
                        let list: Vec<String> = months.iter().map(u32::to_string).collect();
                        format!("On {} in months {}", on, list.join(", "))
                    }
                }
            }
            Recurrence::Yearly(YearlyRule::FixedDate { month, day }) => {
                format!("Every year on {:02}-{:02}", month, day)
            }
            Recurrence::Yearly(YearlyRule::EveryNYears { interval }) => format!(
                "Every {} year(s) on {:02}-{:02}",
                interval,
                anchor.month(),
                anchor.day()
            ),
            Recurrence::Yearly(YearlyRule::Modulo { k, offset }) => format!(
                "On {:02}-{:02} every {} years (offset {})",
                anchor.month(),
                anchor.day(),
                k,
                offset
            ),
        }
    }
}

fn check_interval(interval: u32) -> Result<(), RuleError> {
    if interval == 0 {
        Err(RuleError::ZeroInterval)
    } else {
        Ok(())
    }
}

fn check_modulo(k: u32, offset: u32) -> Result<(), RuleError> {
    if k < 2 {
        Err(RuleError::InvalidModulus { k })
    } else if offset >= k {
        Err(RuleError::OffsetOutOfRange { offset, k })
    } else {
        Ok(())
    }
}

fn ordinal_name(ordinal: OrdinalWeek) -> &'static str {
    match ordinal {
        OrdinalWeek::First => "1st",
        OrdinalWeek::Second => "2nd",
        OrdinalWeek::Third => "3rd",
        OrdinalWeek::Fourth => "4th",
        OrdinalWeek::Fifth => "5th",
        OrdinalWeek::Last => "last",
    }
}
