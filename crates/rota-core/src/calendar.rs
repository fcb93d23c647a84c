//! Timezone-agnostic Gregorian date arithmetic shared by the rule evaluator.
//!
//! Every function here is total. The only partial primitive,
//! [`nth_weekday_of_month`], reports a missing ordinal as `None`.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RuleError;

/// First day of the week used for every week boundary in the engine.
///
/// Week-of-month rows and week indices are both computed against this day.
/// Not a locale setting.
pub const WEEK_START: Weekday = Weekday::Sunday;

/// Day of the week, numbered 1 (Sunday) through 7 (Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Weekday::Sunday),
            2 => Some(Weekday::Monday),
            3 => Some(Weekday::Tuesday),
            4 => Some(Weekday::Wednesday),
            5 => Some(Weekday::Thursday),
            6 => Some(Weekday::Friday),
            7 => Some(Weekday::Saturday),
            _ => None,
        }
    }

    /// Weekday of a calendar date.
    #[inline]
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    /// Number of days from `earlier` forward to `self`, in `0..7`.
    #[inline]
    pub const fn days_since(self, earlier: Weekday) -> u32 {
        ((self.number() + 7 - earlier.number()) % 7) as u32
    }

    /// The weekday `days` after this one.
    pub const fn plus_days(self, days: u32) -> Self {
        let zero_based = (self.number() as u32 - 1 + days % 7) % 7;
        match Self::from_number(zero_based as u8 + 1) {
            Some(day) => day,
            None => self,
        }
    }

    pub const fn short_name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sun",
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        };
        f.write_str(name)
    }
}

impl TryFrom<u8> for Weekday {
    type Error = RuleError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::from_number(number).ok_or(RuleError::InvalidWeekday(number))
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> Self {
        day.number()
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Sunday => chrono::Weekday::Sun,
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseWeekdayError(String);

impl fmt::Display for ParseWeekdayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid weekday: {}", self.0)
    }
}

impl std::error::Error for ParseWeekdayError {}

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sun" | "sunday" => Ok(Weekday::Sunday),
            "mon" | "monday" => Ok(Weekday::Monday),
            "tue" | "tues" | "tuesday" => Ok(Weekday::Tuesday),
            "wed" | "wednesday" => Ok(Weekday::Wednesday),
            "thu" | "thurs" | "thursday" => Ok(Weekday::Thursday),
            "fri" | "friday" => Ok(Weekday::Friday),
            "sat" | "saturday" => Ok(Weekday::Saturday),
            _ => Err(ParseWeekdayError(s.to_string())),
        }
    }
}

/// The seven days of a week, starting at [`WEEK_START`].
pub fn week_order() -> impl Iterator<Item = Weekday> {
    (0..7).map(|offset| WEEK_START.plus_days(offset))
}

/// A set of weekdays stored as a 7-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);
    /// Monday through Friday.
    pub const WEEKDAYS: WeekdaySet = WeekdaySet(0b011_1110);
    /// Saturday and Sunday.
    pub const WEEKENDS: WeekdaySet = WeekdaySet(0b100_0001);
    pub const ALL: WeekdaySet = WeekdaySet(0b111_1111);

    #[inline]
    const fn bit(day: Weekday) -> u8 {
        1 << (day.number() - 1)
    }

    pub const fn single(day: Weekday) -> Self {
        WeekdaySet(Self::bit(day))
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn remove(&mut self, day: Weekday) {
        self.0 &= !Self::bit(day);
    }

    #[must_use]
    pub const fn with(self, day: Weekday) -> Self {
        WeekdaySet(self.0 | Self::bit(day))
    }

    #[inline]
    pub const fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in week order, starting at [`WEEK_START`].
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        week_order().filter(move |day| self.contains(*day))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter()
            .fold(WeekdaySet::EMPTY, |set, day| set.with(day))
    }
}

impl From<Vec<Weekday>> for WeekdaySet {
    fn from(days: Vec<Weekday>) -> Self {
        days.into_iter().collect()
    }
}

impl From<WeekdaySet> for Vec<Weekday> {
    fn from(set: WeekdaySet) -> Self {
        // Serialized in numeric order so encodings are stable regardless of WEEK_START.
        Weekday::ALL.into_iter().filter(|day| set.contains(*day)).collect()
    }
}

/// "1st".."5th" or "last" occurrence of a weekday within a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum OrdinalWeek {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Last,
}

impl OrdinalWeek {
    /// 1-based position, or `None` for [`OrdinalWeek::Last`].
    pub const fn position(self) -> Option<u32> {
        match self {
            OrdinalWeek::First => Some(1),
            OrdinalWeek::Second => Some(2),
            OrdinalWeek::Third => Some(3),
            OrdinalWeek::Fourth => Some(4),
            OrdinalWeek::Fifth => Some(5),
            OrdinalWeek::Last => None,
        }
    }

    pub const fn number(self) -> i8 {
        match self.position() {
            Some(position) => position as i8,
            None => -1,
        }
    }
}

impl TryFrom<i8> for OrdinalWeek {
    type Error = RuleError;

    fn try_from(number: i8) -> Result<Self, Self::Error> {
        match number {
            1 => Ok(OrdinalWeek::First),
            2 => Ok(OrdinalWeek::Second),
            3 => Ok(OrdinalWeek::Third),
            4 => Ok(OrdinalWeek::Fourth),
            5 => Ok(OrdinalWeek::Fifth),
            -1 => Ok(OrdinalWeek::Last),
            other => Err(RuleError::InvalidOrdinal(other)),
        }
    }
}

impl From<OrdinalWeek> for i8 {
    fn from(ordinal: OrdinalWeek) -> Self {
        ordinal.number()
    }
}

#[inline]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Length of `month` in `year`. Returns 0 for a month outside `1..=12`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// First date of the week containing `date`, per [`WEEK_START`].
///
/// `None` when that day precedes [`NaiveDate::MIN`].
pub fn start_of_week(date: NaiveDate) -> Option<NaiveDate> {
    date_in_week(week_index(date), WEEK_START)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let last = days_in_month(date.year(), date.month());
    NaiveDate::from_ymd_opt(date.year(), date.month(), last).unwrap_or(date)
}

/// Monotonic week counter: consecutive weeks differ by exactly one.
///
/// Only meaningful for subtraction and modulo; never displayed.
pub fn week_index(date: NaiveDate) -> i64 {
    let week_start = i64::from(date.num_days_from_ce()) - i64::from(Weekday::of(date).days_since(WEEK_START));
    (week_start - week_start_shift()).div_euclid(7)
}

/// The date with `weekday` in the week numbered `index` (see [`week_index`]).
///
/// Works on day counts, so weeks that straddle the ends of the representable
/// range still resolve their in-range days.
pub fn date_in_week(index: i64, weekday: Weekday) -> Option<NaiveDate> {
    let days = index
        .checked_mul(7)?
        .checked_add(week_start_shift())?
        .checked_add(i64::from(weekday.days_since(WEEK_START)))?;
    NaiveDate::from_num_days_from_ce_opt(i32::try_from(days).ok()?)
}

/// Day 0 of `num_days_from_ce` (0000-12-31) is a Sunday.
#[inline]
fn week_start_shift() -> i64 {
    i64::from(WEEK_START.days_since(Weekday::Sunday))
}

/// Monotonic month counter (`year * 12 + month - 1`).
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Inverse of [`month_index`]: the first day of the indexed month.
pub fn month_from_index(index: i64) -> Option<NaiveDate> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Resolves an ordinal weekday pattern inside a month.
///
/// # Behavior
/// - `First`..`Fifth` count forward from the 1st of the month
/// - `Last` scans backward from the month's final day
/// - Returns `None` when the ordinal does not exist that month (a 5th Friday
///   in a month with four Fridays) or the year/month is not a valid date
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    ordinal: OrdinalWeek,
) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    match ordinal.position() {
        Some(position) => {
            let day = 1 + weekday.days_since(Weekday::of(first)) + 7 * (position - 1);
            NaiveDate::from_ymd_opt(year, month, day)
        }
        None => {
            let last = end_of_month(first);
            (0..7)
                .filter_map(|back| last.checked_sub_days(Days::new(back)))
                .find(|date| Weekday::of(*date) == weekday)
        }
    }
}

/// 1-based row of `date` within its month, where rows break at [`WEEK_START`].
///
/// The first row may be partial; a month spans four to six rows.
pub fn week_of_month(date: NaiveDate) -> u32 {
    let lead = Weekday::of(start_of_month(date)).days_since(WEEK_START);
    (date.day0() + lead) / 7 + 1
}

/// Whether `date` falls in the final week row of its month.
pub fn is_last_week_of_month(date: NaiveDate) -> bool {
    week_of_month(date) == week_of_month(end_of_month(date))
}
