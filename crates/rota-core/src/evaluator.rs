//! Occurrence evaluation for recurrence rules.
//!
//! Both entry points are pure functions of `(rule, anchor, end, query)`:
//!
//! - [`matches`] answers "is `date` an occurrence?"
//! - [`occurrences`] lazily lists the occurrences inside a half-open range
//!
//! The range iterator jumps straight to the next qualifying week, month or
//! year instead of testing every day, and yields exactly the dates `matches`
//! accepts.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeSet, VecDeque};
use std::iter::FusedIterator;
use std::ops::Range;

use crate::calendar::{
    date_in_week, is_last_week_of_month, month_from_index, month_index, nth_weekday_of_month,
    start_of_month, start_of_week, start_of_year, week_index, week_of_month, OrdinalWeek, Weekday,
    WEEK_START,
};
use crate::rule::{DaySelector, MonthFilter, MonthlyRule, Recurrence, WeeklyRule, YearlyRule};

/// How far [`next_occurrence`] looks ahead: one full Gregorian cycle.
pub const SEARCH_HORIZON_YEARS: i32 = 400;

/// Returns whether `date` is an occurrence of `rule` anchored at `anchor`.
///
/// # Arguments
/// * `rule` - The recurrence rule
/// * `anchor` - The owning task's start date
/// * `end` - Optional inclusive end date
/// * `date` - The candidate date
///
/// # Behavior
/// - Dates before `anchor` or after `end` never match
/// - A malformed rule (see [`Recurrence::is_well_formed`]) never matches
/// - Otherwise applies the shape-specific predicate
pub fn matches(rule: &Recurrence, anchor: NaiveDate, end: Option<NaiveDate>, date: NaiveDate) -> bool {
    if date < anchor || end.is_some_and(|end| date > end) {
        return false;
    }
    if !rule.is_well_formed() {
        tracing::trace!(?rule, "malformed recurrence rule treated as never occurring");
        return false;
    }

    match rule {
        Recurrence::Daily => true,
        Recurrence::Weekly(weekly) => {
            let weekday = Weekday::of(date);
            let same_weekday = weekday == Weekday::of(anchor);
            let weeks_apart = week_index(date) - week_index(anchor);
            match weekly {
                WeeklyRule::SelectedDays { days, .. } => days.contains(weekday),
                WeeklyRule::EveryNWeeks { interval } => {
                    same_weekday && periods_until_due(weeks_apart, i64::from(*interval), 0) == 0
                }
                WeeklyRule::SpecificWeeksOfMonth { weeks } => same_weekday && in_weeks_of_month(weeks, date),
                WeeklyRule::Modulo { k, offset } => {
                    same_weekday && periods_until_due(weeks_apart, i64::from(*k), i64::from(*offset)) == 0
                }
            }
        }
        Recurrence::Monthly(MonthlyRule { months, days }) => {
            month_qualifies(months, anchor, date) && day_selected(days, date)
        }
        Recurrence::Yearly(yearly) => {
            let same_date_as_anchor = date.month() == anchor.month() && date.day() == anchor.day();
            let years_apart = i64::from(date.year()) - i64::from(anchor.year());
            match yearly {
                YearlyRule::FixedDate { month, day } => date.month() == *month && date.day() == *day,
                YearlyRule::EveryNYears { interval } => {
                    same_date_as_anchor && periods_until_due(years_apart, i64::from(*interval), 0) == 0
                }
                YearlyRule::Modulo { k, offset } => {
                    same_date_as_anchor && periods_until_due(years_apart, i64::from(*k), i64::from(*offset)) == 0
                }
            }
        }
    }
}

/// Lists the occurrences of `rule` in `range`, in ascending order.
///
/// # Arguments
/// * `rule` - The recurrence rule
/// * `anchor` - The owning task's start date
/// * `end` - Optional inclusive end date
/// * `range` - Half-open query range `[from, to)`
///
/// # Behavior
/// - Restricted to `[max(anchor, from), min(end + 1, to))`
/// - An empty or inverted range yields nothing
/// - A malformed rule yields nothing
/// - The returned iterator is lazy: dropping it early computes nothing further
pub fn occurrences(
    rule: &Recurrence,
    anchor: NaiveDate,
    end: Option<NaiveDate>,
    range: Range<NaiveDate>,
) -> Occurrences<'_> {
    let lower = range.start.max(anchor);
    let upper = match end.and_then(|end| end.succ_opt()) {
        Some(after_end) => range.end.min(after_end),
        None => range.end,
    };

    let next_period = if lower >= upper {
        None
    } else if !rule.is_well_formed() {
        tracing::debug!(?rule, "malformed recurrence rule yields no occurrences");
        None
    } else {
        Some(period_start(rule, lower))
    };

    Occurrences {
        rule,
        anchor,
        lower,
        upper,
        next_period,
        pending: VecDeque::new(),
    }
}

/// First occurrence strictly after `after`, looking ahead at most
/// [`SEARCH_HORIZON_YEARS`].
pub fn next_occurrence(
    rule: &Recurrence,
    anchor: NaiveDate,
    end: Option<NaiveDate>,
    after: NaiveDate,
) -> Option<NaiveDate> {
    let from = after.succ_opt()?;
    let horizon = NaiveDate::from_ymd_opt(from.year().saturating_add(SEARCH_HORIZON_YEARS), 1, 1)
        .unwrap_or(NaiveDate::MAX);
    occurrences(rule, anchor, end, from..horizon).next()
}

impl Recurrence {
    /// See [`matches`].
    pub fn matches(&self, anchor: NaiveDate, end: Option<NaiveDate>, date: NaiveDate) -> bool {
        matches(self, anchor, end, date)
    }

    /// See [`occurrences`].
    pub fn occurrences(
        &self,
        anchor: NaiveDate,
        end: Option<NaiveDate>,
        range: Range<NaiveDate>,
    ) -> Occurrences<'_> {
        occurrences(self, anchor, end, range)
    }

    /// See [`next_occurrence`].
    pub fn next_occurrence(
        &self,
        anchor: NaiveDate,
        end: Option<NaiveDate>,
        after: NaiveDate,
    ) -> Option<NaiveDate> {
        next_occurrence(self, anchor, end, after)
    }
}

/// Lazy, finite sequence of occurrence dates returned by [`occurrences`].
///
/// Expands one period (a day, week, month or year depending on the rule) at a
/// time into `pending`, then skips ahead to the next period that can contain
/// an occurrence.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    rule: &'a Recurrence,
    anchor: NaiveDate,
    /// Inclusive lower bound.
    lower: NaiveDate,
    /// Exclusive upper bound.
    upper: NaiveDate,
    /// Start of the next period to expand; `None` once exhausted.
    next_period: Option<NaiveDate>,
    /// Candidates of the current period, ascending.
    pending: VecDeque<NaiveDate>,
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        loop {
            if let Some(date) = self.pending.pop_front() {
                if date >= self.upper {
                    self.finish();
                    return None;
                }
                if date >= self.lower {
                    return Some(date);
                }
                continue;
            }

            let period = self.next_period?;
            if period >= self.upper {
                self.finish();
                return None;
            }
            tracing::trace!(%period, "expanding recurrence period");
            self.next_period = self.expand(period);
        }
    }
}

impl FusedIterator for Occurrences<'_> {}

impl Occurrences<'_> {
    fn finish(&mut self) {
        self.pending.clear();
        self.next_period = None;
    }

    /// Pushes the candidates of the period starting at `period` and returns
    /// the start of the next period worth expanding.
    fn expand(&mut self, period: NaiveDate) -> Option<NaiveDate> {
        match self.rule {
            Recurrence::Daily => {
                self.pending.push_back(period);
                period.succ_opt()
            }
            Recurrence::Weekly(weekly) => self.expand_week(weekly, period),
            Recurrence::Monthly(monthly) => self.expand_month(monthly, period),
            Recurrence::Yearly(yearly) => self.expand_year(yearly, period),
        }
    }

    /// `week_start` is the first representable day of its week, which is only
    /// short of [`WEEK_START`] in the week holding [`NaiveDate::MIN`].
    fn expand_week(&mut self, weekly: &WeeklyRule, week_start: NaiveDate) -> Option<NaiveDate> {
        let week = week_index(week_start);
        let anchor_day = date_in_week(week, Weekday::of(self.anchor));
        let weeks_apart = week - week_index(self.anchor);

        let advance = match weekly {
            WeeklyRule::SelectedDays { days, .. } => {
                self.pending
                    .extend(days.iter().filter_map(|day| date_in_week(week, day)));
                1
            }
            WeeklyRule::EveryNWeeks { interval } => {
                self.push_if_due(anchor_day, weeks_apart, i64::from(*interval), 0)
            }
            WeeklyRule::SpecificWeeksOfMonth { weeks } => {
                if let Some(date) = anchor_day.filter(|date| in_weeks_of_month(weeks, *date)) {
                    self.pending.push_back(date);
                }
                1
            }
            WeeklyRule::Modulo { k, offset } => {
                self.push_if_due(anchor_day, weeks_apart, i64::from(*k), i64::from(*offset))
            }
        };

        date_in_week(week.checked_add(advance)?, WEEK_START)
    }

    fn expand_month(&mut self, monthly: &MonthlyRule, month_start: NaiveDate) -> Option<NaiveDate> {
        let index = month_index(month_start);

        let advance = match &monthly.months {
            MonthFilter::EveryNMonths { interval } => {
                let every = i64::from(*interval);
                match periods_until_due(index - month_index(self.anchor), every, 0) {
                    0 => {
                        self.pending.extend(selected_days(&monthly.days, month_start));
                        every
                    }
                    wait => wait,
                }
            }
            MonthFilter::SpecificMonths { months } => {
                if months.contains(&month_start.month()) {
                    self.pending.extend(selected_days(&monthly.days, month_start));
                }
                1
            }
        };

        month_from_index(index.checked_add(advance)?)
    }

    fn expand_year(&mut self, yearly: &YearlyRule, year_start: NaiveDate) -> Option<NaiveDate> {
        let year = year_start.year();
        let years_apart = i64::from(year) - i64::from(self.anchor.year());
        let anchor_date = NaiveDate::from_ymd_opt(year, self.anchor.month(), self.anchor.day());

        let advance = match yearly {
            YearlyRule::FixedDate { month, day } => {
                if let Some(date) = NaiveDate::from_ymd_opt(year, *month, *day) {
                    self.pending.push_back(date);
                }
                1
            }
            YearlyRule::EveryNYears { interval } => {
                self.push_if_due(anchor_date, years_apart, i64::from(*interval), 0)
            }
            YearlyRule::Modulo { k, offset } => {
                self.push_if_due(anchor_date, years_apart, i64::from(*k), i64::from(*offset))
            }
        };

        let next_year = i32::try_from(i64::from(year).checked_add(advance)?).ok()?;
        NaiveDate::from_ymd_opt(next_year, 1, 1)
    }

    /// Pushes `candidate` when the current period is due and returns how many
    /// periods to advance to reach the next due one.
    fn push_if_due(&mut self, candidate: Option<NaiveDate>, elapsed: i64, every: i64, offset: i64) -> i64 {
        match periods_until_due(elapsed, every, offset) {
            0 => {
                if let Some(date) = candidate {
                    self.pending.push_back(date);
                }
                every
            }
            wait => wait,
        }
    }
}

/// Periods from `elapsed` until `(elapsed - offset) mod every == 0`, in `0..every`.
#[inline]
fn periods_until_due(elapsed: i64, every: i64, offset: i64) -> i64 {
    match (elapsed - offset).rem_euclid(every) {
        0 => 0,
        remainder => every - remainder,
    }
}

fn period_start(rule: &Recurrence, date: NaiveDate) -> NaiveDate {
    match rule {
        Recurrence::Daily => date,
        // The first week may start before the representable range
        Recurrence::Weekly(_) => start_of_week(date).unwrap_or(NaiveDate::MIN),
        Recurrence::Monthly(_) => start_of_month(date),
        Recurrence::Yearly(_) => start_of_year(date),
    }
}

fn in_weeks_of_month(weeks: &BTreeSet<OrdinalWeek>, date: NaiveDate) -> bool {
    let row = week_of_month(date);
    weeks.iter().any(|week| match week.position() {
        Some(position) => position == row,
        None => is_last_week_of_month(date),
    })
}

fn month_qualifies(filter: &MonthFilter, anchor: NaiveDate, date: NaiveDate) -> bool {
    match filter {
        MonthFilter::EveryNMonths { interval } => {
            periods_until_due(month_index(date) - month_index(anchor), i64::from(*interval), 0) == 0
        }
        MonthFilter::SpecificMonths { months } => months.contains(&date.month()),
    }
}

fn day_selected(selector: &DaySelector, date: NaiveDate) -> bool {
    match selector {
        DaySelector::Days { days } => days.contains(&date.day()),
        DaySelector::Ordinal { patterns } => patterns.iter().any(|pattern| {
            nth_weekday_of_month(date.year(), date.month(), pattern.weekday, pattern.ordinal) == Some(date)
        }),
    }
}

/// Concrete dates selected inside the month starting at `month_start`, ascending.
fn selected_days(selector: &DaySelector, month_start: NaiveDate) -> Vec<NaiveDate> {
    match selector {
        // Days past the month's length have no date and are skipped.
        DaySelector::Days { days } => days.iter().filter_map(|day| month_start.with_day(*day)).collect(),
        DaySelector::Ordinal { patterns } => {
            let mut dates: Vec<NaiveDate> = patterns
                .iter()
                .filter_map(|pattern| {
                    nth_weekday_of_month(month_start.year(), month_start.month(), pattern.weekday, pattern.ordinal)
                })
                .collect();
            dates.sort_unstable();
            dates.dedup();
            dates
        }
    }
}
