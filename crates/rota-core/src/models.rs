use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use uuid::Uuid;

use crate::calendar::Weekday;
use crate::evaluator::{self, Occurrences};
use crate::rule::Recurrence;

/// A schedulable task. `start` is the anchor every recurrence is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub start: NaiveDate,
    /// Inclusive last day the task may occur on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// Default time of day, used when the rule has no per-day time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl Task {
    pub fn new(name: impl Into<String>, start: NaiveDate) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            start,
            end: None,
            time: None,
            recurrence: None,
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Returns a copy anchored at `start`.
    ///
    /// Anchoring is never implicit: cadence rules such as "every 2 weeks"
    /// count from the anchor, so moving it shifts every future occurrence.
    pub fn reanchor(&self, start: NaiveDate) -> Task {
        Task {
            start,
            ..self.clone()
        }
    }

    /// Whether the task falls on `date`. Non-recurring tasks fall only on their start date.
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        match &self.recurrence {
            Some(rule) => evaluator::matches(rule, self.start, self.end, date),
            None => date == self.start,
        }
    }

    /// Scheduled dates in `[range.start, range.end)`, ascending.
    pub fn occurrences(&self, range: Range<NaiveDate>) -> TaskOccurrences<'_> {
        match &self.recurrence {
            Some(rule) => TaskOccurrences::Recurring(evaluator::occurrences(rule, self.start, self.end, range)),
            None => TaskOccurrences::Once(range.contains(&self.start).then_some(self.start)),
        }
    }

    /// First scheduled date strictly after `after`.
    pub fn next_occurrence(&self, after: NaiveDate) -> Option<NaiveDate> {
        match &self.recurrence {
            Some(rule) => evaluator::next_occurrence(rule, self.start, self.end, after),
            None => (self.start > after).then_some(self.start),
        }
    }

    /// Date and time the task is due on `date`, or `None` if it is not scheduled
    /// then or has no time of day.
    ///
    /// A per-weekday time on the rule wins over the task's default time.
    pub fn scheduled_at(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        if !self.is_scheduled_on(date) {
            return None;
        }
        let time = self
            .recurrence
            .as_ref()
            .and_then(|rule| rule.time_on(Weekday::of(date)))
            .or(self.time)?;
        Some(date.and_time(time))
    }
}

/// Iterator returned by [`Task::occurrences`].
#[derive(Debug, Clone)]
pub enum TaskOccurrences<'a> {
    Recurring(Occurrences<'a>),
    Once(Option<NaiveDate>),
}

impl Iterator for TaskOccurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        match self {
            TaskOccurrences::Recurring(inner) => inner.next(),
            TaskOccurrences::Once(date) => date.take(),
        }
    }
}
