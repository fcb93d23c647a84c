use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::Range;

use crate::models::Task;

/// Summary of how well a recurring task was kept over a date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompletionStats {
    /// Occurrences in the range.
    pub scheduled: usize,
    /// Occurrences that have a completion. Completions on other dates are ignored.
    pub completed: usize,
    /// `completed / scheduled`, or 0 when nothing was scheduled.
    pub completion_rate: f64,
    /// Completed occurrences in a row, ending at the last occurrence in the range.
    pub current_streak: usize,
    pub longest_streak: usize,
}

impl CompletionStats {
    /// Folds an ascending sequence of occurrence dates against the set of
    /// dates the task was completed on.
    pub fn from_occurrences(
        occurrences: impl IntoIterator<Item = NaiveDate>,
        completions: &BTreeSet<NaiveDate>,
    ) -> Self {
        let mut stats = CompletionStats::default();
        let mut run = 0;

        for date in occurrences {
            stats.scheduled += 1;
            if completions.contains(&date) {
                stats.completed += 1;
                run += 1;
                stats.longest_streak = stats.longest_streak.max(run);
            } else {
                run = 0;
            }
        }

        stats.current_streak = run;
        if stats.scheduled > 0 {
            stats.completion_rate = stats.completed as f64 / stats.scheduled as f64;
        }

        tracing::debug!(
            scheduled = stats.scheduled,
            completed = stats.completed,
            "computed completion stats"
        );
        stats
    }

    pub fn for_task(task: &Task, range: Range<NaiveDate>, completions: &BTreeSet<NaiveDate>) -> Self {
        Self::from_occurrences(task.occurrences(range), completions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Recurrence;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_streaks_and_rate() {
        let task = Task::new("Journal", date(2024, 1, 1)).with_recurrence(Recurrence::Daily);
        // Done on 1-3, missed 4, done 5-6, plus a stray completion before the anchor
        let done: BTreeSet<_> = [
            date(2023, 12, 31),
            date(2024, 1, 1),
            date(2024, 1, 2),
            date(2024, 1, 3),
            date(2024, 1, 5),
            date(2024, 1, 6),
        ]
        .into();

        let stats = CompletionStats::for_task(&task, date(2024, 1, 1)..date(2024, 1, 7), &done);
        assert_eq!(stats.scheduled, 6);
        assert_eq!(stats.completed, 5);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.current_streak, 2);
        assert!((stats.completion_rate - 5.0 / 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_broken_trailing_streak() {
        let task = Task::new("Run", date(2024, 1, 1)).with_recurrence(Recurrence::every_n_weeks(1));
        let done: BTreeSet<_> = [date(2024, 1, 1), date(2024, 1, 8)].into();

        let stats = CompletionStats::for_task(&task, date(2024, 1, 1)..date(2024, 1, 22), &done);
        assert_eq!(stats.scheduled, 3);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn test_nothing_scheduled() {
        let stats = CompletionStats::from_occurrences(std::iter::empty(), &BTreeSet::new());
        assert_eq!(stats, CompletionStats::default());
        assert_eq!(stats.completion_rate, 0.0);
    }
}
