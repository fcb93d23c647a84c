//! # Rota Core Library
//!
//! Recurrence rules for a personal task manager: a compact rule model and a
//! pure evaluator that decides which calendar dates a recurring task falls on.
//!
//! ## Features
//!
//! - **Four rule families**: daily, weekly (selected days, every N weeks,
//!   weeks of month, modulo), monthly (month filter x day selector) and yearly
//!   (fixed date, every N years, modulo)
//! - **Anchored cadences**: "every N" and modulo rules count from the task's
//!   start date
//! - **Lazy range evaluation**: occurrences are produced in order, jumping
//!   directly between qualifying periods
//! - **Stable encoding**: rules round-trip through tagged JSON
//!
//! ## Core Modules
//!
//! - [`calendar`]: Weekday numbering, week/month indices and week-of-month rows
//! - [`rule`]: The [`Recurrence`] model, validation and JSON codec
//! - [`evaluator`]: [`matches`](evaluator::matches) and [`occurrences`](evaluator::occurrences)
//! - [`models`]: The [`Task`] that owns a rule and its anchor
//! - [`stats`]: Completion counts and streaks over a range
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rota_core::{Recurrence, Task};
//!
//! let anchor = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let task = Task::new("Team sync", anchor).with_recurrence(Recurrence::every_n_weeks(2));
//!
//! let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let dates: Vec<_> = task.occurrences(anchor..march).collect();
//! assert_eq!(dates.len(), 4);
//! ```

pub mod calendar;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod rule;
pub mod stats;

pub use calendar::{OrdinalWeek, Weekday, WeekdaySet, WEEK_START};
pub use error::{CoreError, RuleError};
pub use evaluator::{matches, next_occurrence, occurrences, Occurrences};
pub use models::Task;
pub use rule::{DaySelector, MonthFilter, MonthlyRule, OrdinalPattern, Recurrence, WeeklyRule, YearlyRule};
pub use stats::CompletionStats;
