use anyhow::Result;
use chrono::{Days, NaiveDate};
use owo_colors::OwoColorize;

use crate::cli::ListCommand;
use crate::commands::build_task;
use crate::config::Config;
use crate::parser::parse_date;
use crate::views::table::{display_occurrences, OccurrenceRow};

pub fn list_occurrences(command: ListCommand, config: &Config, today: NaiveDate) -> Result<()> {
    let task = build_task(&command.rule, today)?;
    let from = match &command.from {
        Some(from) => parse_date(from, today)?,
        None => task.start,
    };
    let to = match &command.to {
        Some(to) => parse_date(to, today)?,
        None => from
            .checked_add_days(Days::new(u64::from(config.lookahead_days)))
            .unwrap_or(NaiveDate::MAX),
    };

    if let Some(rule) = &task.recurrence {
        println!("{}", rule.describe(task.start).bold());
    }

    let rows: Vec<OccurrenceRow> = task
        .occurrences(from..to)
        .map(|date| OccurrenceRow {
            date,
            time: task.scheduled_at(date).map(|at| at.time()),
        })
        .collect();

    display_occurrences(&rows, &config.date_format);
    Ok(())
}
