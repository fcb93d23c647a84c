use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use rota_core::Weekday;
use std::iter::successors;

use crate::cli::NextCommand;
use crate::commands::build_task;
use crate::config::Config;
use crate::parser::parse_date;
use crate::views::{format_date, relative_day};

pub fn next_occurrences(command: NextCommand, config: &Config, today: NaiveDate) -> Result<()> {
    let task = build_task(&command.rule, today)?;
    let after = match &command.after {
        Some(after) => parse_date(after, today)?,
        // Include today itself
        None => today.pred_opt().unwrap_or(today),
    };
    let count = command.count.unwrap_or(config.preview_count);

    let upcoming: Vec<NaiveDate> = successors(task.next_occurrence(after), |date| task.next_occurrence(*date))
        .take(count)
        .collect();

    if upcoming.is_empty() {
        println!("No upcoming occurrences.");
        return Ok(());
    }

    for date in upcoming {
        println!(
            "{}  {:<9}  {}",
            format_date(date, &config.date_format),
            Weekday::of(date).to_string(),
            relative_day(date, today).dimmed()
        );
    }

    Ok(())
}
