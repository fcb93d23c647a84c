use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use rota_core::Weekday;

use crate::cli::CheckCommand;
use crate::commands::build_task;
use crate::config::Config;
use crate::parser::parse_date;
use crate::views::format_date;

pub fn check_date(command: CheckCommand, config: &Config, today: NaiveDate) -> Result<()> {
    let task = build_task(&command.rule, today)?;
    let date = parse_date(&command.date, today)?;
    let shown = format_date(date, &config.date_format);

    if task.is_scheduled_on(date) {
        println!("{} {} is an occurrence ({})", "✓".green().bold(), shown, Weekday::of(date));
    } else {
        println!("{} {} is not an occurrence", "✗".red().bold(), shown);
        if let Some(next) = task.next_occurrence(date) {
            println!("  Next: {}", format_date(next, &config.date_format).cyan());
        }
    }

    Ok(())
}
