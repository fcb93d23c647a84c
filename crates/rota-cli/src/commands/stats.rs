use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use rota_core::CompletionStats;

use crate::cli::StatsCommand;
use crate::commands::build_task;
use crate::config::Config;
use crate::parser::{parse_date, parse_date_list};
use crate::views::format_date;

pub fn completion_stats(command: StatsCommand, config: &Config, today: NaiveDate) -> Result<()> {
    let task = build_task(&command.rule, today)?;
    let from = parse_date(&command.from, today)?;
    let to = parse_date(&command.to, today)?;
    let done = parse_date_list(&command.done, today)?;

    let stats = CompletionStats::for_task(&task, from..to, &done);

    if command.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "{} {} to {}",
        "Completion".bold(),
        format_date(from, &config.date_format),
        format_date(to, &config.date_format)
    );
    println!("  Scheduled:       {}", stats.scheduled);
    println!(
        "  Completed:       {} ({:.0}%)",
        stats.completed,
        stats.completion_rate * 100.0
    );
    println!("  Current streak:  {}", stats.current_streak.green());
    println!("  Longest streak:  {}", stats.longest_streak);

    let ignored = done
        .iter()
        .filter(|date| !(from..to).contains(*date) || !task.is_scheduled_on(**date))
        .count();
    if ignored > 0 {
        println!("  {}", format!("{ignored} completion(s) outside the schedule were ignored").dimmed());
    }

    Ok(())
}
