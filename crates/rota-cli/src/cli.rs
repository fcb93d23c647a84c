use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rota_core::{Recurrence, Weekday, WeekdaySet};

/// Query recurrence rules: check dates, list and preview occurrences, and score streaks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log evaluation details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check whether a date is an occurrence
    Check(CheckCommand),
    /// List occurrences in a date range
    List(ListCommand),
    /// Preview the next occurrences
    Next(NextCommand),
    /// Completion statistics for a range
    Stats(StatsCommand),
    /// Validate a rule and print its canonical encoding
    Validate(ValidateCommand),
}

/// How the rule and its anchor are supplied. Shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct RuleArgs {
    /// Recurrence rule: path to a JSON file, or inline JSON
    #[arg(long, conflicts_with = "every")]
    pub rule: Option<String>,
    /// Shortcut rule derived from the anchor date
    #[arg(long, value_enum)]
    pub every: Option<RecurrenceShortcut>,
    /// Anchor (task start) date; defaults to today
    #[arg(long)]
    pub anchor: Option<String>,
    /// Last date the rule may occur on (inclusive)
    #[arg(long)]
    pub until: Option<String>,
    /// Default time of day (e.g. '9:00 AM', '14:30')
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckCommand {
    /// The date to check
    pub date: String,
    #[command(flatten)]
    pub rule: RuleArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// First date of the range (inclusive); defaults to the anchor
    #[arg(long)]
    pub from: Option<String>,
    /// End of the range (exclusive); defaults to `from` plus the configured lookahead
    #[arg(long)]
    pub to: Option<String>,
    #[command(flatten)]
    pub rule: RuleArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct NextCommand {
    /// Show occurrences strictly after this date; defaults to yesterday
    #[arg(long)]
    pub after: Option<String>,
    /// How many occurrences to show; defaults to the configured preview count
    #[arg(short = 'n', long)]
    pub count: Option<usize>,
    #[command(flatten)]
    pub rule: RuleArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct StatsCommand {
    /// First date of the range (inclusive)
    #[arg(long)]
    pub from: String,
    /// End of the range (exclusive)
    #[arg(long)]
    pub to: String,
    /// Completion dates, comma-separated (e.g. '2024-01-01,2024-01-08')
    #[arg(long, default_value = "")]
    pub done: String,
    /// Print the statistics as JSON
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub rule: RuleArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub rule: RuleArgs,
}

/// Human-friendly recurrence shortcuts
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecurrenceShortcut {
    Daily,
    Weekdays,
    Weekends,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl RecurrenceShortcut {
    /// Builds the rule, taking weekday and day of month from `anchor` where needed.
    pub fn to_rule(self, anchor: NaiveDate) -> Recurrence {
        use chrono::Datelike;

        match self {
            RecurrenceShortcut::Daily => Recurrence::Daily,
            RecurrenceShortcut::Weekdays => Recurrence::selected_days(WeekdaySet::WEEKDAYS),
            RecurrenceShortcut::Weekends => Recurrence::selected_days(WeekdaySet::WEEKENDS),
            RecurrenceShortcut::Weekly => Recurrence::selected_days(WeekdaySet::single(Weekday::of(anchor))),
            RecurrenceShortcut::Biweekly => Recurrence::every_n_weeks(2),
            RecurrenceShortcut::Monthly => Recurrence::monthly_on_days([anchor.day()]),
            RecurrenceShortcut::Yearly => Recurrence::every_n_years(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rule_and_every_conflict() {
        let parsed = Cli::try_parse_from(["rota", "validate", "--rule", "{}", "--every", "daily"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_shortcuts_follow_anchor() {
        let anchor = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            RecurrenceShortcut::Monthly.to_rule(anchor),
            Recurrence::monthly_on_days([31])
        );
        assert_eq!(
            RecurrenceShortcut::Weekly.to_rule(anchor),
            Recurrence::selected_days(WeekdaySet::single(Weekday::Wednesday))
        );
    }
}
