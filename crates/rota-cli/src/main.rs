use clap::Parser;
use owo_colors::{OwoColorize, Style};
use rota_core::error::{CoreError, RuleError};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod views;

fn main() {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    let config = config::Config::load();
    if let Err(e) = run(cli.command, &config) {
        handle_error(e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: cli::Commands, config: &config::Config) -> anyhow::Result<()> {
    let today = config.today()?;
    tracing::debug!(%today, timezone = %config.timezone, "resolved today");

    match command {
        cli::Commands::Check(command) => commands::check::check_date(command, config, today),
        cli::Commands::List(command) => commands::list::list_occurrences(command, config, today),
        cli::Commands::Next(command) => commands::next::next_occurrences(command, config, today),
        cli::Commands::Stats(command) => commands::stats::completion_stats(command, config, today),
        cli::Commands::Validate(command) => commands::validate::validate_rule(command, today),
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.downcast_ref::<CoreError>() {
        Some(CoreError::InvalidRule(rule_error)) => {
            eprintln!("{} Invalid rule: {}", "Error:".style(error_style), rule_error.yellow());
            if let Some(hint) = rule_hint(rule_error) {
                eprintln!("  {}", hint);
            }
        }
        Some(CoreError::Codec(e)) => {
            eprintln!("{} Could not decode rule: {}", "Error:".style(error_style), e);
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        None => eprintln!("{} {:#}", "Error:".style(error_style), err),
    }
}

fn rule_hint(error: &RuleError) -> Option<&'static str> {
    match error {
        RuleError::ZeroInterval => Some("Use an interval of 1 or more, e.g. \"interval\": 2 for every other period."),
        RuleError::InvalidModulus { .. } | RuleError::OffsetOutOfRange { .. } => {
            Some("Modulo rules need k >= 2 and 0 <= offset < k.")
        }
        RuleError::EmptySet(_) => Some("An empty selection never occurs; pick at least one value."),
        RuleError::OrphanTime(_) => Some("Add the weekday to \"days\" or drop its entry from \"times\"."),
        _ => None,
    }
}
