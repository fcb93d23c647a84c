use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use rota_core::CoreError;

use crate::cli::ValidateCommand;
use crate::commands::{resolve_anchor, resolve_rule};

pub fn validate_rule(command: ValidateCommand, today: NaiveDate) -> Result<()> {
    let anchor = resolve_anchor(&command.rule, today)?;
    let rule = resolve_rule(&command.rule, anchor)?;
    rule.validate().map_err(CoreError::from)?;

    println!("{} {}", "✓ Valid:".green().bold(), rule.describe(anchor));
    println!("{}", rule.to_json()?);
    Ok(())
}
