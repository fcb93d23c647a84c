use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rota_core::{CoreError, Recurrence, Task};

use crate::cli::RuleArgs;
use crate::parser::{load_rule, parse_date, parse_time};

pub mod check;
pub mod list;
pub mod next;
pub mod stats;
pub mod validate;

/// Anchor date from `--anchor`, or `today` when omitted.
pub fn resolve_anchor(args: &RuleArgs, today: NaiveDate) -> Result<NaiveDate> {
    match &args.anchor {
        Some(anchor) => parse_date(anchor, today),
        None => Ok(today),
    }
}

/// Rule from `--rule` or `--every`.
pub fn resolve_rule(args: &RuleArgs, anchor: NaiveDate) -> Result<Recurrence> {
    match (&args.rule, args.every) {
        (Some(source), _) => load_rule(source),
        (None, Some(shortcut)) => Ok(shortcut.to_rule(anchor)),
        (None, None) => Err(anyhow!(CoreError::InvalidInput(
            "Provide a rule with --rule <PATH|JSON> or --every <SHORTCUT>".to_string()
        ))),
    }
}

/// Assembles the task the query runs against.
pub fn build_task(args: &RuleArgs, today: NaiveDate) -> Result<Task> {
    let anchor = resolve_anchor(args, today)?;
    let rule = resolve_rule(args, anchor)?;
    if !rule.is_well_formed() {
        tracing::warn!("rule is malformed and will never occur; run `rota validate` for details");
    }

    let mut task = Task::new("rota", anchor).with_recurrence(rule);
    if let Some(until) = &args.until {
        let end = parse_date(until, today)?;
        if end < anchor {
            tracing::warn!(%end, %anchor, "end date precedes the anchor; nothing will occur");
        }
        task = task.with_end(end);
    }
    if let Some(at) = &args.at {
        task = task.with_time(parse_time(at)?);
    }

    tracing::debug!(task = ?task, "built task from arguments");
    Ok(task)
}
