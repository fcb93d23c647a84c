use crate::calendar::Weekday;
use thiserror::Error;

/// Violations detected when a recurrence rule is activated.
///
/// These never surface from the evaluator: a rule that fails validation is
/// simply treated as never occurring there.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Interval must be at least 1")]
    ZeroInterval,

    #[error("Modulus must be at least 2, got {k}")]
    InvalidModulus { k: u32 },

    #[error("Offset {offset} is out of range for modulus {k}")]
    OffsetOutOfRange { offset: u32, k: u32 },

    #[error("At least one {0} must be selected")]
    EmptySet(&'static str),

    #[error("Day of month must be between 1 and 31, got {0}")]
    DayOutOfRange(u32),

    #[error("Month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),

    #[error("{month:02}-{day:02} is not a calendar date")]
    InvalidFixedDate { month: u32, day: u32 },

    #[error("Weekday must be between 1 (Sunday) and 7 (Saturday), got {0}")]
    InvalidWeekday(u8),

    #[error("Ordinal week must be 1-5 or -1 (last), got {0}")]
    InvalidOrdinal(i8),

    #[error("A time is set for {0}, which is not a selected day")]
    OrphanTime(Weekday),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Malformed rule encoding")]
    Codec(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
