//! Shared fixtures for rota-core integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use rota_core::{matches, Recurrence};
use std::ops::Range;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Reference evaluation: tests every day of `range` against `matches`.
pub fn oracle(
    rule: &Recurrence,
    anchor: NaiveDate,
    end: Option<NaiveDate>,
    range: Range<NaiveDate>,
) -> Vec<NaiveDate> {
    if range.start >= range.end {
        return Vec::new();
    }
    range
        .start
        .iter_days()
        .take_while(|day| *day < range.end)
        .filter(|day| matches(rule, anchor, end, *day))
        .collect()
}

/// Fast evaluation collected into a vector.
pub fn collect(
    rule: &Recurrence,
    anchor: NaiveDate,
    end: Option<NaiveDate>,
    range: Range<NaiveDate>,
) -> Vec<NaiveDate> {
    rule.occurrences(anchor, end, range).collect()
}
