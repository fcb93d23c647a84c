use chrono::{NaiveDate, NaiveTime};
use comfy_table::{Attribute, Cell, Color, Row, Table};
use rota_core::{Weekday, WeekdaySet};

use super::format_date;

#[derive(Debug, Clone)]
pub struct OccurrenceRow {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

pub fn display_occurrences(rows: &[OccurrenceRow], date_format: &str) {
    if rows.is_empty() {
        println!("No occurrences in range.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Weekday", "Time"]);

    for occurrence in rows {
        let weekday = Weekday::of(occurrence.date);
        let mut row = Row::new();
        row.add_cell(Cell::new(format_date(occurrence.date, date_format)).add_attribute(Attribute::Bold));

        let weekday_cell = Cell::new(weekday);
        row.add_cell(if WeekdaySet::WEEKENDS.contains(weekday) {
            weekday_cell.fg(Color::Cyan)
        } else {
            weekday_cell
        });

        row.add_cell(match occurrence.time {
            Some(time) => Cell::new(time.format("%H:%M")),
            None => Cell::new("-").fg(Color::DarkGrey),
        });
        table.add_row(row);
    }

    println!("{table}");
    println!("{} occurrence(s)", rows.len());
}
