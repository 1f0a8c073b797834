//! Plain-text timetable table.

use comfy_table::{Cell, Table};

use crate::models::{HOUR_MS, Schedule};
use crate::wire::to_naive;

fn format_time(ms: i64) -> String {
    match to_naive(ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ms.to_string(),
    }
}

fn format_hours(hours: f64) -> String {
    if hours == f64::INFINITY {
        "inf".into()
    } else if hours == f64::NEG_INFINITY {
        "-inf".into()
    } else {
        format!("{hours:.6}")
    }
}

/// Renders a timetable as a text table.
///
/// Revision time is the wall-clock hours until the next exam (0 for the
/// last). The table is followed by the `Min Revision Time` line.
pub fn render_table(schedule: &Schedule, fitness_hours: f64) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Subject", "Revision Time", "Start Time", "End Time"]);

    for (i, slot) in schedule.slots.iter().enumerate() {
        let revision = schedule.revision_after(i).unwrap_or(0) as f64 / HOUR_MS as f64;
        table.add_row(vec![
            Cell::new(&slot.subject),
            Cell::new(revision),
            Cell::new(format_time(slot.start_ms)),
            Cell::new(format_time(slot.end_ms)),
        ]);
    }

    format!("{table}\nMin Revision Time = {}", format_hours(fitness_hours))
}
