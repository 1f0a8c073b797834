//! Timetable reporting.
//!
//! Human-readable output and quality metrics for a finished timetable.
//!
//! # Table
//!
//! [`render_table`] prints subject, revision time until the next exam,
//! start and end, followed by the run's minimum revision time.
//!
//! # KPI
//!
//! [`TimetableKpi`] summarizes revision gaps per student and overall.

mod kpi;
mod table;

pub use kpi::TimetableKpi;
pub use table::render_table;
