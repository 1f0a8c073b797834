//! Exam timetabling for the U-Engine ecosystem.
//!
//! Searches for the exam order and revision gaps that maximize the
//! *worst-case* minimum revision time any student gets between two of
//! their exams, given fixed exam windows, a fixed exam duration and a
//! student roster.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeWindow`, `StudentRecord`,
//!   `SubjectCatalog`, `Schedule`, `ExamSlot`
//! - **`ga`**: Order/rest encoding, schedule builder, fitness, operators
//!   and the generational GA engine
//! - **`optimizer`**: Run-level entry point with fail-fast setup checks
//! - **`validation`**: Input integrity checks (windows, duplicate IDs, durations)
//! - **`report`**: Text table and revision-time KPIs
//! - **`wire`**: JSON request/response adapter
//!
//! # Example
//!
//! ```no_run
//! use u_timetable::models::{HOUR_MS, StudentRecord, TimeWindow};
//! use u_timetable::optimizer::TimetableOptimizer;
//! use u_timetable::report::render_table;
//!
//! let windows = vec![TimeWindow::new(9 * HOUR_MS, 12 * HOUR_MS)];
//! let students = vec![StudentRecord::new("A").with_subjects(["Art", "Math"])];
//! let result = TimetableOptimizer::new(windows, students).optimize()?;
//! println!("{}", render_table(&result.schedule, result.fitness_hours));
//! # Ok::<(), u_timetable::TimetableError>(())
//! ```
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

pub mod error;
pub mod ga;
pub mod models;
pub mod optimizer;
pub mod report;
pub mod validation;
pub mod wire;

pub use error::TimetableError;
