//! Timetable quality metrics (KPIs).
//!
//! Computes revision-time indicators from a completed timetable and its
//! roster.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Min Revision | Smallest gap any student gets (the GA fitness) |
//! | Mean Student Min | Average of each constrained student's smallest gap |
//! | Unconstrained | Students with fewer than two exams |
//! | Span | First exam start to last exam end |

use std::collections::HashMap;

use crate::models::{HOUR_MS, Schedule, StudentRecord};

/// Timetable performance indicators.
///
/// Gap values are in hours; `+inf` marks a student with no gap to measure.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Smallest revision gap over all students (hours).
    pub min_revision_hours: f64,
    /// Mean of the finite per-student minima (hours, 0 when none).
    pub mean_student_min_hours: f64,
    /// Per-student smallest gap (hours).
    pub min_gap_by_student: HashMap<String, f64>,
    /// Students sitting fewer than two exams.
    pub unconstrained_students: usize,
    /// First exam start to last exam end (ms).
    pub span_ms: i64,
}

impl TimetableKpi {
    /// Computes KPIs from a timetable and its roster.
    pub fn calculate(schedule: &Schedule, students: &[StudentRecord]) -> Self {
        let min_gap_by_student: HashMap<String, f64> = students
            .iter()
            .map(|s| (s.id.clone(), schedule.student_min_gap_hours(s)))
            .collect();

        let finite: Vec<f64> = min_gap_by_student
            .values()
            .copied()
            .filter(|g| g.is_finite())
            .collect();
        let mean_student_min_hours = if finite.is_empty() {
            0.0
        } else {
            finite.iter().sum::<f64>() / finite.len() as f64
        };

        let span_ms = match (schedule.first_start_ms(), schedule.last_end_ms()) {
            (Some(start), Some(end)) => end - start,
            _ => 0,
        };

        Self {
            min_revision_hours: min_gap_by_student
                .values()
                .copied()
                .fold(f64::INFINITY, f64::min),
            mean_student_min_hours,
            unconstrained_students: min_gap_by_student.len() - finite.len(),
            min_gap_by_student,
            span_ms,
        }
    }

    /// Span of the timetable in hours.
    pub fn span_hours(&self) -> f64 {
        self.span_ms as f64 / HOUR_MS as f64
    }
}
