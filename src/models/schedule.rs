//! Exam timetable (solution) model.
//!
//! A schedule is the concrete calendar placement of every subject's exam,
//! in exam order. Schedules are derived from genomes and rebuilt whenever
//! needed; they are never edited in place.

use serde::{Deserialize, Serialize};

use super::{HOUR_MS, StudentRecord};

/// A complete exam timetable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Exam slots in chronological (exam) order.
    pub slots: Vec<ExamSlot>,
}

/// One subject's exam placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSlot {
    /// Subject name.
    pub subject: String,
    /// Exam start (ms).
    pub start_ms: i64,
    /// Exam end (ms).
    pub end_ms: i64,
}

impl ExamSlot {
    /// Creates a new exam slot.
    pub fn new(subject: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            subject: subject.into(),
            start_ms,
            end_ms,
        }
    }

    /// Exam duration (ms).
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an exam slot.
    pub fn add_slot(&mut self, slot: ExamSlot) {
        self.slots.push(slot);
    }

    /// Number of exams.
    pub fn exam_count(&self) -> usize {
        self.slots.len()
    }

    /// Start of the first exam.
    pub fn first_start_ms(&self) -> Option<i64> {
        self.slots.first().map(|s| s.start_ms)
    }

    /// End of the last exam.
    pub fn last_end_ms(&self) -> Option<i64> {
        self.slots.last().map(|s| s.end_ms)
    }

    /// Wall-clock time between slot `i` ending and slot `i + 1` starting (ms).
    ///
    /// Returns `None` for the last slot.
    pub fn revision_after(&self, i: usize) -> Option<i64> {
        let current = self.slots.get(i)?;
        let next = self.slots.get(i + 1)?;
        Some(next.start_ms - current.end_ms)
    }

    /// Gaps between consecutive exams of one student (ms).
    ///
    /// Exams the student does not sit are skipped. Fewer than two own
    /// exams yields an empty list.
    pub fn student_gaps(&self, student: &StudentRecord) -> Vec<i64> {
        let own = self.slots.iter().filter(|s| student.sits(&s.subject));
        own.clone()
            .zip(own.skip(1))
            .map(|(prev, next)| next.start_ms - prev.end_ms)
            .collect()
    }

    /// A student's smallest gap in hours; `+inf` with fewer than two exams.
    pub fn student_min_gap_hours(&self, student: &StudentRecord) -> f64 {
        self.student_gaps(student)
            .into_iter()
            .map(|gap| gap as f64 / HOUR_MS as f64)
            .fold(f64::INFINITY, f64::min)
    }
}
