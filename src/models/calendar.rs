//! Exam time windows.
//!
//! A window is a contiguous block of calendar time in which exams may be
//! held (e.g. one morning session). A timetable is built by walking an
//! ordered list of windows.
//!
//! # Time Model
//! All times are in milliseconds relative to a scheduling epoch.
//! The consumer defines what epoch means; the wire adapter uses the
//! Unix epoch in naive (zone-less) local time.
//!
//! # Ordering
//! Window lists are taken in insertion order and are never re-sorted.
//! Callers supply them chronologically; [`crate::validation`] reports
//! lists that are not.

use serde::{Deserialize, Serialize};

/// Milliseconds in one hour.
pub const HOUR_MS: i64 = 3_600_000;

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (ms, inclusive).
    pub start_ms: i64,
    /// Interval end (ms, exclusive).
    pub end_ms: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Duration of this window (ms), saturating at the `i64` range.
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Whether `[start_ms, end_ms)` lies entirely inside this window.
    #[inline]
    pub fn encloses(&self, start_ms: i64, end_ms: i64) -> bool {
        start_ms >= self.start_ms && end_ms <= self.end_ms
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }
}

/// Total capacity of a window list (ms), or `None` if it overflows `i64`.
///
/// Windows with `end <= start` contribute nothing.
pub fn total_capacity_ms(windows: &[TimeWindow]) -> Option<i64> {
    windows.iter().try_fold(0i64, |total, w| {
        total.checked_add(w.end_ms.checked_sub(w.start_ms)?.max(0))
    })
}
