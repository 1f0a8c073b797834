//! Input validation for timetabling problems.
//!
//! Checks structural integrity of windows and rosters before any
//! population work begins. Detects:
//! - Empty or inverted windows
//! - Windows out of chronological order or overlapping
//! - Total window capacity beyond the millisecond range
//! - Duplicate student IDs
//! - Non-positive exam durations
//!
//! Capacity (whether the windows can hold every exam) is checked by the
//! optimizer once the subject catalog is known.

use std::collections::HashSet;

use crate::models::{StudentRecord, TimeWindow, total_capacity_ms};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No time windows were supplied.
    EmptyWindows,
    /// A window does not satisfy `start < end`.
    InvalidWindow,
    /// A window starts before the previous one ends.
    UnorderedWindows,
    /// Window capacity cannot be represented in `i64` milliseconds.
    CapacityOverflow,
    /// Two students share the same ID.
    DuplicateId,
    /// Exam duration is zero or negative.
    InvalidDuration,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a timetabling problem.
///
/// Checks:
/// 1. At least one window
/// 2. Every window has `start < end`
/// 3. Windows are chronological and non-overlapping
/// 4. Total capacity fits in `i64` milliseconds
/// 5. No duplicate student IDs
/// 6. Exam duration is positive
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    windows: &[TimeWindow],
    students: &[StudentRecord],
    exam_duration_ms: i64,
) -> ValidationResult {
    let mut errors = Vec::new();

    if windows.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyWindows,
            "No exam time windows supplied",
        ));
    }

    for (i, w) in windows.iter().enumerate() {
        if w.start_ms >= w.end_ms {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWindow,
                format!("Window {i} has start {} >= end {}", w.start_ms, w.end_ms),
            ));
        }
    }

    for (i, pair) in windows.windows(2).enumerate() {
        let message = if pair[0].overlaps(&pair[1]) {
            format!("Window {} overlaps window {i}", i + 1)
        } else if pair[1].start_ms < pair[0].end_ms {
            format!("Window {} starts before window {i}", i + 1)
        } else {
            continue;
        };
        errors.push(ValidationError::new(
            ValidationErrorKind::UnorderedWindows,
            message,
        ));
    }

    if total_capacity_ms(windows).is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::CapacityOverflow,
            "Total window capacity exceeds the i64 millisecond range",
        ));
    }

    let mut ids = HashSet::new();
    for s in students {
        if !ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate student ID: {}", s.id),
            ));
        }
    }

    if exam_duration_ms <= 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDuration,
            format!("Exam duration must be positive, got {exam_duration_ms} ms"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
