//! Student roster model.
//!
//! A student record lists the subjects a student sits. Rosters drive both
//! the subject catalog and the fitness of a timetable: only gaps between a
//! student's own exams count toward their revision time.

use serde::{Deserialize, Serialize};

/// A student and the subjects they sit.
///
/// Subjects keep first-insertion order; duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Student identifier.
    pub id: String,
    /// Subjects this student is examined in.
    pub subjects: Vec<String>,
}

impl StudentRecord {
    /// Creates a student with no subjects.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subjects: Vec::new(),
        }
    }

    /// Adds a subject (ignored if already present).
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        if !self.sits(&subject) {
            self.subjects.push(subject);
        }
        self
    }

    /// Adds several subjects.
    pub fn with_subjects<I, S>(self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        subjects
            .into_iter()
            .fold(self, |record, subject| record.with_subject(subject))
    }

    /// Whether this student sits the given subject.
    #[inline]
    pub fn sits(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let s = StudentRecord::new("A").with_subjects(["Chinese", "English"]);
        assert_eq!(s.id, "A");
        assert_eq!(s.subjects, vec!["Chinese", "English"]);
        assert!(s.sits("English"));
        assert!(!s.sits("Math"));
    }

    #[test]
    fn test_duplicate_subject_collapsed() {
        let s = StudentRecord::new("B")
            .with_subject("Math")
            .with_subject("Math")
            .with_subject("Art");
        assert_eq!(s.subjects, vec!["Math", "Art"]);
    }
}
