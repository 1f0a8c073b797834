//! Subject catalog.
//!
//! Maps each distinct subject in a roster to a stable index. Genomes store
//! subject indices, so the catalog is built once per run and never changes.

use std::collections::HashMap;

use super::StudentRecord;

/// Index-stable list of distinct subjects.
///
/// Order is first appearance: students in roster order, then each
/// student's subjects in record order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectCatalog {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl SubjectCatalog {
    /// Builds the catalog from the union of all students' subjects.
    pub fn from_students(students: &[StudentRecord]) -> Self {
        let mut catalog = Self::default();
        for student in students {
            for subject in &student.subjects {
                catalog.insert(subject);
            }
        }
        catalog
    }

    fn insert(&mut self, subject: &str) {
        if !self.index.contains_key(subject) {
            self.index.insert(subject.to_string(), self.names.len());
            self.names.push(subject.to_string());
        }
    }

    /// Number of distinct subjects (`S`).
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the catalog has no subjects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of a subject, if catalogued.
    pub fn index_of(&self, subject: &str) -> Option<usize> {
        self.index.get(subject).copied()
    }

    /// Subject name at an index.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|s| s.as_str())
    }

    /// Subject names in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let students = vec![
            StudentRecord::new("A").with_subjects(["Chinese", "English"]),
            StudentRecord::new("B").with_subjects(["Chinese", "English", "Math"]),
            StudentRecord::new("C").with_subjects(["Math", "Chinese"]),
        ];
        let catalog = SubjectCatalog::from_students(&students);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.iter().collect::<Vec<_>>(), vec!["Chinese", "English", "Math"]);
        assert_eq!(catalog.index_of("Math"), Some(2));
        assert_eq!(catalog.name(1), Some("English"));
        assert_eq!(catalog.index_of("Art"), None);
        assert_eq!(catalog.name(3), None);
    }

    #[test]
    fn test_empty_roster() {
        let catalog = SubjectCatalog::from_students(&[StudentRecord::new("X")]);
        assert!(catalog.is_empty());
    }
}
