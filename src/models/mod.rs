//! Exam timetabling domain models.
//!
//! Provides the data types for describing a timetabling problem and its
//! solution.
//!
//! # Domain Mappings
//!
//! | u-timetable | Meaning |
//! |-------------|---------|
//! | TimeWindow | A session in which exams may be held |
//! | StudentRecord | A student and the subjects they sit |
//! | SubjectCatalog | Distinct subjects with stable indices |
//! | Schedule | Ordered exam slots (the timetable) |

mod calendar;
mod catalog;
mod schedule;
mod student;

pub use calendar::{HOUR_MS, TimeWindow, total_capacity_ms};
pub use catalog::SubjectCatalog;
pub use schedule::{ExamSlot, Schedule};
pub use student::StudentRecord;
