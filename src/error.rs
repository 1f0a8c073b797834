//! Error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced to callers of the optimizer.
///
/// Per-genome build failures are not listed here: they are absorbed as the
/// worst fitness and never leave the evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimetableError {
    #[error("invalid input: {}", join_messages(.0))]
    InvalidInput(Vec<ValidationError>),

    #[error("roster contains no subjects to schedule")]
    NoSchedulableSubjects,

    #[error("window capacity {capacity_ms} ms cannot hold {required_ms} ms of exams")]
    InfeasibleInput { capacity_ms: i64, required_ms: i64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no genome in the final population builds a valid schedule")]
    NoFeasibleSchedule,

    #[error("wire format error: {0}")]
    Wire(String),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for TimetableError {
    fn from(err: serde_json::Error) -> Self {
        TimetableError::Wire(err.to_string())
    }
}
