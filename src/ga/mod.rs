//! GA-based timetable optimization.
//!
//! Implements a timetabling-specific order/rest encoding on top of
//! `u-metaheur`'s `Individual`/`GaProblem` traits and tournament
//! selection, driven by a plain generational runner.
//!
//! # Encoding
//!
//! - **order**: permutation of subject indices, the exam sequence.
//! - **rest**: revision time after each exam; the last is always zero.
//!
//! # Submodules
//!
//! - [`operators`]: Runtime-selectable crossover and mutation strategies
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - Miller & Goldberg (1995), "Genetic Algorithms, Tournament Selection, and the Effects of Noise"

mod chromosome;
mod config;
pub mod operators;
mod problem;
mod runner;

pub use chromosome::{
    ExamGenome, prefix_order_crossover, shift_only_mutation, swap_shift_mutation,
};
pub use config::GaConfig;
pub use problem::{BuildError, TimetableProblem, build_schedule, min_revision_hours};
pub use runner::{GaResult, GaRunner, GenerationStats};
