//! Configurable genetic operators for timetabling.
//!
//! Provides runtime-selectable crossover and mutation strategies
//! via [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::{GeneticOperators, CrossoverType, MutationType};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::PrefixOrder);
//! assert_eq!(ops.mutation_type, MutationType::SwapShift);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::{
    ExamGenome, prefix_order_crossover, shift_only_mutation, swap_shift_mutation,
};

/// Crossover strategy for timetable chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    /// Donor segment moved to the front, remainder in base order.
    PrefixOrder,
    /// Children are copies of their parents.
    Disabled,
}

/// Mutation strategy for timetable chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationType {
    /// Exchange two subjects, exchange two rests, shift one rest step.
    SwapShift,
    /// Shift one rest step only; subject order never changes.
    ShiftOnly,
}

/// Runtime-selectable genetic operators for timetabling GA.
///
/// # Example
///
/// ```
/// use u_timetable::ga::operators::{GeneticOperators, CrossoverType, MutationType};
///
/// let ops = GeneticOperators {
///     crossover_type: CrossoverType::PrefixOrder,
///     mutation_type: MutationType::ShiftOnly,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneticOperators {
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Mutation strategy.
    pub mutation_type: MutationType,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            crossover_type: CrossoverType::PrefixOrder,
            mutation_type: MutationType::SwapShift,
        }
    }
}

impl GeneticOperators {
    /// Performs crossover using the configured strategy.
    pub fn crossover<R: Rng>(
        &self,
        p1: &ExamGenome,
        p2: &ExamGenome,
        rng: &mut R,
    ) -> (ExamGenome, ExamGenome) {
        match self.crossover_type {
            CrossoverType::PrefixOrder => prefix_order_crossover(p1, p2, rng),
            CrossoverType::Disabled => (p1.clone(), p2.clone()),
        }
    }

    /// Performs mutation using the configured strategy.
    ///
    /// `step_ms` is the amount of rest moved between two slots.
    pub fn mutate<R: Rng>(&self, genome: &mut ExamGenome, step_ms: i64, rng: &mut R) {
        match self.mutation_type {
            MutationType::SwapShift => swap_shift_mutation(genome, step_ms, rng),
            MutationType::ShiftOnly => shift_only_mutation(genome, step_ms, rng),
        }
    }
}
