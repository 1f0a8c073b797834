//! GA run configuration.

use serde::{Deserialize, Serialize};
use u_metaheur::ga::Selection;

/// Hyperparameters for a GA run.
///
/// Defaults reproduce the reference timetabling run: 300 individuals,
/// 50 generations, crossover rate 0.5, mutation rate 0.2, tournament
/// size 3, seed 128.
///
/// # Example
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_max_generations(10)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Number of generations to run.
    pub max_generations: usize,
    /// Probability that a consecutive pair is recombined.
    pub crossover_rate: f64,
    /// Probability that an individual is mutated.
    pub mutation_rate: f64,
    /// Individuals drawn per tournament.
    pub tournament_size: usize,
    /// Seed for the run's single random generator.
    pub seed: u64,
    /// Evaluate individuals on the rayon thread pool.
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 300,
            max_generations: 50,
            crossover_rate: 0.5,
            mutation_rate: 0.2,
            tournament_size: 3,
            seed: 128,
            parallel: true,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Parent selection policy: tournament of `tournament_size` draws.
    pub fn selection(&self) -> Selection {
        Selection::Tournament(self.tournament_size)
    }

    /// Checks that the configuration can drive a run.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size == 0 {
            return Err("population_size must be at least 1".into());
        }
        if self.tournament_size == 0 {
            return Err("tournament_size must be at least 1".into());
        }
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!("{name} must be within [0, 1], got {rate}"));
            }
        }
        Ok(())
    }
}
