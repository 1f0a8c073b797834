//! Generational GA engine.
//!
//! Drives any `u_metaheur::ga::GaProblem` with plain generational
//! replacement. Fitness follows the `u-metaheur` convention: lower is
//! better, `Fitness::worst()` marks an individual that could not be
//! evaluated.
//!
//! # Algorithm
//!
//! 1. Create `population_size` random individuals and evaluate them.
//! 2. For each generation:
//!    - select `population_size` parents by tournament (with replacement)
//!    - recombine consecutive pairs with probability `crossover_rate`
//!    - mutate each offspring with probability `mutation_rate`
//!    - re-evaluate only offspring touched by crossover or mutation
//!    - replace the population wholesale (no elitism)
//! 3. Return the fittest individual of the final population.
//!
//! All random draws come from one seeded generator in a fixed order
//! (initialization, then per generation: selection, crossover, mutation),
//! so a seed reproduces the run exactly. Evaluation draws no randomness
//! and may run on the rayon pool without affecting results.
//!
//! Cancellation is observed only between generations.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use u_metaheur::ga::{Fitness, GaProblem, Individual};

use super::GaConfig;

/// Fitness summary of one population, in the problem's cost terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number (0 = initial population).
    pub generation: usize,
    /// Individuals evaluated to produce this population.
    pub evaluated: usize,
    /// Lowest (best) cost; may be `-inf`.
    pub best: f64,
    /// Highest (worst) cost; may be `+inf`.
    pub worst: f64,
    /// Mean over finite costs (0 when none are finite).
    pub mean: f64,
    /// Standard deviation over finite costs.
    pub std_dev: f64,
    /// Individuals at `Fitness::worst()`.
    pub infeasible: usize,
    /// Individuals at `-inf`.
    pub unbounded: usize,
}

impl GenerationStats {
    fn collect<I: Individual>(generation: usize, evaluated: usize, population: &[I]) -> Self {
        let costs: Vec<f64> = population.iter().map(|ind| ind.fitness().to_f64()).collect();
        let finite: Vec<f64> = costs.iter().copied().filter(|c| c.is_finite()).collect();
        let worst_cost = I::Fitness::worst().to_f64();

        let (mean, std_dev) = if finite.is_empty() {
            (0.0, 0.0)
        } else {
            let n = finite.len() as f64;
            let mean = finite.iter().sum::<f64>() / n;
            let variance = finite.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
            (mean, variance.sqrt())
        };

        Self {
            generation,
            evaluated,
            best: costs.iter().copied().fold(f64::INFINITY, f64::min),
            worst: costs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean,
            std_dev,
            infeasible: costs.iter().filter(|&&c| c == worst_cost).count(),
            unbounded: costs.iter().filter(|&&c| c == f64::NEG_INFINITY).count(),
        }
    }
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// Fittest individual of the final population.
    pub best: I,
    /// Fitness of `best`.
    pub best_fitness: I::Fitness,
    /// Generations completed.
    pub generations: usize,
    /// Whether the run stopped early on request.
    pub cancelled: bool,
    /// Statistics for the initial population and every generation.
    pub history: Vec<GenerationStats>,
}

/// Runs the generational GA.
///
/// # Example
/// ```no_run
/// use u_timetable::ga::{GaConfig, GaRunner, TimetableProblem};
/// use u_timetable::models::{HOUR_MS, StudentRecord, TimeWindow};
///
/// let windows = vec![TimeWindow::new(9 * HOUR_MS, 12 * HOUR_MS)];
/// let students = vec![StudentRecord::new("A").with_subjects(["Art", "Math"])];
/// let problem = TimetableProblem::new(windows, students, HOUR_MS).unwrap();
/// let result = GaRunner::run(&problem, &GaConfig::default()).unwrap();
/// println!("{}", result.best.revision_hours());
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs to completion.
    pub fn run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, String> {
        Self::run_with_cancel(problem, config, &AtomicBool::new(false))
    }

    /// Runs until `max_generations` or until `cancel` is set.
    ///
    /// The flag is read at the start of each generation; a generation in
    /// progress always completes.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: &AtomicBool,
    ) -> Result<GaResult<P::Individual>, String> {
        config.validate()?;
        let selection = config.selection();
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        let pending = vec![true; population.len()];
        let evaluated = evaluate_pending(problem, &mut population, &pending, config.parallel);
        let mut history = vec![GenerationStats::collect(0, evaluated, &population)];

        let mut generations = 0;
        let mut cancelled = false;
        for gen in 1..=config.max_generations {
            if cancel.load(Ordering::SeqCst) {
                warn!(generation = gen, "GA run cancelled");
                cancelled = true;
                break;
            }

            let mut offspring: Vec<P::Individual> = (0..config.population_size)
                .map(|_| population[selection.select(&population, &mut rng)].clone())
                .collect();
            let mut pending = vec![false; offspring.len()];

            for (pair, touched) in offspring
                .chunks_exact_mut(2)
                .zip(pending.chunks_exact_mut(2))
            {
                if rng.random::<f64>() < config.crossover_rate {
                    let children = problem.crossover(&pair[0], &pair[1], &mut rng);
                    for (slot, child) in pair.iter_mut().zip(children) {
                        *slot = child;
                    }
                    touched.fill(true);
                }
            }

            for (mutant, touched) in offspring.iter_mut().zip(pending.iter_mut()) {
                if rng.random::<f64>() < config.mutation_rate {
                    problem.mutate(mutant, &mut rng);
                    *touched = true;
                }
            }

            let evaluated = evaluate_pending(problem, &mut offspring, &pending, config.parallel);
            population = offspring;
            generations = gen;

            let stats = GenerationStats::collect(gen, evaluated, &population);
            debug!(
                generation = gen,
                evaluated = stats.evaluated,
                best = stats.best,
                worst = stats.worst,
                mean = stats.mean,
                std_dev = stats.std_dev,
                "generation complete"
            );
            if let Some(idx) = best_index(&population) {
                problem.on_generation(gen, population[idx].fitness());
            }
            history.push(stats);
        }

        let idx = best_index(&population).ok_or("population is empty")?;
        let best = population.swap_remove(idx);

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            cancelled,
            history,
        })
    }
}

/// Index of the lowest-cost individual (first on ties).
fn best_index<I: Individual>(population: &[I]) -> Option<usize> {
    population
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.fitness()
                .partial_cmp(&b.fitness())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}

/// Evaluates the individuals flagged in `pending`; returns how many.
///
/// Each result is written back only to the individual it was computed for.
fn evaluate_pending<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    pending: &[bool],
    parallel: bool,
) -> usize {
    let eval = |(ind, _): (&mut P::Individual, &bool)| {
        let fitness = problem.evaluate(ind);
        ind.set_fitness(fitness);
    };
    if parallel {
        population
            .par_iter_mut()
            .zip(pending.par_iter())
            .filter(|(_, flag)| **flag)
            .for_each(eval);
    } else {
        population
            .iter_mut()
            .zip(pending.iter())
            .filter(|(_, flag)| **flag)
            .for_each(eval);
    }
    pending.iter().filter(|&&flag| flag).count()
}
