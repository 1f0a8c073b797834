//! Run-level entry point.
//!
//! [`TimetableOptimizer`] ties input validation, problem setup, the GA run
//! and result decoding together. Configuration errors are reported before
//! any population is built; per-genome failures stay inside the GA; a run
//! whose every final genome fails to build is reported as
//! [`TimetableError::NoFeasibleSchedule`].

use std::sync::atomic::AtomicBool;

use tracing::{info, warn};

use crate::error::TimetableError;
use crate::ga::operators::GeneticOperators;
use crate::ga::{ExamGenome, GaConfig, GaRunner, GenerationStats, TimetableProblem};
use crate::models::{HOUR_MS, Schedule, StudentRecord, TimeWindow};

/// Outcome of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Best timetable found.
    pub schedule: Schedule,
    /// Worst student's smallest revision gap (hours); `+inf` if no student
    /// sits two exams.
    pub fitness_hours: f64,
    /// Genome that produced `schedule`.
    pub genome: ExamGenome,
    /// Generations completed.
    pub generations: usize,
    /// Whether the run was cancelled before `max_generations`.
    pub cancelled: bool,
    /// Per-generation statistics in cost terms (negated hours).
    pub stats: Vec<GenerationStats>,
}

/// Exam timetable optimizer.
///
/// # Example
/// ```no_run
/// use u_timetable::optimizer::TimetableOptimizer;
/// use u_timetable::models::{HOUR_MS, StudentRecord, TimeWindow};
///
/// let windows = vec![
///     TimeWindow::new(9 * HOUR_MS, 12 * HOUR_MS),
///     TimeWindow::new(33 * HOUR_MS, 36 * HOUR_MS),
/// ];
/// let students = vec![
///     StudentRecord::new("A").with_subjects(["Chinese", "English"]),
///     StudentRecord::new("B").with_subjects(["Chinese", "Math"]),
/// ];
/// let result = TimetableOptimizer::new(windows, students).optimize().unwrap();
/// println!("min revision: {} h", result.fitness_hours);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableOptimizer {
    windows: Vec<TimeWindow>,
    students: Vec<StudentRecord>,
    exam_duration_ms: i64,
    revision_step_ms: i64,
    config: GaConfig,
    operators: GeneticOperators,
}

impl TimetableOptimizer {
    /// Creates an optimizer with one-hour exams and default GA settings.
    pub fn new(windows: Vec<TimeWindow>, students: Vec<StudentRecord>) -> Self {
        Self {
            windows,
            students,
            exam_duration_ms: HOUR_MS,
            revision_step_ms: HOUR_MS,
            config: GaConfig::default(),
            operators: GeneticOperators::default(),
        }
    }

    /// Sets the fixed exam duration.
    pub fn with_exam_duration_ms(mut self, duration_ms: i64) -> Self {
        self.exam_duration_ms = duration_ms;
        self
    }

    /// Sets the rest granularity used by initialization and mutation.
    pub fn with_revision_step_ms(mut self, step_ms: i64) -> Self {
        self.revision_step_ms = step_ms;
        self
    }

    /// Sets the GA hyperparameters.
    pub fn with_config(mut self, config: GaConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the crossover and mutation strategies.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    /// GA hyperparameters in effect.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the optimizer to completion.
    pub fn optimize(&self) -> Result<OptimizationResult, TimetableError> {
        self.optimize_with_cancel(&AtomicBool::new(false))
    }

    /// Runs the optimizer, stopping at the next generation boundary once
    /// `cancel` is set. The best genome of the last complete generation is
    /// returned.
    pub fn optimize_with_cancel(
        &self,
        cancel: &AtomicBool,
    ) -> Result<OptimizationResult, TimetableError> {
        self.config
            .validate()
            .map_err(TimetableError::InvalidConfig)?;

        let problem = TimetableProblem::new(
            self.windows.clone(),
            self.students.clone(),
            self.exam_duration_ms,
        )?
        .with_revision_step_ms(self.revision_step_ms)
        .with_operators(self.operators.clone());

        info!(
            subjects = problem.subject_count(),
            students = self.students.len(),
            windows = self.windows.len(),
            revision_budget_ms = problem.revision_budget_ms(),
            population = self.config.population_size,
            generations = self.config.max_generations,
            seed = self.config.seed,
            "starting timetable optimization"
        );

        let result = GaRunner::run_with_cancel(&problem, &self.config, cancel)
            .map_err(TimetableError::InvalidConfig)?;

        let fitness_hours = result.best.revision_hours();
        if fitness_hours == f64::NEG_INFINITY {
            warn!(
                generations = result.generations,
                "no genome in the final population builds a schedule"
            );
            return Err(TimetableError::NoFeasibleSchedule);
        }
        let schedule = problem
            .decode(&result.best)
            .map_err(|_| TimetableError::NoFeasibleSchedule)?;

        info!(
            fitness_hours,
            generations = result.generations,
            cancelled = result.cancelled,
            "timetable optimization finished"
        );

        Ok(OptimizationResult {
            schedule,
            fitness_hours,
            genome: result.best,
            generations: result.generations,
            cancelled: result.cancelled,
            stats: result.history,
        })
    }
}
