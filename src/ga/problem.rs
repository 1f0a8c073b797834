//! Timetabling GA problem definition.
//!
//! Implements [`GaProblem`] for exam timetabling. Bridges domain models
//! (windows, roster) to the generic GA engine: decodes genomes into
//! calendar schedules and scores them by the worst student's smallest
//! revision gap.

use rand::Rng;
use thiserror::Error;
use u_metaheur::ga::GaProblem;

use super::chromosome::ExamGenome;
use super::operators::GeneticOperators;
use crate::error::TimetableError;
use crate::models::{
    ExamSlot, HOUR_MS, Schedule, StudentRecord, SubjectCatalog, TimeWindow, total_capacity_ms,
};
use crate::validation::validate_input;

/// Why a genome could not be placed on the calendar.
///
/// Internal to evaluation: the evaluator turns it into the worst fitness.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("windows exhausted while placing exam {position}")]
    WindowsExhausted { position: usize },

    #[error("genome references unknown subject index {index}")]
    UnknownSubject { index: usize },

    #[error("genome has {order} order entries but {rest} rest entries")]
    Malformed { order: usize, rest: usize },
}

/// Places a genome's exams on the calendar.
///
/// # Algorithm
/// 1. The first exam starts at the first window's start.
/// 2. Each later exam starts at the previous end plus the previous rest.
/// 3. If an exam would end past the current window, the rest that ran
///    past the window's end becomes a carry. Following windows absorb the
///    carry one by one; the first window with room for `carry + exam`
///    hosts the exam at `window.start + carry`.
/// 4. Running out of windows fails the build. So does a time past the
///    representable range, since no later window can host it.
///
/// The window cursor only moves forward.
pub fn build_schedule(
    genome: &ExamGenome,
    catalog: &SubjectCatalog,
    windows: &[TimeWindow],
    exam_duration_ms: i64,
) -> Result<Schedule, BuildError> {
    if genome.order.len() != genome.rest_ms.len() {
        return Err(BuildError::Malformed {
            order: genome.order.len(),
            rest: genome.rest_ms.len(),
        });
    }

    let mut schedule = Schedule::new();
    let mut cursor = 0;
    let mut prev_end: Option<i64> = None;

    for (position, &subject) in genome.order.iter().enumerate() {
        let window = windows
            .get(cursor)
            .ok_or(BuildError::WindowsExhausted { position })?;

        let mut start = match prev_end {
            None => window.start_ms,
            Some(end) => end
                .checked_add(genome.rest_ms[position - 1])
                .ok_or(BuildError::WindowsExhausted { position })?,
        };
        let mut end = start
            .checked_add(exam_duration_ms)
            .ok_or(BuildError::WindowsExhausted { position })?;

        if end > window.end_ms {
            // An exam straddling the boundary carries nothing.
            let mut carry = start.saturating_sub(window.end_ms).max(0);
            loop {
                cursor += 1;
                let next = windows
                    .get(cursor)
                    .ok_or(BuildError::WindowsExhausted { position })?;
                if carry.saturating_add(exam_duration_ms) <= next.duration_ms() {
                    start = next.start_ms + carry;
                    end = start + exam_duration_ms;
                    break;
                }
                carry = (carry - next.duration_ms()).max(0);
            }
        }

        let name = catalog
            .name(subject)
            .ok_or(BuildError::UnknownSubject { index: subject })?;
        schedule.add_slot(ExamSlot::new(name, start, end));
        prev_end = Some(end);
    }

    Ok(schedule)
}

/// Worst-case minimum revision gap in hours, over all students.
///
/// Students with fewer than two exams impose no constraint (`+inf`).
pub fn min_revision_hours(schedule: &Schedule, students: &[StudentRecord]) -> f64 {
    students
        .iter()
        .map(|s| schedule.student_min_gap_hours(s))
        .fold(f64::INFINITY, f64::min)
}

/// GA problem definition for exam timetabling.
///
/// Built once per run; catalog, windows, roster and revision budget are
/// immutable afterwards.
///
/// # Example
/// ```
/// use u_timetable::ga::TimetableProblem;
/// use u_timetable::models::{HOUR_MS, StudentRecord, TimeWindow};
///
/// let windows = vec![TimeWindow::new(9 * HOUR_MS, 12 * HOUR_MS)];
/// let students = vec![StudentRecord::new("A").with_subjects(["Art", "Math"])];
/// let problem = TimetableProblem::new(windows, students, HOUR_MS).unwrap();
/// assert_eq!(problem.subject_count(), 2);
/// assert_eq!(problem.revision_budget_ms(), HOUR_MS);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    catalog: SubjectCatalog,
    windows: Vec<TimeWindow>,
    students: Vec<StudentRecord>,
    exam_duration_ms: i64,
    revision_budget_ms: i64,
    revision_step_ms: i64,
    operators: GeneticOperators,
}

impl TimetableProblem {
    /// Creates a problem from windows and a roster.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidInput`] if validation fails
    /// - [`TimetableError::NoSchedulableSubjects`] if the roster names no subject
    /// - [`TimetableError::InfeasibleInput`] if the windows cannot hold one
    ///   exam per subject
    pub fn new(
        windows: Vec<TimeWindow>,
        students: Vec<StudentRecord>,
        exam_duration_ms: i64,
    ) -> Result<Self, TimetableError> {
        validate_input(&windows, &students, exam_duration_ms)
            .map_err(TimetableError::InvalidInput)?;

        let catalog = SubjectCatalog::from_students(&students);
        if catalog.is_empty() {
            return Err(TimetableError::NoSchedulableSubjects);
        }

        // Validation rejects window lists whose capacity overflows.
        let capacity_ms = total_capacity_ms(&windows).unwrap_or(i64::MAX);
        let required_ms = match (catalog.len() as i64).checked_mul(exam_duration_ms) {
            Some(required_ms) if required_ms <= capacity_ms => required_ms,
            required_ms => {
                return Err(TimetableError::InfeasibleInput {
                    capacity_ms,
                    required_ms: required_ms.unwrap_or(i64::MAX),
                })
            }
        };

        Ok(Self {
            catalog,
            windows,
            students,
            exam_duration_ms,
            revision_budget_ms: capacity_ms - required_ms,
            revision_step_ms: HOUR_MS,
            operators: GeneticOperators::default(),
        })
    }

    /// Sets the granularity of random rest draws and mutation shifts
    /// (default one hour, minimum 1 ms).
    pub fn with_revision_step_ms(mut self, step_ms: i64) -> Self {
        self.revision_step_ms = step_ms.max(1);
        self
    }

    /// Sets the crossover and mutation strategies.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    /// Subject catalog for this run.
    pub fn catalog(&self) -> &SubjectCatalog {
        &self.catalog
    }

    /// Number of distinct subjects (`S`).
    pub fn subject_count(&self) -> usize {
        self.catalog.len()
    }

    /// Time windows in caller order.
    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    /// Student roster.
    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    /// Fixed exam duration (ms).
    pub fn exam_duration_ms(&self) -> i64 {
        self.exam_duration_ms
    }

    /// Total revision time available: capacity minus exam time (ms).
    pub fn revision_budget_ms(&self) -> i64 {
        self.revision_budget_ms
    }

    /// Decodes a genome into a schedule.
    pub fn decode(&self, genome: &ExamGenome) -> Result<Schedule, BuildError> {
        build_schedule(genome, &self.catalog, &self.windows, self.exam_duration_ms)
    }
}

impl GaProblem for TimetableProblem {
    type Individual = ExamGenome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> ExamGenome {
        ExamGenome::random(
            self.catalog.len(),
            self.revision_budget_ms,
            self.revision_step_ms,
            rng,
        )
    }

    /// Negated worst-student gap: `+inf` for unbuildable genomes, `-inf`
    /// when no student sits two exams.
    fn evaluate(&self, individual: &ExamGenome) -> f64 {
        match self.decode(individual) {
            Ok(schedule) => -min_revision_hours(&schedule, &self.students),
            Err(_) => f64::INFINITY,
        }
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &ExamGenome,
        parent2: &ExamGenome,
        rng: &mut R,
    ) -> Vec<ExamGenome> {
        let (c1, c2) = self.operators.crossover(parent1, parent2, rng);
        vec![c1, c2]
    }

    fn mutate<R: Rng>(&self, individual: &mut ExamGenome, rng: &mut R) {
        self.operators.mutate(individual, self.revision_step_ms, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{GaConfig, GaRunner};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const DAY_MS: i64 = 24 * HOUR_MS;

    /// Three 09:00-12:00 sessions on days 0, 1 and 3.
    fn three_windows() -> Vec<TimeWindow> {
        [0, 1, 3]
            .iter()
            .map(|d| TimeWindow::new(d * DAY_MS + 9 * HOUR_MS, d * DAY_MS + 12 * HOUR_MS))
            .collect()
    }

    fn reference_students() -> Vec<StudentRecord> {
        vec![
            StudentRecord::new("A").with_subjects(["Chinese", "English"]),
            StudentRecord::new("B").with_subjects(["Chinese", "English", "Math"]),
            StudentRecord::new("C").with_subjects(["Chinese", "English", "Math"]),
        ]
    }

    fn reference_problem() -> TimetableProblem {
        TimetableProblem::new(three_windows(), reference_students(), HOUR_MS).unwrap()
    }

    #[test]
    fn test_budget() {
        let p = reference_problem();
        assert_eq!(p.subject_count(), 3);
        assert_eq!(p.revision_budget_ms(), 6 * HOUR_MS);
    }

    #[test]
    fn test_infeasible_input() {
        let windows = vec![TimeWindow::new(0, 2 * HOUR_MS)];
        let err = TimetableProblem::new(windows, reference_students(), HOUR_MS).unwrap_err();
        assert_eq!(
            err,
            TimetableError::InfeasibleInput {
                capacity_ms: 2 * HOUR_MS,
                required_ms: 3 * HOUR_MS,
            }
        );
    }

    #[test]
    fn test_no_subjects() {
        let students = vec![StudentRecord::new("A"), StudentRecord::new("B")];
        let err = TimetableProblem::new(three_windows(), students, HOUR_MS).unwrap_err();
        assert_eq!(err, TimetableError::NoSchedulableSubjects);
    }

    #[test]
    fn test_invalid_input_reported_first() {
        let err = TimetableProblem::new(vec![], vec![], HOUR_MS).unwrap_err();
        assert!(matches!(err, TimetableError::InvalidInput(_)));
    }

    #[test]
    fn test_build_back_to_back() {
        let windows = vec![TimeWindow::new(9 * HOUR_MS, 12 * HOUR_MS)];
        let students = vec![StudentRecord::new("A").with_subjects(["X", "Y", "Z"])];
        let catalog = SubjectCatalog::from_students(&students);
        let g = ExamGenome::new(vec![2, 0, 1], vec![0, 0, 0]);

        let s = build_schedule(&g, &catalog, &windows, HOUR_MS).unwrap();
        let got: Vec<(&str, i64, i64)> = s
            .slots
            .iter()
            .map(|x| (x.subject.as_str(), x.start_ms / HOUR_MS, x.end_ms / HOUR_MS))
            .collect();
        assert_eq!(got, vec![("Z", 9, 10), ("X", 10, 11), ("Y", 11, 12)]);
    }

    #[test]
    fn test_build_spills_rest_into_next_window() {
        let p = reference_problem();
        // 4h rest after the first exam: 2h past day 0's close, absorbed by day 1
        let g = ExamGenome::new(vec![0, 1, 2], vec![4 * HOUR_MS, 2 * HOUR_MS, 0]);
        let s = p.decode(&g).unwrap();

        assert_eq!(s.slots[0].start_ms, 9 * HOUR_MS);
        assert_eq!(s.slots[1].start_ms, DAY_MS + 11 * HOUR_MS);
        assert_eq!(s.slots[2].start_ms, 3 * DAY_MS + 11 * HOUR_MS);
        // Full budget spent: last exam ends as the last window closes
        assert_eq!(s.last_end_ms(), Some(three_windows()[2].end_ms));
    }

    #[test]
    fn test_build_straddling_exam_moves_to_next_window_start() {
        let windows = vec![
            TimeWindow::new(0, 3 * HOUR_MS),
            TimeWindow::new(10 * HOUR_MS, 13 * HOUR_MS),
        ];
        let students = vec![StudentRecord::new("A").with_subjects(["X", "Y"])];
        let catalog = SubjectCatalog::from_students(&students);
        // Second exam would run 2.5h..3.5h
        let g = ExamGenome::new(vec![0, 1], vec![HOUR_MS + HOUR_MS / 2, 0]);

        let s = build_schedule(&g, &catalog, &windows, HOUR_MS).unwrap();
        assert_eq!(s.slots[1].start_ms, 10 * HOUR_MS);
        assert!(windows[1].encloses(s.slots[1].start_ms, s.slots[1].end_ms));
    }

    #[test]
    fn test_build_skips_windows_absorbing_carry() {
        let windows = vec![
            TimeWindow::new(0, 2 * HOUR_MS),
            TimeWindow::new(10 * HOUR_MS, 12 * HOUR_MS),
            TimeWindow::new(20 * HOUR_MS, 23 * HOUR_MS),
        ];
        let students = vec![StudentRecord::new("A").with_subjects(["X", "Y"])];
        let catalog = SubjectCatalog::from_students(&students);
        // 4h rest after an exam ending at 1h: 3h past close, window 2 absorbs 2h
        let g = ExamGenome::new(vec![0, 1], vec![4 * HOUR_MS, 0]);

        let s = build_schedule(&g, &catalog, &windows, HOUR_MS).unwrap();
        assert_eq!(s.slots[1].start_ms, 21 * HOUR_MS);
        assert_eq!(s.slots[1].end_ms, 22 * HOUR_MS);
    }

    #[test]
    fn test_build_fails_when_windows_exhausted() {
        let p = reference_problem();
        let g = ExamGenome::new(vec![0, 1, 2], vec![10 * HOUR_MS, 0, 0]);
        assert_eq!(
            p.decode(&g),
            Err(BuildError::WindowsExhausted { position: 1 })
        );
        assert_eq!(p.evaluate(&g), f64::INFINITY);
    }

    #[test]
    fn test_build_rejects_malformed() {
        let p = reference_problem();
        let g = ExamGenome::new(vec![0, 1, 2], vec![0, 0]);
        assert!(matches!(p.decode(&g), Err(BuildError::Malformed { .. })));
        let g = ExamGenome::new(vec![0, 1, 7], vec![0, 0, 0]);
        assert_eq!(p.decode(&g), Err(BuildError::UnknownSubject { index: 7 }));
    }

    #[test]
    fn test_schedules_respect_windows() {
        let p = reference_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            let g = p.create_individual(&mut rng);
            if let Ok(s) = p.decode(&g) {
                for slot in &s.slots {
                    assert_eq!(slot.duration_ms(), HOUR_MS);
                    assert!(p
                        .windows()
                        .iter()
                        .any(|w| w.encloses(slot.start_ms, slot.end_ms)));
                }
            }
        }
    }

    #[test]
    fn test_evaluate_worst_student() {
        let p = reference_problem();
        // Chinese day 0 9-10, English day 1 11-12, Math day 3 11-12
        let g = ExamGenome::new(vec![0, 1, 2], vec![4 * HOUR_MS, 2 * HOUR_MS, 0]);
        // A: Chinese -> English = 25h; B/C also English -> Math = 47h
        assert_eq!(p.evaluate(&g), -25.0);
    }

    #[test]
    fn test_evaluate_deterministic() {
        let p = reference_problem();
        let mut rng = SmallRng::seed_from_u64(5);
        let g = p.create_individual(&mut rng);
        let first = p.evaluate(&g);
        assert!((0..10).all(|_| p.evaluate(&g) == first));
    }

    #[test]
    fn test_single_exam_students_unconstrained() {
        let windows = vec![TimeWindow::new(9 * HOUR_MS, 12 * HOUR_MS)];
        let students = vec![
            StudentRecord::new("1").with_subject("A"),
            StudentRecord::new("2").with_subject("B"),
            StudentRecord::new("3").with_subject("C"),
        ];
        let p = TimetableProblem::new(windows, students, HOUR_MS).unwrap();
        assert_eq!(p.revision_budget_ms(), 0);

        let mut rng = SmallRng::seed_from_u64(1);
        let g = p.create_individual(&mut rng);
        assert_eq!(p.evaluate(&g), f64::NEG_INFINITY);
    }

    #[test]
    fn test_ga_runner_integration() {
        let p = reference_problem();
        let config = GaConfig::default()
            .with_population_size(40)
            .with_max_generations(15)
            .with_seed(42)
            .with_parallel(false);

        let result = GaRunner::run(&p, &config).unwrap();
        assert!(result.best_fitness.is_finite());
        assert!(result.best.revision_hours() >= 0.0);
        assert!(result.best.is_valid(3));
        assert_eq!(result.best.total_rest_ms(), p.revision_budget_ms());
    }

    #[test]
    fn test_huge_exam_duration_is_infeasible() {
        let err = TimetableProblem::new(three_windows(), reference_students(), i64::MAX / 2)
            .unwrap_err();
        assert_eq!(
            err,
            TimetableError::InfeasibleInput {
                capacity_ms: 9 * HOUR_MS,
                required_ms: i64::MAX,
            }
        );
    }

    #[test]
    fn test_build_past_time_range_fails() {
        let windows = vec![
            TimeWindow::new(i64::MAX - 3 * HOUR_MS, i64::MAX - HOUR_MS),
            TimeWindow::new(i64::MAX - HOUR_MS / 2, i64::MAX),
        ];
        let students = vec![StudentRecord::new("A").with_subjects(["X", "Y"])];
        let catalog = SubjectCatalog::from_students(&students);
        let g = ExamGenome::new(vec![0, 1], vec![2 * HOUR_MS, 0]);
        assert_eq!(
            build_schedule(&g, &catalog, &windows, HOUR_MS),
            Err(BuildError::WindowsExhausted { position: 1 })
        );
    }

    #[test]
    fn test_full_budget_ends_with_last_window() {
        // Whole-hour windows and whole-hour rests: every genome spending the
        // full budget either fails or closes the last window exactly.
        let mut rng = SmallRng::seed_from_u64(17);
        let students = vec![StudentRecord::new("A").with_subjects(["P", "Q", "R", "S"])];
        for _ in 0..50 {
            let mut start = 0;
            let windows: Vec<TimeWindow> = (0..rng.random_range(1..=4))
                .map(|_| {
                    start += rng.random_range(0..=10) * HOUR_MS;
                    let w = TimeWindow::new(start, start + rng.random_range(1..=4) * HOUR_MS);
                    start = w.end_ms;
                    w
                })
                .collect();
            let Ok(p) = TimetableProblem::new(windows.clone(), students.clone(), HOUR_MS) else {
                continue;
            };
            for _ in 0..20 {
                let g = p.create_individual(&mut rng);
                assert_eq!(g.total_rest_ms(), p.revision_budget_ms());
                if let Ok(s) = p.decode(&g) {
                    assert_eq!(s.last_end_ms(), windows.last().map(|w| w.end_ms));
                }
            }
        }
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let p = reference_problem();
        let config = GaConfig::default()
            .with_population_size(60)
            .with_max_generations(10)
            .with_seed(9);
        let par = GaRunner::run(&p, &config.clone().with_parallel(true)).unwrap();
        let seq = GaRunner::run(&p, &config.with_parallel(false)).unwrap();
        assert_eq!(par.best, seq.best);
        assert_eq!(par.history, seq.history);
    }

    #[test]
    fn test_with_revision_step_clamped() {
        let p = reference_problem().with_revision_step_ms(0);
        assert_eq!(p.revision_step_ms, 1);
    }
}
