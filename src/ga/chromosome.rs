//! Order/rest dual-vector chromosome for exam timetabling.
//!
//! # Encoding
//!
//! The chromosome consists of two parallel vectors of length `S`:
//! - **order**: permutation of subject indices; position `k` is the k-th exam.
//! - **rest**: revision time (ms) inserted after the exam at position `k`.
//!   The last entry is always zero.
//!
//! The sum of rests is the revision budget the genome spends. Fresh
//! genomes spend the whole budget; crossover never changes the rest
//! column and mutation only moves time between slots, so the sum is
//! conserved afterwards.

use rand::Rng;
use rand::seq::SliceRandom;
use u_metaheur::ga::Individual;

/// Order/rest chromosome for timetabling GA.
///
/// Lower fitness = better timetable (minimization convention). Fitness is
/// the negated worst-student revision gap in hours, so an unconstrained
/// timetable scores `-inf` and an unbuildable one `+inf`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamGenome {
    /// Subject indices in exam order.
    pub order: Vec<usize>,
    /// Revision time after each exam position (ms).
    pub rest_ms: Vec<i64>,
    /// Cached fitness (lower is better).
    pub fitness: f64,
}

impl Individual for ExamGenome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl ExamGenome {
    /// Creates a genome from explicit columns.
    pub fn new(order: Vec<usize>, rest_ms: Vec<i64>) -> Self {
        Self {
            order,
            rest_ms,
            fitness: f64::INFINITY,
        }
    }

    /// Worst-student revision gap (hours) implied by the cached fitness.
    pub fn revision_hours(&self) -> f64 {
        -self.fitness
    }

    /// Creates a random genome that spends exactly `budget_ms` of rest.
    ///
    /// # Algorithm
    /// 1. Order = `0..S`, uniformly shuffled.
    /// 2. Walk positions `0..S-1`, drawing a rest of `[0, budget/step]`
    ///    whole steps each; the draw that would exceed the budget is
    ///    clamped and distribution stops.
    /// 3. Any budget left unspent goes to position `S-2`.
    /// 4. Position `S-1` keeps zero rest.
    pub fn random<R: Rng>(subject_count: usize, budget_ms: i64, step_ms: i64, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..subject_count).collect();
        order.shuffle(rng);

        let mut rest_ms = vec![0; subject_count];
        let budget_ms = budget_ms.max(0);
        if subject_count >= 2 {
            let max_steps = budget_ms / step_ms.max(1);
            let mut total = 0;
            for slot in rest_ms.iter_mut().take(subject_count - 1) {
                let draw = rng.random_range(0..=max_steps) * step_ms.max(1);
                let granted = draw.min(budget_ms - total);
                *slot = granted;
                total += granted;
                if total >= budget_ms {
                    break;
                }
            }
            if total < budget_ms {
                rest_ms[subject_count - 2] += budget_ms - total;
            }
        }

        Self::new(order, rest_ms)
    }

    /// Number of exam positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the genome has no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total revision time spent (ms).
    pub fn total_rest_ms(&self) -> i64 {
        self.rest_ms.iter().sum()
    }

    /// Validates the structural invariants for `subject_count` subjects.
    ///
    /// Checks column lengths, that `order` is a permutation of
    /// `0..subject_count`, that no rest is negative, and that the last
    /// rest is zero. The budget is not checked.
    pub fn is_valid(&self, subject_count: usize) -> bool {
        if self.order.len() != subject_count || self.rest_ms.len() != subject_count {
            return false;
        }
        let mut seen = vec![false; subject_count];
        for &s in &self.order {
            if s >= subject_count || seen[s] {
                return false;
            }
            seen[s] = true;
        }
        self.rest_ms.iter().all(|&r| r >= 0) && self.rest_ms.last().map_or(true, |&r| r == 0)
    }
}

// ======================== Crossover operators ========================

/// Performs prefix order crossover.
///
/// Two cut points `i < j` are drawn over `[0, S-1]`. Child 1 takes
/// parent 2's subjects at `[i, j)` as its prefix, followed by parent 1's
/// remaining subjects in parent 1's order; child 2 mirrors this. Equal
/// cut points leave both parents unchanged.
///
/// Rest columns are inherited verbatim from the parent whose order fills
/// the tail, so rest totals are unchanged.
pub fn prefix_order_crossover<R: Rng>(
    p1: &ExamGenome,
    p2: &ExamGenome,
    rng: &mut R,
) -> (ExamGenome, ExamGenome) {
    let len = p1.order.len().min(p2.order.len());
    if len < 2 {
        return (p1.clone(), p2.clone());
    }

    let a = rng.random_range(0..len);
    let b = rng.random_range(0..len);
    if a == b {
        return (p1.clone(), p2.clone());
    }
    let (i, j) = (a.min(b), a.max(b));

    let child1 = ExamGenome::new(prefix_fill(&p2.order[i..j], &p1.order), p1.rest_ms.clone());
    let child2 = ExamGenome::new(prefix_fill(&p1.order[i..j], &p2.order), p2.rest_ms.clone());
    (child1, child2)
}

fn prefix_fill(prefix: &[usize], base: &[usize]) -> Vec<usize> {
    let mut child = prefix.to_vec();
    child.extend(base.iter().filter(|s| !prefix.contains(*s)));
    child
}

// ======================== Mutation operators ========================

/// Swap-shift mutation.
///
/// 1. Exchanges the subjects at two distinct positions.
/// 2. Exchanges the rests at two distinct positions other than the last.
/// 3. Moves up to `step_ms` of rest from the first of those positions to
///    the second (or back, if the first has none left).
///
/// Rest total is conserved and no rest goes negative.
pub fn swap_shift_mutation<R: Rng>(genome: &mut ExamGenome, step_ms: i64, rng: &mut R) {
    let len = genome.len();
    if len >= 2 {
        let (i, j) = distinct_pair(len, rng);
        genome.order.swap(i, j);
    }
    if len >= 3 {
        let (a, b) = distinct_pair(len - 1, rng);
        genome.rest_ms.swap(a, b);
        shift_rest(genome, a, b, step_ms);
    }
}

/// Shift-only mutation.
///
/// Draws positions like [`swap_shift_mutation`] but performs no exchange:
/// only the rest shift between the two drawn rest positions applies, and
/// the order column is left untouched. Positions may coincide, in which
/// case nothing changes. Kept for parity with the weaker operator of
/// earlier timetabling runs.
pub fn shift_only_mutation<R: Rng>(genome: &mut ExamGenome, step_ms: i64, rng: &mut R) {
    let len = genome.len();
    if len < 2 {
        return;
    }
    // Subject positions are drawn but never exchanged.
    let _ = (rng.random_range(0..len), rng.random_range(0..len));
    let a = rng.random_range(0..len - 1);
    let b = rng.random_range(0..len - 1);
    shift_rest(genome, a, b, step_ms);
}

/// Two distinct indices in `0..n` (requires `n >= 2`).
fn distinct_pair<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    (i, j)
}

fn shift_rest(genome: &mut ExamGenome, a: usize, b: usize, step_ms: i64) {
    let rest = &mut genome.rest_ms;
    let (from, to) = if rest[a] > 0 {
        (a, b)
    } else if rest[b] > 0 {
        (b, a)
    } else {
        return;
    };
    let moved = step_ms.max(1).min(rest[from]);
    rest[from] -= moved;
    rest[to] += moved;
}
