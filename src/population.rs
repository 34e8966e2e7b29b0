//! Candidate solutions and elementary vector arithmetic.
//!
//! All algorithms minimize. Fitness values are compared with
//! [`cmp_fitness`], which orders `NaN` after every other value (including
//! [`INFEASIBLE`](crate::testfuncs::INFEASIBLE)).

use crate::testfuncs::Boundary;

use rand::distributions::Distribution;
use rand::Rng;
use std::cmp::Ordering;

/// Compare fitness values ([`Less`] means better)
///
/// [`Less`]: Ordering::Less
pub fn cmp_fitness(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// Point in search space together with its fitness
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Coordinates
    pub position: Vec<f64>,
    /// Fitness (smaller values are better)
    pub fitness: f64,
}

impl Candidate {
    /// Create candidate from position, calculating fitness with `evaluate`
    pub fn new<F>(position: Vec<f64>, evaluate: F) -> Self
    where
        F: FnOnce(&[f64]) -> f64,
    {
        let fitness = evaluate(&position);
        Candidate { position, fitness }
    }
    /// Compare candidates by fitness ([`Less`] means better)
    ///
    /// [`Less`]: Ordering::Less
    pub fn cmp_fitness(&self, other: &Self) -> Ordering {
        cmp_fitness(self.fitness, other.fitness)
    }
}

/// Sort candidates by fitness (best first)
pub fn sort_by_fitness(candidates: &mut [Candidate]) {
    candidates.sort_by(Candidate::cmp_fitness);
}

/// Index of best candidate, if any
pub fn best_index(candidates: &[Candidate]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp_fitness(b))
        .map(|(idx, _)| idx)
}

/// Average fitness
///
/// Divides before summing, so that [`INFEASIBLE`] values do not overflow.
/// Returns `NaN` for an empty slice.
///
/// [`INFEASIBLE`]: crate::testfuncs::INFEASIBLE
pub fn mean_fitness(candidates: &[Candidate]) -> f64 {
    let n = candidates.len() as f64;
    candidates.iter().map(|c| c.fitness / n).sum()
}

/// Uniformly distributed random position within boundary
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, boundary: &Boundary, dim: usize) -> Vec<f64> {
    let dist = boundary.uniform();
    (0..dim).map(|_| dist.sample(rng)).collect()
}

/// Clamp all coordinates into boundary
pub fn clamp_position(position: &mut [f64], boundary: &Boundary) {
    for x in position.iter_mut() {
        *x = boundary.clamp(*x);
    }
}

/// Add `factor * b` to `a` in place
pub fn add_scaled(a: &mut [f64], b: &[f64], factor: f64) {
    for (x, y) in a.iter_mut().zip(b) {
        *x += factor * y;
    }
}

/// Euclidean distance
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
