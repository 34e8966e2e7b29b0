//! Benchmark functions with their valid domains.
//!
//! Every function first checks all arguments against its [`Boundary`]. If
//! any argument lies outside, the function returns [`INFEASIBLE`] without
//! further computation. Lower values are better for all functions.
//!
//! # Example
//!
//! ```
//! use metaheuristics_bench::testfuncs::{BenchmarkFunction, INFEASIBLE};
//!
//! let rastrigin: BenchmarkFunction = "Rastrigin".parse().unwrap();
//! assert_eq!(rastrigin.evaluate(&[0.0, 0.0, 0.0]), 0.0);
//! assert_eq!(rastrigin.evaluate(&[0.0, 6.0, 0.0]), INFEASIBLE);
//! ```

use crate::error::Error;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use std::f64::consts::{E, PI};
use std::fmt;
use std::str::FromStr;

/// Fitness of arguments outside a function's domain
///
/// Compares worse than any feasible fitness.
pub const INFEASIBLE: f64 = f64::MAX;

/// Valid domain of a benchmark function, identical for every dimension
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Boundary {
    /// Lower bound (inclusive)
    pub lower: f64,
    /// Upper bound (inclusive)
    pub upper: f64,
}

impl Boundary {
    /// Create boundary from lower and upper bound
    pub const fn new(lower: f64, upper: f64) -> Self {
        Boundary { lower, upper }
    }
    /// Distance between lower and upper bound
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
    /// Return true if `x` is within bounds (`NaN` never is)
    pub fn contains(&self, x: f64) -> bool {
        (self.lower..=self.upper).contains(&x)
    }
    /// Move `x` to the nearest bound if outside
    pub fn clamp(&self, x: f64) -> f64 {
        if x < self.lower {
            self.lower
        } else if x > self.upper {
            self.upper
        } else {
            x
        }
    }
    /// Uniform distribution over the boundary
    pub fn uniform(&self) -> Uniform<f64> {
        Uniform::new_inclusive(self.lower, self.upper)
    }
    /// Draw uniformly distributed point within the boundary
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.uniform().sample(rng)
    }
}

impl From<std::ops::RangeInclusive<f64>> for Boundary {
    fn from(range: std::ops::RangeInclusive<f64>) -> Self {
        Boundary::new(*range.start(), *range.end())
    }
}

/// Supported benchmark functions
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BenchmarkFunction {
    /// Sum of squares
    Sphere,
    /// Ackley function
    Ackley,
    /// Rastrigin function
    Rastrigin,
    /// Bent cigar function
    BentCigar,
    /// Griewank function
    Griewank,
    /// Sum of rounded down squares
    Step,
    /// Zakharov function
    Zakharov,
    /// Product of nested rounding sums
    Katsuura,
    /// Expanded Schaffer F6 function
    SchafterF6,
}

impl BenchmarkFunction {
    /// All supported functions
    pub const ALL: [BenchmarkFunction; 9] = [
        BenchmarkFunction::Sphere,
        BenchmarkFunction::Ackley,
        BenchmarkFunction::Rastrigin,
        BenchmarkFunction::BentCigar,
        BenchmarkFunction::Griewank,
        BenchmarkFunction::Step,
        BenchmarkFunction::Zakharov,
        BenchmarkFunction::Katsuura,
        BenchmarkFunction::SchafterF6,
    ];
    /// Name used in experiment specifications
    pub fn name(self) -> &'static str {
        match self {
            BenchmarkFunction::Sphere => "Sphere",
            BenchmarkFunction::Ackley => "Ackley",
            BenchmarkFunction::Rastrigin => "Rastrigin",
            BenchmarkFunction::BentCigar => "BentCigar",
            BenchmarkFunction::Griewank => "Griewank",
            BenchmarkFunction::Step => "Step",
            BenchmarkFunction::Zakharov => "Zakharov",
            BenchmarkFunction::Katsuura => "Katsuura",
            BenchmarkFunction::SchafterF6 => "SchafterF6",
        }
    }
    /// Look up function by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|function| function.name() == name)
    }
    /// Valid domain
    pub fn boundary(self) -> Boundary {
        match self {
            BenchmarkFunction::Sphere | BenchmarkFunction::Rastrigin => Boundary::new(-5.12, 5.12),
            BenchmarkFunction::Ackley => Boundary::new(-35.0, 35.0),
            BenchmarkFunction::BentCigar
            | BenchmarkFunction::Griewank
            | BenchmarkFunction::Step
            | BenchmarkFunction::SchafterF6 => Boundary::new(-100.0, 100.0),
            BenchmarkFunction::Zakharov => Boundary::new(-5.0, 10.0),
            BenchmarkFunction::Katsuura => Boundary::new(0.0, 100.0),
        }
    }
    /// Evaluate function, returns [`INFEASIBLE`] if any argument is outside
    /// the domain
    pub fn evaluate(self, args: &[f64]) -> f64 {
        let boundary = self.boundary();
        if !args.iter().all(|&x| boundary.contains(x)) {
            return INFEASIBLE;
        }
        match self {
            BenchmarkFunction::Sphere => sphere(args),
            BenchmarkFunction::Ackley => ackley(args),
            BenchmarkFunction::Rastrigin => rastrigin(args),
            BenchmarkFunction::BentCigar => bent_cigar(args),
            BenchmarkFunction::Griewank => griewank(args),
            BenchmarkFunction::Step => step(args),
            BenchmarkFunction::Zakharov => zakharov(args),
            BenchmarkFunction::Katsuura => katsuura(args),
            BenchmarkFunction::SchafterF6 => schafter_f6(args),
        }
    }
}

impl fmt::Display for BenchmarkFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BenchmarkFunction {
    type Err = Error;
    fn from_str(name: &str) -> Result<Self, Error> {
        if name.is_empty() {
            return Err(Error::MissingFunction);
        }
        Self::from_name(name).ok_or_else(|| Error::UnknownFunction(name.to_owned()))
    }
}

/// Evaluate function given by name
///
/// Unknown names result in [`INFEASIBLE`].
pub fn evaluate(name: &str, args: &[f64]) -> f64 {
    match BenchmarkFunction::from_name(name) {
        Some(function) => function.evaluate(args),
        None => INFEASIBLE,
    }
}

/// Sphere function (without domain check).
///
/// Minimum is at `0.0`.
pub fn sphere(args: &[f64]) -> f64 {
    args.iter().map(|x| x * x).sum()
}

/// Ackley function (without domain check).
///
/// Minimum is at `0.0`. The exponent uses the coefficient `0.02`. Returns
/// zero for empty input.
pub fn ackley(args: &[f64]) -> f64 {
    if args.is_empty() {
        return 0.0;
    }
    let n = args.len() as f64;
    let sum_sq: f64 = args.iter().map(|x| x * x).sum();
    let sum_cos: f64 = args.iter().map(|x| (2.0 * PI * x).cos()).sum();
    -20.0 * (-0.02 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}

/// Rastrigin function (without domain check).
///
/// Minimum is at `0.0`.
pub fn rastrigin(args: &[f64]) -> f64 {
    const A: f64 = 10.0;
    let n = args.len() as f64;
    args.iter()
        .copied()
        .map(|x| x * x - A * (2.0 * PI * x).cos())
        .sum::<f64>()
        + A * n
}

/// Bent cigar function (without domain check).
///
/// First argument is weighted with `1`, all others with `1e6`.
pub fn bent_cigar(args: &[f64]) -> f64 {
    match args.split_first() {
        Some((first, rest)) => 1e6 * sphere(rest) + first * first,
        None => 0.0,
    }
}

/// Griewank function (without domain check).
///
/// Minimum is at `0.0`.
pub fn griewank(args: &[f64]) -> f64 {
    let sum: f64 = args.iter().map(|x| x * x).sum();
    let product: f64 = args
        .iter()
        .enumerate()
        .map(|(i, x)| (x / ((i + 1) as f64).sqrt()).cos())
        .product();
    sum / 4000.0 - product + 1.0
}

/// Step function (without domain check).
pub fn step(args: &[f64]) -> f64 {
    args.iter().map(|x| (x * x).floor()).sum()
}

/// Zakharov function (without domain check).
///
/// Squares are weighted with their zero-based index, and the last
/// component does not contribute. Minimum is at `0.0`.
pub fn zakharov(args: &[f64]) -> f64 {
    let init = args.split_last().map_or(&[][..], |(_, init)| init);
    let sum: f64 = init.iter().map(|x| x * x).sum();
    let weighted: f64 = init
        .iter()
        .enumerate()
        .map(|(i, x)| i as f64 * x * x)
        .sum();
    let half = 0.5 * weighted;
    sum + half.powi(2) + half.powi(4)
}

/// Katsuura-like product of nested rounding sums (without domain check).
///
/// Rounding is half to even.
pub fn katsuura(args: &[f64]) -> f64 {
    args.iter()
        .enumerate()
        .map(|(i, &x)| {
            let sum: f64 = (1..33)
                .map(|j| {
                    let scale = 2f64.powi(j);
                    (scale * x).round_ties_even() / scale
                })
                .sum();
            1.0 + (i + 1) as f64 * sum
        })
        .product()
}

/// Expanded Schaffer F6 function over consecutive pairs (without domain
/// check).
pub fn schafter_f6(args: &[f64]) -> f64 {
    args.windows(2)
        .map(|pair| {
            let sq = pair[0] * pair[0] + pair[1] * pair[1];
            let top = sq.sqrt().sin().powi(2) - 0.5;
            let bottom = (1.0 + 0.0001 * sq).powi(2);
            0.5 + top / bottom
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_names() {
        for function in BenchmarkFunction::ALL {
            assert_eq!(function.name().parse::<BenchmarkFunction>().unwrap(), function);
            assert_eq!(function.to_string(), function.name());
        }
        assert!(matches!(
            "Rosenbrock".parse::<BenchmarkFunction>(),
            Err(Error::UnknownFunction(name)) if name == "Rosenbrock"
        ));
        assert!(matches!(
            "".parse::<BenchmarkFunction>(),
            Err(Error::MissingFunction)
        ));
    }
    #[test]
    fn test_out_of_domain() {
        for function in BenchmarkFunction::ALL {
            let boundary = function.boundary();
            let inside = (boundary.lower + boundary.upper) / 2.0;
            for outside in [boundary.lower - 0.01, boundary.upper + 0.01, f64::NAN] {
                for pos in 0..4 {
                    let mut args = vec![inside; 4];
                    args[pos] = outside;
                    assert_eq!(function.evaluate(&args), INFEASIBLE, "{function}");
                }
            }
            assert_ne!(function.evaluate(&[inside; 4]), INFEASIBLE, "{function}");
        }
    }
    #[test]
    fn test_bounds_inclusive() {
        assert_eq!(BenchmarkFunction::Sphere.evaluate(&[5.12, -5.12]), 2.0 * 5.12 * 5.12);
        assert_ne!(BenchmarkFunction::Zakharov.evaluate(&[-5.0, 10.0]), INFEASIBLE);
        assert_eq!(BenchmarkFunction::Zakharov.evaluate(&[-5.5, 0.0]), INFEASIBLE);
    }
    #[test]
    fn test_minima() {
        for dim in 1..=10 {
            let zero = vec![0.0; dim];
            assert_eq!(BenchmarkFunction::Sphere.evaluate(&zero), 0.0);
            assert_eq!(BenchmarkFunction::Rastrigin.evaluate(&zero), 0.0);
            assert_eq!(BenchmarkFunction::Griewank.evaluate(&zero), 0.0);
            assert_eq!(BenchmarkFunction::Zakharov.evaluate(&zero), 0.0);
            assert_eq!(BenchmarkFunction::BentCigar.evaluate(&zero), 0.0);
            assert_eq!(BenchmarkFunction::Step.evaluate(&zero), 0.0);
            assert!(BenchmarkFunction::Ackley.evaluate(&zero).abs() < 1e-12);
        }
    }
    #[test]
    fn test_values() {
        assert_eq!(sphere(&[1.0, 2.0, 3.0]), 14.0);
        assert_eq!(bent_cigar(&[2.0, 1.0, 1.0]), 2e6 + 4.0);
        assert_eq!(bent_cigar(&[]), 0.0);
        assert_eq!(step(&[1.5, -2.5]), 2.0 + 6.0);
        // sum = 1 + 4, weighted = 0 * 1 + 1 * 4, last component ignored
        assert_eq!(zakharov(&[1.0, 2.0, 3.0]), 5.0 + 4.0 + 16.0);
        assert_eq!(zakharov(&[7.0]), 0.0);
        assert_eq!(zakharov(&[]), 0.0);
        assert!((rastrigin(&[1.0]) - 1.0).abs() < 1e-12);
        assert!((griewank(&[PI]) - (PI * PI / 4000.0 + 2.0)).abs() < 1e-12);
        assert!((ackley(&[1.0, 1.0]) - 0.396_026_533_864_895).abs() < 1e-12);
        let expected = -20.0 * (-0.02 * 2.5f64.sqrt()).exp() - 1.0f64.exp() + 20.0 + E;
        assert!((ackley(&[1.0, 2.0]) - expected).abs() < 1e-12);
        assert_eq!(ackley(&[]), 0.0);
    }
    #[test]
    fn test_katsuura() {
        assert_eq!(katsuura(&[0.0, 0.0]), 1.0);
        // every partial rounding of 1.0 is exact
        assert_eq!(katsuura(&[1.0]), 1.0 + 32.0);
        assert_eq!(katsuura(&[1.0, 1.0]), 33.0 * 65.0);
        // 2^1 * 0.25 = 0.5 rounds to even (0), 2^j * 0.25 for j >= 2 is exact
        assert_eq!(katsuura(&[0.25]), 1.0 + 31.0 * 0.25);
    }
    #[test]
    fn test_schafter_f6() {
        assert_eq!(schafter_f6(&[0.0]), 0.0);
        assert_eq!(schafter_f6(&[0.0, 0.0, 0.0]), 0.0);
        let value = schafter_f6(&[1.0, 2.0]);
        let sq: f64 = 5.0;
        let expected = 0.5 + (sq.sqrt().sin().powi(2) - 0.5) / (1.0 + 0.0001 * sq).powi(2);
        assert_eq!(value, expected);
    }
    #[test]
    fn test_evaluate_by_name() {
        assert_eq!(evaluate("Sphere", &[3.0, 4.0]), 25.0);
        assert_eq!(evaluate("NoSuchFunction", &[0.0]), INFEASIBLE);
    }
    #[test]
    fn test_boundary() {
        let boundary: Boundary = (-1.0..=2.0).into();
        assert_eq!(boundary.width(), 3.0);
        assert_eq!(boundary.clamp(-3.0), -1.0);
        assert_eq!(boundary.clamp(2.5), 2.0);
        assert_eq!(boundary.clamp(0.5), 0.5);
        assert!(!boundary.contains(f64::NAN));
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            assert!(boundary.contains(boundary.sample(&mut rng)));
        }
    }
}
