//! Probability distributions used for sampling candidates.

use crate::testfuncs::Boundary;

use num::traits::{Float, FloatConst, NumAssignOps, NumCast};
use rand::{
    distributions::{uniform::SampleUniform, Distribution, OpenClosed01},
    seq::SliceRandom,
    Rng,
};

/// Numbers supported by generic items of this module.
pub trait Num
where
    Self: Float + FloatConst + NumCast + NumAssignOps,
    Self: SampleUniform,
{
    /// Generate number between zero (exclusive) and one (inclusive).
    ///
    /// Avoids having to add `OpenClosed01: Distribution<T>` bounds
    /// everywhere (see Rust issue [#20671]).
    ///
    /// [#20671]: https://github.com/rust-lang/rust/issues/20671
    fn sample_open_closed_01<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl<T> Num for T
where
    T: Float + FloatConst + NumCast + NumAssignOps,
    T: SampleUniform,
    OpenClosed01: Distribution<T>,
{
    fn sample_open_closed_01<R: Rng + ?Sized>(rng: &mut R) -> Self {
        OpenClosed01.sample(rng)
    }
}

/// Univariate standard normal distribution (Box-Muller).
#[derive(Clone, Copy, Default, Debug)]
pub struct StdNormDist;

impl<T: Num> Distribution<T> for StdNormDist {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let pi: T = T::PI();
        let two: T = T::one() + T::one();
        let r = (-two * T::ln(T::sample_open_closed_01(rng))).sqrt();
        r * rng.gen_range(-pi..pi).sin()
    }
}

/// Univariate normal distribution with given average and standard
/// deviation.
///
/// A standard deviation of zero always yields the average.
#[derive(Clone, Debug)]
pub struct NormDist<T> {
    /// Average of created samples.
    pub average: T,
    /// Standard deviation of created samples.
    pub stddev: T,
}

impl<T> NormDist<T> {
    /// Create distribution with given average and standard deviation.
    pub const fn new(average: T, stddev: T) -> NormDist<T> {
        NormDist { average, stddev }
    }
}

impl<T: Num> Distribution<T> for NormDist<T> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let x: T = StdNormDist.sample(rng);
        x * self.stddev + self.average
    }
}

/// Latin hypercube sample of `count` points in `dim` dimensions.
///
/// The boundary is split into `count` equally wide strata per dimension.
/// Every stratum of every dimension contains exactly one point, and the
/// strata are shuffled independently for each dimension.
#[derive(Clone, Copy, Debug)]
pub struct LatinHypercube {
    /// Search domain (same for all dimensions)
    pub boundary: Boundary,
    /// Number of points
    pub count: usize,
    /// Dimensionality of each point
    pub dim: usize,
}

impl Distribution<Vec<Vec<f64>>> for LatinHypercube {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Vec<f64>> {
        let mut points = vec![Vec::with_capacity(self.dim); self.count];
        if self.count == 0 {
            return points;
        }
        let stride = self.boundary.width() / self.count as f64;
        let mut column: Vec<f64> = Vec::with_capacity(self.count);
        for _ in 0..self.dim {
            column.clear();
            column.extend((0..self.count).map(|stratum| {
                let x = self.boundary.lower + (stratum as f64 + rng.gen::<f64>()) * stride;
                self.boundary.clamp(x)
            }));
            column.shuffle(rng);
            for (point, x) in points.iter_mut().zip(column.iter().copied()) {
                point.push(x);
            }
        }
        points
    }
}
