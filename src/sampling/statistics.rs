//! Statistics whose tails are compared with concentration bounds.

use nalgebra::DVector;
use rand::Rng;
use rand_distr::{Binomial, ChiSquared, Distribution, StandardNormal};

use super::traits::StatisticSampler;
use crate::error::{ExperimentError, Result};

fn require_positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(ExperimentError::invalid(format!("{} must be positive", name)));
    }
    Ok(())
}

/// Standard Gaussian vector g ~ N(0, I_d).
pub fn gaussian_vector<R: Rng + ?Sized>(d: usize, rng: &mut R) -> DVector<f64> {
    DVector::from_fn(d, |_, _| rng.sample(StandardNormal))
}

/// Uniform point on the unit sphere S^{d-1}: a normalised Gaussian vector.
pub fn sample_sphere_point<R: Rng + ?Sized>(d: usize, rng: &mut R) -> DVector<f64> {
    loop {
        let g = gaussian_vector(d, rng);
        let norm = g.norm();
        if norm > 0.0 {
            return g / norm;
        }
    }
}

/// Sample mean of `n` Bernoulli(p) draws.
#[derive(Clone, Debug)]
pub struct BernoulliMean {
    n: usize,
    p: f64,
    successes: Binomial,
}

impl BernoulliMean {
    pub fn new(n: usize, p: f64) -> Result<Self> {
        require_positive("number of Bernoulli draws", n)?;
        let successes =
            Binomial::new(n as u64, p).map_err(|e| ExperimentError::invalid(e.to_string()))?;
        Ok(Self { n, p, successes })
    }
}

impl StatisticSampler for BernoulliMean {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.successes.sample(rng) as f64 / self.n as f64
    }

    fn center(&self) -> f64 {
        self.p
    }
}

/// Sample mean of `n` Rademacher (±1) draws.
#[derive(Copy, Clone, Debug)]
pub struct RademacherMean {
    n: usize,
}

impl RademacherMean {
    pub fn new(n: usize) -> Result<Self> {
        require_positive("number of Rademacher draws", n)?;
        Ok(Self { n })
    }
}

impl StatisticSampler for RademacherMean {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let sum: i64 = (0..self.n).map(|_| if rng.gen_bool(0.5) { 1 } else { -1 }).sum();
        sum as f64 / self.n as f64
    }

    fn center(&self) -> f64 {
        0.0
    }
}

/// Euclidean norm of a standard Gaussian vector in dimension `d`.
#[derive(Copy, Clone, Debug)]
pub struct GaussianNorm {
    d: usize,
}

impl GaussianNorm {
    pub fn new(d: usize) -> Result<Self> {
        require_positive("dimension", d)?;
        Ok(Self { d })
    }
}

impl StatisticSampler for GaussianNorm {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        gaussian_vector(self.d, rng).norm()
    }

    fn center(&self) -> f64 {
        (self.d as f64).sqrt()
    }
}

/// First coordinate of a uniform point on S^{d-1}, scaled by sqrt(d).
///
/// For large `d` this is approximately N(0, 1).
#[derive(Copy, Clone, Debug)]
pub struct SphereCoordinate {
    d: usize,
}

impl SphereCoordinate {
    pub fn new(d: usize) -> Result<Self> {
        require_positive("dimension", d)?;
        Ok(Self { d })
    }
}

impl StatisticSampler for SphereCoordinate {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        (self.d as f64).sqrt() * sample_sphere_point(self.d, rng)[0]
    }

    fn center(&self) -> f64 {
        0.0
    }
}

/// Norm of a standard Gaussian vector divided by sqrt(d).
#[derive(Copy, Clone, Debug)]
pub struct GaussianRadius {
    d: usize,
}

impl GaussianRadius {
    pub fn new(d: usize) -> Result<Self> {
        require_positive("dimension", d)?;
        Ok(Self { d })
    }
}

impl StatisticSampler for GaussianRadius {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        gaussian_vector(self.d, rng).norm() / (self.d as f64).sqrt()
    }

    fn center(&self) -> f64 {
        1.0
    }
}

/// Chi-square variable with `d` degrees of freedom.
#[derive(Clone, Debug)]
pub struct ChiSquare {
    d: usize,
    dist: ChiSquared<f64>,
}

impl ChiSquare {
    pub fn new(d: usize) -> Result<Self> {
        require_positive("degrees of freedom", d)?;
        let dist = ChiSquared::new(d as f64).map_err(|e| ExperimentError::invalid(e.to_string()))?;
        Ok(Self { d, dist })
    }
}

impl StatisticSampler for ChiSquare {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }

    fn center(&self) -> f64 {
        self.d as f64
    }
}
