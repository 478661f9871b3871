//! Closed-form concentration bounds.
//!
//! Each bound is an upper estimate of a tail probability as a function of the
//! deviation `t` (or the relative deviation `δ` for the chi-square case).

use std::f64::consts::PI;

/// An analytic upper bound on a tail probability.
pub trait TailBound {
    /// Bound at deviation `t`.
    fn evaluate(&self, t: f64) -> f64;

    /// Legend label.
    fn label(&self) -> &'static str;

    fn evaluate_grid(&self, grid: &[f64]) -> Vec<f64> {
        grid.iter().map(|&t| self.evaluate(t)).collect()
    }
}

/// Chebyshev bound for the mean of `n` Bernoulli(p) draws:
/// P(|X̄ - p| >= t) <= p(1-p) / (n t²).
#[derive(Copy, Clone, Debug)]
pub struct Chebyshev {
    pub n: usize,
    pub p: f64,
}

impl TailBound for Chebyshev {
    fn evaluate(&self, t: f64) -> f64 {
        let variance = self.p * (1.0 - self.p) / self.n as f64;
        variance / (t * t)
    }

    fn label(&self) -> &'static str {
        "Chebyshev bound"
    }
}

/// Hoeffding bound for the mean of `n` independent variables whose values
/// span an interval of width `range`: 2 exp(-2 n t² / range²).
#[derive(Copy, Clone, Debug)]
pub struct Hoeffding {
    pub n: usize,
    pub range: f64,
}

impl Hoeffding {
    /// ±1 variables.
    pub fn rademacher(n: usize) -> Self {
        Self { n, range: 2.0 }
    }
}

impl TailBound for Hoeffding {
    fn evaluate(&self, t: f64) -> f64 {
        2.0 * (-2.0 * self.n as f64 * t * t / (self.range * self.range)).exp()
    }

    fn label(&self) -> &'static str {
        "Hoeffding bound"
    }
}

/// Gaussian concentration of an L-Lipschitz function: 2 exp(-t² / 2L²).
#[derive(Copy, Clone, Debug)]
pub struct GaussianLipschitz {
    pub lipschitz: f64,
}

impl Default for GaussianLipschitz {
    fn default() -> Self {
        Self { lipschitz: 1.0 }
    }
}

impl TailBound for GaussianLipschitz {
    fn evaluate(&self, t: f64) -> f64 {
        let l2 = self.lipschitz * self.lipschitz;
        2.0 * (-t * t / (2.0 * l2)).exp()
    }

    fn label(&self) -> &'static str {
        "Gaussian Lipschitz bound"
    }
}

/// Chernoff bound for Z ~ χ²_d at relative deviation δ:
/// P(Z >= (1+δ)d) <= exp(-(d/2)(δ - ln(1+δ))).
#[derive(Copy, Clone, Debug)]
pub struct ChiSquareChernoff {
    pub d: usize,
}

impl TailBound for ChiSquareChernoff {
    fn evaluate(&self, delta: f64) -> f64 {
        let half_d = 0.5 * self.d as f64;
        (-half_d * (delta - delta.ln_1p())).exp()
    }

    fn label(&self) -> &'static str {
        "Chernoff bound"
    }
}

/// Cap bound for the scaled first coordinate sqrt(d)·X₁ of a uniform point on
/// S^{d-1}: P(|sqrt(d)·X₁| >= t) <= 2 exp(-t² / 2).
#[derive(Copy, Clone, Debug, Default)]
pub struct SphericalCap;

impl TailBound for SphericalCap {
    fn evaluate(&self, t: f64) -> f64 {
        2.0 * (-0.5 * t * t).exp()
    }

    fn label(&self) -> &'static str {
        "Spherical cap bound"
    }
}

pub fn standard_normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_chebyshev_fair_coin() {
        let bound = Chebyshev { n: 100, p: 0.5 };
        assert_relative_eq!(bound.evaluate(0.1), 1.0 / (4.0 * 100.0 * 0.01), epsilon = 1e-12);
        assert_relative_eq!(bound.evaluate(0.1), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_hoeffding_rademacher() {
        let bound = Hoeffding::rademacher(100);
        // 2 exp(-n t² / 2)
        assert_relative_eq!(bound.evaluate(0.2), 2.0 * (-2.0f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(bound.evaluate(0.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gaussian_lipschitz() {
        let bound = GaussianLipschitz::default();
        assert_relative_eq!(bound.evaluate(2.0), 2.0 * (-2.0f64).exp(), epsilon = 1e-12);
        let wider = GaussianLipschitz { lipschitz: 2.0 };
        assert_relative_eq!(wider.evaluate(2.0), 2.0 * (-0.5f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_spherical_cap_matches_unit_lipschitz() {
        for t in [0.0, 0.5, 1.0, 3.0] {
            assert_relative_eq!(SphericalCap.evaluate(t), GaussianLipschitz::default().evaluate(t), epsilon = 1e-15);
        }
        assert_eq!(SphericalCap.label(), "Spherical cap bound");
    }

    #[test]
    fn test_chernoff_chi_square() {
        let bound = ChiSquareChernoff { d: 20 };
        assert_relative_eq!(bound.evaluate(0.0), 1.0, epsilon = 1e-12);
        let expected = (-10.0 * (1.0 - 2.0f64.ln())).exp();
        assert_relative_eq!(bound.evaluate(1.0), expected, epsilon = 1e-12);
        let values = bound.evaluate_grid(&[0.1, 0.5, 1.0, 2.0]);
        for w in values.windows(2) {
            assert!(w[0] > w[1]);
        }
    }

    #[test]
    fn test_standard_normal_pdf() {
        assert_relative_eq!(standard_normal_pdf(0.0), 0.3989422804014327, epsilon = 1e-12);
        assert_relative_eq!(standard_normal_pdf(1.0), standard_normal_pdf(-1.0), epsilon = 1e-15);
    }
}
