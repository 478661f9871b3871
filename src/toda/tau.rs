//! Closed-form positions of the two-particle Toda chain via tau functions.
//!
//! With L0 = Σ λ_k v_k v_kᵀ and v_k = (c_k, d_k):
//!   τ₀(t) = Σ c_k² e^{λ_k t},  τ₁(t) = Σ d_k² e^{λ_k t}
//!   q₁(t) = ln(τ₀ / τ₁),       q₂(t) = -ln τ₁   (up to an additive constant)

use super::lax::{LaxPair, TodaState};
use crate::error::{ExperimentError, Result};

#[derive(Clone, Debug)]
pub struct TwoParticleTau {
    /// Ascending eigenvalues of L0
    pub eigenvalues: [f64; 2],
    /// First eigenvector components
    pub c: [f64; 2],
    /// Second eigenvector components
    pub d: [f64; 2],
}

impl TwoParticleTau {
    pub fn new(state: &TodaState) -> Result<Self> {
        if state.n_particles() != 2 {
            return Err(ExperimentError::invalid(format!(
                "tau-function solution needs 2 particles, got {}",
                state.n_particles()
            )));
        }
        let pair = LaxPair::from_state(state)?;
        let eig = pair.l0.symmetric_eigen();

        let mut order = [0usize, 1];
        order.sort_by(|&i, &j| eig.eigenvalues[i].total_cmp(&eig.eigenvalues[j]));

        let eigenvalues = order.map(|k| eig.eigenvalues[k]);
        let c = order.map(|k| eig.eigenvectors[(0, k)]);
        let d = order.map(|k| eig.eigenvectors[(1, k)]);
        Ok(Self { eigenvalues, c, d })
    }

    /// ln Σ w_k² e^{λ_k t}, evaluated with log-sum-exp.
    fn ln_tau(&self, weights: &[f64; 2], t: f64) -> f64 {
        let exponents: Vec<f64> = weights
            .iter()
            .zip(self.eigenvalues.iter())
            .filter(|(w, _)| **w != 0.0)
            .map(|(w, l)| 2.0 * w.abs().ln() + l * t)
            .collect();
        let max = exponents.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == f64::NEG_INFINITY {
            return max;
        }
        max + exponents.iter().map(|e| (e - max).exp()).sum::<f64>().ln()
    }

    pub fn ln_tau0(&self, t: f64) -> f64 {
        self.ln_tau(&self.c, t)
    }

    pub fn ln_tau1(&self, t: f64) -> f64 {
        self.ln_tau(&self.d, t)
    }

    /// (q₁(t), q₂(t))
    pub fn positions(&self, t: f64) -> (f64, f64) {
        let ln_tau1 = self.ln_tau1(t);
        (self.ln_tau0(t) - ln_tau1, -ln_tau1)
    }

    pub fn trajectory(&self, times: &[f64]) -> (Vec<f64>, Vec<f64>) {
        times.iter().map(|&t| self.positions(t)).unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tau() -> TwoParticleTau {
        TwoParticleTau::new(&TodaState::new(vec![1.0, -1.0], vec![0.0, 1.0]).unwrap()).unwrap()
    }

    #[test]
    fn test_eigen_components() {
        let tau = tau();
        let lambda = (1.0 + 1f64.exp()).sqrt();
        assert_relative_eq!(tau.eigenvalues[0], -lambda, epsilon = 1e-10);
        assert_relative_eq!(tau.eigenvalues[1], lambda, epsilon = 1e-10);
        // rows of an orthogonal matrix have unit norm
        assert_relative_eq!(tau.c[0].powi(2) + tau.c[1].powi(2), 1.0, epsilon = 1e-12);
        assert_relative_eq!(tau.d[0].powi(2) + tau.d[1].powi(2), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_positions_start_at_origin() {
        let (q1, q2) = tau().positions(0.0);
        assert_relative_eq!(q1, 0.0, epsilon = 1e-12);
        assert_relative_eq!(q2, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_asymptotic_velocities() {
        let tau = tau();
        let lambda = (1.0 + 1f64.exp()).sqrt();
        let h = 1e-3;
        let (q1a, q2a) = tau.positions(40.0);
        let (q1b, q2b) = tau.positions(40.0 + h);
        assert_relative_eq!((q2b - q2a) / h, -lambda, epsilon = 1e-6);
        assert_relative_eq!((q1b - q1a) / h, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_large_times_stay_finite() {
        let (q1, q2) = tau().trajectory(&[0.0, 500.0, 1_000.0]);
        assert!(q1.iter().chain(q2.iter()).all(|x| x.is_finite()));
    }

    #[test]
    fn test_rejects_three_particles() {
        let state = TodaState::new(vec![1.0, 0.0, -1.0], vec![0.0, 1.0, 2.0]).unwrap();
        assert!(TwoParticleTau::new(&state).is_err());
    }
}
