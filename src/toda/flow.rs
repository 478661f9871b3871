//! Time evolution of a Lax matrix.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::lax::{eigenvalues, LaxPair};
use crate::error::{ExperimentError, Result};

/// How L(t) is advanced in time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LaxFlow {
    /// L(t) = exp(tB) L0 exp(-tB) with B frozen at t = 0.
    #[default]
    Conjugation,
    /// dL/dt = [B(L), L] with B(L) = L₊ - L₋, integrated by RK4 with
    /// `substeps` steps between consecutive output times.
    Toda { substeps: usize },
}

/// Strictly upper part of L minus its strictly lower part.
pub fn flaschka_b(l: &DMatrix<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(l.nrows(), l.ncols(), |i, j| {
        if i < j {
            l[(i, j)]
        } else if i > j {
            -l[(i, j)]
        } else {
            0.0
        }
    })
}

fn lax_rhs(l: &DMatrix<f64>) -> DMatrix<f64> {
    let b = flaschka_b(l);
    &b * l - l * &b
}

fn rk4_step(l: &DMatrix<f64>, h: f64) -> DMatrix<f64> {
    let k1 = lax_rhs(l);
    let k2 = lax_rhs(&(l + &k1 * (0.5 * h)));
    let k3 = lax_rhs(&(l + &k2 * (0.5 * h)));
    let k4 = lax_rhs(&(l + &k3 * h));
    l + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)
}

/// Sampled evolution of a Lax matrix.
#[derive(Clone, Debug)]
pub struct LaxTrajectory {
    pub times: Vec<f64>,
    pub matrices: Vec<DMatrix<f64>>,
    /// Eigenvalues at each time, largest first
    pub eigenvalues: Vec<Vec<f64>>,
}

impl LaxTrajectory {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.matrices.first().map_or(0, |m| m.nrows())
    }

    pub fn entry_series(&self, i: usize, j: usize) -> Vec<f64> {
        self.matrices.iter().map(|m| m[(i, j)]).collect()
    }

    /// L_kk(t), the momentum proxy of particle `k`.
    pub fn diagonal_series(&self, k: usize) -> Vec<f64> {
        self.entry_series(k, k)
    }

    /// k-th largest eigenvalue over time.
    pub fn eigenvalue_series(&self, k: usize) -> Vec<f64> {
        self.eigenvalues.iter().map(|e| e[k]).collect()
    }

    /// Largest absolute eigenvalue change relative to the first sample.
    pub fn spectral_drift(&self) -> f64 {
        let Some(first) = self.eigenvalues.first() else {
            return 0.0;
        };
        self.eigenvalues
            .iter()
            .flat_map(|e| e.iter().zip(first.iter()).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max)
    }
}

/// Evolve `pair` and sample L(t) at every entry of `times` (ascending, L(0) = L0).
pub fn evolve(pair: &LaxPair, times: &[f64], flow: LaxFlow) -> Result<LaxTrajectory> {
    if times.iter().any(|t| !t.is_finite()) {
        return Err(ExperimentError::invalid("time grid contains non-finite values"));
    }
    if times.windows(2).any(|w| w[1] < w[0]) {
        return Err(ExperimentError::invalid("time grid must be ascending"));
    }

    let matrices: Vec<DMatrix<f64>> = match flow {
        LaxFlow::Conjugation => times.iter().map(|&t| pair.at(t)).collect(),
        LaxFlow::Toda { substeps } => {
            if substeps == 0 {
                return Err(ExperimentError::invalid("Toda flow needs at least one substep"));
            }
            let mut current = pair.l0.clone();
            let mut current_t = 0.0;
            let mut out = Vec::with_capacity(times.len());
            for &t in times {
                let h = (t - current_t) / substeps as f64;
                if h != 0.0 {
                    for _ in 0..substeps {
                        current = rk4_step(&current, h);
                    }
                }
                current_t = t;
                out.push(current.clone());
            }
            out
        }
    };

    let eigenvalues = matrices.iter().map(eigenvalues).collect();
    let trajectory = LaxTrajectory {
        times: times.to_vec(),
        matrices,
        eigenvalues,
    };
    debug!(
        "Evolved {}x{} Lax matrix over {} samples with {:?}, spectral drift {:.3e}",
        pair.dim(),
        pair.dim(),
        trajectory.len(),
        flow,
        trajectory.spectral_drift()
    );
    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::linspace;
    use crate::toda::TodaState;
    use approx::assert_relative_eq;

    fn pair(p: Vec<f64>, q: Vec<f64>) -> LaxPair {
        LaxPair::from_state(&TodaState::new(p, q).unwrap()).unwrap()
    }

    #[test]
    fn test_flaschka_b_is_skew() {
        let l = pair(vec![1.0, 0.0, -1.0], vec![0.0, 1.0, 2.0]).l0;
        let b = flaschka_b(&l);
        assert_relative_eq!((&b + b.transpose()).norm(), 0.0);
        assert_relative_eq!(b[(0, 1)], l[(0, 1)]);
        assert_relative_eq!(b[(1, 0)], -l[(1, 0)]);
    }

    #[test]
    fn test_conjugation_trajectory() {
        let pair = pair(vec![1.0, -1.0], vec![0.0, 1.0]);
        let times = linspace(0.0, 10.0, 500);
        let traj = evolve(&pair, &times, LaxFlow::Conjugation).unwrap();
        assert_eq!(traj.len(), 500);
        assert_eq!(traj.dim(), 2);
        assert_relative_eq!(traj.entry_series(0, 1)[0], 0.5f64.exp(), epsilon = 1e-12);
        assert!(traj.spectral_drift() < 1e-9);
        let top = traj.eigenvalue_series(0);
        let bottom = traj.eigenvalue_series(1);
        assert!(top.iter().zip(bottom.iter()).all(|(a, b)| a > b));
    }

    #[test]
    fn test_toda_flow_is_isospectral_and_symmetric() {
        let pair = pair(vec![1.0, 0.0, -1.0], vec![0.0, 1.0, 2.0]);
        let times = linspace(0.0, 10.0, 300);
        let traj = evolve(&pair, &times, LaxFlow::Toda { substeps: 10 }).unwrap();
        assert_relative_eq!((&traj.matrices[0] - &pair.l0).norm(), 0.0);
        assert!(traj.spectral_drift() < 1e-7);
        for m in &traj.matrices {
            assert_relative_eq!((m - m.transpose()).norm(), 0.0, epsilon = 1e-10);
            assert_relative_eq!(m.trace(), 0.0, epsilon = 1e-9);
            // tridiagonal structure survives
            assert!(m[(0, 2)].abs() < 1e-10);
        }
    }

    #[test]
    fn test_toda_flow_sorts_the_spectrum() {
        // off-diagonal couplings decay and the diagonal converges to the eigenvalues
        let pair = pair(vec![1.0, -1.0], vec![0.0, 1.0]);
        let lambda = (1.0 + 1f64.exp()).sqrt();
        let traj = evolve(&pair, &[0.0, 20.0], LaxFlow::Toda { substeps: 10_000 }).unwrap();
        let end = &traj.matrices[1];
        assert!(end[(0, 1)].abs() < 1e-6);
        assert_relative_eq!(end[(0, 0)], lambda, epsilon = 1e-6);
        assert_relative_eq!(end[(1, 1)], -lambda, epsilon = 1e-6);
    }

    #[test]
    fn test_evolve_rejects_bad_grids() {
        let pair = pair(vec![1.0, -1.0], vec![0.0, 1.0]);
        assert!(evolve(&pair, &[1.0, 0.5], LaxFlow::Conjugation).is_err());
        assert!(evolve(&pair, &[0.0, f64::NAN], LaxFlow::Conjugation).is_err());
        assert!(evolve(&pair, &[0.0, 1.0], LaxFlow::Toda { substeps: 0 }).is_err());
    }
}
