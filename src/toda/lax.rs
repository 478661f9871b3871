//! Lax pair of the open Toda lattice.
//!
//! For momenta p and positions q of N particles the Lax matrix L is symmetric
//! tridiagonal with diagonal p_i and off-diagonal a_i = exp((q_{i+1} - q_i) / 2).
//! B is the skew-symmetric tridiagonal partner with B[i][i+1] = -a_i.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, Result};

/// Phase-space point of an open chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TodaState {
    pub momenta: Vec<f64>,
    pub positions: Vec<f64>,
}

impl TodaState {
    pub fn new(momenta: Vec<f64>, positions: Vec<f64>) -> Result<Self> {
        let state = Self { momenta, positions };
        state.validate()?;
        Ok(state)
    }

    pub fn validate(&self) -> Result<()> {
        if self.momenta.len() != self.positions.len() {
            return Err(ExperimentError::invalid(format!(
                "{} momenta but {} positions",
                self.momenta.len(),
                self.positions.len()
            )));
        }
        if self.momenta.len() < 2 {
            return Err(ExperimentError::invalid("a Toda chain needs at least two particles"));
        }
        if self.momenta.iter().chain(self.positions.iter()).any(|x| !x.is_finite()) {
            return Err(ExperimentError::invalid("Toda state contains non-finite values"));
        }
        Ok(())
    }

    pub fn n_particles(&self) -> usize {
        self.momenta.len()
    }

    /// a_i = exp((q_{i+1} - q_i) / 2)
    pub fn couplings(&self) -> Vec<f64> {
        self.positions
            .windows(2)
            .map(|w| (0.5 * (w[1] - w[0])).exp())
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct LaxPair {
    pub l0: DMatrix<f64>,
    pub b: DMatrix<f64>,
}

impl LaxPair {
    pub fn from_state(state: &TodaState) -> Result<Self> {
        state.validate()?;
        let n = state.n_particles();
        let a = state.couplings();

        let mut l0 = DMatrix::from_diagonal(&nalgebra::DVector::from_column_slice(&state.momenta));
        let mut b = DMatrix::zeros(n, n);
        for (i, &ai) in a.iter().enumerate() {
            l0[(i, i + 1)] = ai;
            l0[(i + 1, i)] = ai;
            b[(i, i + 1)] = -ai;
            b[(i + 1, i)] = ai;
        }

        Ok(Self { l0, b })
    }

    pub fn dim(&self) -> usize {
        self.l0.nrows()
    }

    /// L(t) = exp(tB) L0 exp(-tB).
    pub fn at(&self, t: f64) -> DMatrix<f64> {
        let u = (&self.b * t).exp();
        // B is skew-symmetric, so exp(-tB) = exp(tB)^T
        &u * &self.l0 * u.transpose()
    }
}

/// Spectrum of a symmetric matrix, largest first.
pub fn eigenvalues(l: &DMatrix<f64>) -> Vec<f64> {
    let mut values: Vec<f64> = l.clone().symmetric_eigen().eigenvalues.iter().copied().collect();
    values.sort_by(|a, b| b.total_cmp(a));
    values
}
