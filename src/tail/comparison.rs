//! Empirical tail curve paired with a theoretical bound on the same grid.

use crate::bounds::TailBound;
use crate::error::{ExperimentError, Result};

use super::comparator::TailCurve;

#[derive(Clone, Debug)]
pub struct TailComparison {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// x-axis values; equal to the curve thresholds except for relative grids
    pub grid: Vec<f64>,
    pub empirical: TailCurve,
    pub bound: Vec<f64>,
    pub bound_label: String,
}

impl TailComparison {
    pub fn new<B: TailBound>(
        title: impl Into<String>,
        grid: Vec<f64>,
        empirical: TailCurve,
        bound: &B,
    ) -> Result<Self> {
        if grid.len() != empirical.len() {
            return Err(ExperimentError::invalid(format!(
                "grid has {} points but the tail curve has {}",
                grid.len(),
                empirical.len()
            )));
        }
        let values = bound.evaluate_grid(&grid);
        Ok(Self {
            title: title.into(),
            x_label: "Deviation t".to_string(),
            y_label: "Tail probability P(|X-mu| >= t)".to_string(),
            grid,
            empirical,
            bound: values,
            bound_label: bound.label().to_string(),
        })
    }

    pub fn with_axis_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    /// Grid indices where the empirical probability exceeds the bound by more than `tolerance`.
    pub fn violations(&self, tolerance: f64) -> Vec<usize> {
        self.empirical
            .probabilities
            .iter()
            .zip(self.bound.iter())
            .enumerate()
            .filter(|(_, (&p, &b))| p > b + tolerance)
            .map(|(i, _)| i)
            .collect()
    }

    /// Smallest ratio bound / empirical over points with non-zero empirical mass.
    pub fn tightest_ratio(&self) -> Option<f64> {
        self.empirical
            .probabilities
            .iter()
            .zip(self.bound.iter())
            .filter(|(&p, _)| p > 0.0)
            .map(|(&p, &b)| b / p)
            .min_by(f64::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::GaussianLipschitz;
    use crate::tail::compute_tail_curve;

    #[test]
    fn test_violations_detects_exceedance() {
        let sample = [0.0, 5.0, 5.0, 5.0];
        let grid = vec![0.0, 3.0, 4.0];
        let curve = compute_tail_curve(&sample, &grid, 0.0).unwrap();
        let cmp = TailComparison::new("test", grid, curve, &GaussianLipschitz::default()).unwrap();
        // 0.75 at t=3 and t=4 is far above 2exp(-4.5) and 2exp(-8)
        assert_eq!(cmp.violations(0.0), vec![1, 2]);
        assert!(cmp.tightest_ratio().unwrap() < 1.0);
    }

    #[test]
    fn test_grid_length_mismatch() {
        let curve = compute_tail_curve(&[1.0], &[0.0, 0.5], 0.0).unwrap();
        assert!(TailComparison::new("x", vec![0.0], curve, &GaussianLipschitz::default()).is_err());
    }
}
