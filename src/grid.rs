//! Evenly spaced grids used for thresholds, time axes and histogram ranges.

use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, Result};

/// `n` evenly spaced points from `start` to `end`, both endpoints included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // keep the right endpoint exact
            points[n - 1] = end;
            points
        }
    }
}

/// Lower/upper bounds and number of points of a grid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSpec {
    pub lower: f64,
    pub upper: f64,
    pub resolution: usize,
}

impl GridSpec {
    pub fn new(lower: f64, upper: f64, resolution: usize) -> Self {
        Self { lower, upper, resolution }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(ExperimentError::invalid(format!(
                "grid bounds must be finite, got [{}, {}]",
                self.lower, self.upper
            )));
        }
        if self.resolution == 0 {
            return Err(ExperimentError::invalid("grid resolution must be positive"));
        }
        if self.resolution > 1 && self.lower >= self.upper {
            return Err(ExperimentError::invalid(format!(
                "grid lower bound {} must be below upper bound {}",
                self.lower, self.upper
            )));
        }
        Ok(())
    }

    pub fn points(&self) -> Result<Vec<f64>> {
        self.validate()?;
        Ok(linspace(self.lower, self.upper, self.resolution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(0.02, 0.25, 50);
        assert_eq!(xs.len(), 50);
        assert_eq!(xs[0], 0.02);
        assert_eq!(xs[49], 0.25);
        for w in xs.windows(2) {
            assert_relative_eq!(w[1] - w[0], 0.23 / 49.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_linspace_degenerate() {
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }

    #[test]
    fn test_grid_spec_rejects_bad_bounds() {
        assert!(GridSpec::new(1.0, 0.0, 10).points().is_err());
        assert!(GridSpec::new(0.0, 1.0, 0).points().is_err());
        assert!(GridSpec::new(f64::NAN, 1.0, 3).points().is_err());
        assert_eq!(GridSpec::new(0.0, 1.0, 3).points().unwrap(), vec![0.0, 0.5, 1.0]);
    }
}
