//! Empirical tail probabilities of a Monte Carlo sample.
//!
//! The comparator sorts the absolute deviations once and answers every
//! threshold with a binary search, so a grid of `m` thresholds over `n`
//! samples costs `O((n + m) log n)`.

use std::ops::Deref;

use crate::error::{ExperimentError, Result};
use crate::grid::GridSpec;

/// Output of one Monte Carlo batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sample(Vec<f64>);

impl Sample {
    pub fn mean(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.iter().sum::<f64>() / self.0.len() as f64)
    }

    /// Median of `|x - center|` over the sample.
    pub fn median_abs_deviation(&self, center: f64) -> Option<f64> {
        let deviations = sorted_deviations(&self.0, center).ok()?;
        let n = deviations.len();
        if n % 2 == 1 {
            Some(deviations[n / 2])
        } else {
            Some(0.5 * (deviations[n / 2 - 1] + deviations[n / 2]))
        }
    }
}

impl Deref for Sample {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl FromIterator<f64> for Sample {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Strictly increasing, non-negative deviation thresholds.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdGrid(Vec<f64>);

impl ThresholdGrid {
    pub fn new(thresholds: Vec<f64>) -> Result<Self> {
        validate_thresholds(&thresholds)?;
        Ok(Self(thresholds))
    }

    pub fn from_grid(grid: &GridSpec) -> Result<Self> {
        Self::new(grid.points()?)
    }
}

impl Deref for ThresholdGrid {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Empirical probability per threshold, non-increasing in the threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct TailCurve {
    pub thresholds: Vec<f64>,
    pub probabilities: Vec<f64>,
}

impl TailCurve {
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.thresholds.iter().copied().zip(self.probabilities.iter().copied())
    }
}

fn validate_thresholds(thresholds: &[f64]) -> Result<()> {
    validate_levels(thresholds)?;
    if let Some(t) = thresholds.iter().find(|&&t| t < 0.0) {
        return Err(ExperimentError::invalid(format!(
            "deviation thresholds must be non-negative, got {}",
            t
        )));
    }
    Ok(())
}

fn validate_levels(levels: &[f64]) -> Result<()> {
    if levels.is_empty() {
        return Err(ExperimentError::invalid("threshold grid is empty"));
    }
    if let Some(t) = levels.iter().find(|t| !t.is_finite()) {
        return Err(ExperimentError::invalid(format!("threshold {} is not finite", t)));
    }
    if levels.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ExperimentError::invalid(
            "thresholds must be strictly increasing",
        ));
    }
    Ok(())
}

fn validate_sample(sample: &[f64]) -> Result<()> {
    if sample.is_empty() {
        return Err(ExperimentError::invalid("sample is empty"));
    }
    if let Some(x) = sample.iter().find(|x| !x.is_finite()) {
        return Err(ExperimentError::invalid(format!("sample contains {}", x)));
    }
    Ok(())
}

fn sorted_deviations(sample: &[f64], center: f64) -> Result<Vec<f64>> {
    validate_sample(sample)?;
    if !center.is_finite() {
        return Err(ExperimentError::invalid(format!("center {} is not finite", center)));
    }
    let mut deviations: Vec<f64> = sample.iter().map(|&x| (x - center).abs()).collect();
    deviations.sort_by(f64::total_cmp);
    Ok(deviations)
}

/// Fraction of `sample` with `|x - center| >= t`, for every `t` in `thresholds`.
pub fn compute_tail_curve(sample: &[f64], thresholds: &[f64], center: f64) -> Result<TailCurve> {
    validate_thresholds(thresholds)?;
    let deviations = sorted_deviations(sample, center)?;
    let n = deviations.len() as f64;

    let probabilities = thresholds
        .iter()
        .map(|&t| {
            let below = deviations.partition_point(|&dev| dev < t);
            (deviations.len() - below) as f64 / n
        })
        .collect();

    Ok(TailCurve {
        thresholds: thresholds.to_vec(),
        probabilities,
    })
}

/// One-sided variant: fraction of `sample` with `x >= level` for every level.
///
/// Levels only need to be finite and strictly increasing.
pub fn compute_upper_tail_curve(sample: &[f64], levels: &[f64]) -> Result<TailCurve> {
    validate_levels(levels)?;
    validate_sample(sample)?;
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;

    let probabilities = levels
        .iter()
        .map(|&level| {
            let below = sorted.partition_point(|&x| x < level);
            (sorted.len() - below) as f64 / n
        })
        .collect();

    Ok(TailCurve {
        thresholds: levels.to_vec(),
        probabilities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    #[test]
    fn test_tail_curve_concrete_scenario() {
        let sample = [0.0, 0.0, 0.0, 0.0, 2.0, 2.0];
        let curve = compute_tail_curve(&sample, &[0.0, 1.0, 2.0, 3.0], 0.0).unwrap();
        assert_eq!(curve.len(), 4);
        assert_eq!(curve.probabilities[0], 1.0);
        assert_relative_eq!(curve.probabilities[1], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(curve.probabilities[2], 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(curve.probabilities[3], 0.0);
    }

    #[test]
    fn test_tail_curve_empty_sample() {
        let err = compute_tail_curve(&[], &[0.0, 1.0], 0.0).unwrap_err();
        assert!(matches!(err, ExperimentError::InvalidInput(_)));
    }

    #[test]
    fn test_tail_curve_negative_threshold() {
        let err = compute_tail_curve(&[1.0, 2.0], &[-1.0, 0.0, 1.0], 0.0).unwrap_err();
        assert!(matches!(err, ExperimentError::InvalidInput(_)));
    }

    #[test]
    fn test_tail_curve_unsorted_thresholds() {
        let err = compute_tail_curve(&[1.0, 2.0], &[1.0, 0.5], 0.0).unwrap_err();
        assert!(matches!(err, ExperimentError::InvalidInput(_)));
        assert!(compute_tail_curve(&[1.0], &[], 0.0).is_err());
        assert!(compute_tail_curve(&[1.0], &[0.0], f64::NAN).is_err());
        assert!(compute_tail_curve(&[f64::INFINITY], &[0.0], 0.0).is_err());
    }

    #[test]
    fn test_tail_curve_bounds_and_monotonicity() {
        let mut rng = StdRng::seed_from_u64(7);
        let normal = Normal::new(0.3, 2.0).unwrap();
        let sample: Vec<f64> = (0..5_000).map(|_| normal.sample(&mut rng)).collect();
        let thresholds = crate::grid::linspace(0.0, 12.0, 200);

        let curve = compute_tail_curve(&sample, &thresholds, 0.3).unwrap();
        assert_eq!(curve.probabilities[0], 1.0);
        assert!(curve.probabilities.iter().all(|&p| (0.0..=1.0).contains(&p)));
        for w in curve.probabilities.windows(2) {
            assert!(w[0] >= w[1]);
        }
        // far beyond the largest deviation
        assert_eq!(*curve.probabilities.last().unwrap(), 0.0);
    }

    #[test]
    fn test_tail_curve_matches_direct_count() {
        let sample = [0.5, -1.5, 2.0, 0.1, -0.7, 3.3, 1.0];
        let thresholds = [0.0, 0.4, 1.0, 1.5, 2.5];
        let curve = compute_tail_curve(&sample, &thresholds, 0.5).unwrap();
        for (t, p) in curve.iter() {
            let direct = sample.iter().filter(|&&x| (x - 0.5).abs() >= t).count() as f64
                / sample.len() as f64;
            assert_relative_eq!(p, direct, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_upper_tail_curve() {
        let sample = [1.0, 2.0, 3.0, 4.0];
        let curve = compute_upper_tail_curve(&sample, &[-1.0, 2.0, 2.5, 4.0, 5.0]).unwrap();
        assert_eq!(curve.probabilities, vec![1.0, 0.75, 0.5, 0.25, 0.0]);
        assert!(compute_upper_tail_curve(&[], &[1.0]).is_err());
    }

    #[test]
    fn test_threshold_grid_validation() {
        assert!(ThresholdGrid::new(vec![0.0, 0.1, 0.2]).is_ok());
        assert!(ThresholdGrid::new(vec![0.0, 0.0]).is_err());
        assert!(ThresholdGrid::new(vec![-0.1, 0.2]).is_err());
        let grid = ThresholdGrid::from_grid(&GridSpec::new(0.0, 1.0, 5)).unwrap();
        assert_eq!(grid.len(), 5);
    }

    #[test]
    fn test_sample_statistics() {
        let sample = [-3.0, 1.0, 2.0, -0.5].into_iter().collect::<Sample>();
        assert_relative_eq!(sample.mean().unwrap(), -0.125, epsilon = 1e-12);
        // |x| sorted: 0.5, 1, 2, 3
        assert_relative_eq!(sample.median_abs_deviation(0.0).unwrap(), 1.5, epsilon = 1e-12);
        assert!(Sample::default().mean().is_none());
    }
}
