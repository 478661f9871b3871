//! Fixed-range histograms with density normalisation.

use crate::error::{ExperimentError, Result};

#[derive(Debug, Clone)]
pub struct Histogram {
    pub bins: Vec<usize>,
    pub min: f64,
    pub max: f64,
    pub bin_width: f64,
    /// Samples that fell inside [min, max]
    pub total_visits: usize,
    /// Samples outside [min, max] (not binned)
    pub outside: usize,
}

impl Histogram {
    pub fn new(bins: usize, min: f64, max: f64) -> Result<Self> {
        if bins == 0 {
            return Err(ExperimentError::invalid("histogram needs at least one bin"));
        }
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(ExperimentError::invalid(format!(
                "invalid histogram range [{}, {}]",
                min, max
            )));
        }
        Ok(Self {
            bins: vec![0; bins],
            min,
            max,
            bin_width: (max - min) / bins as f64,
            total_visits: 0,
            outside: 0,
        })
    }

    /// Bin a whole sample over [min, max].
    pub fn from_sample(sample: &[f64], bins: usize, min: f64, max: f64) -> Result<Self> {
        let mut hist = Self::new(bins, min, max)?;
        sample.iter().for_each(|&x| hist.record(x));
        Ok(hist)
    }

    /// `None` when `value` lies outside the range; `max` goes to the last bin.
    pub fn value_to_bin(&self, value: f64) -> Option<usize> {
        if !(self.min..=self.max).contains(&value) {
            return None;
        }
        let i = ((value - self.min) / self.bin_width) as usize;
        Some(i.min(self.bins.len() - 1))
    }

    pub fn record(&mut self, value: f64) {
        match self.value_to_bin(value) {
            Some(bin) => {
                self.bins[bin] += 1;
                self.total_visits += 1;
            }
            None => self.outside += 1,
        }
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        self.min + (bin as f64 + 0.5) * self.bin_width
    }

    pub fn bin_edges(&self, bin: usize) -> (f64, f64) {
        let left = self.min + bin as f64 * self.bin_width;
        (left, left + self.bin_width)
    }

    /// Per-bin density so that the in-range histogram integrates to one.
    pub fn density(&self) -> Vec<f64> {
        if self.total_visits == 0 {
            return vec![0.0; self.bins.len()];
        }
        let norm = self.total_visits as f64 * self.bin_width;
        self.bins.iter().map(|&c| c as f64 / norm).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_binning_and_edges() {
        let hist = Histogram::from_sample(&[0.0, 0.1, 0.5, 0.99, 1.0, 1.5, -0.2], 4, 0.0, 1.0).unwrap();
        assert_eq!(hist.bins, vec![2, 0, 1, 2]);
        assert_eq!(hist.total_visits, 5);
        assert_eq!(hist.outside, 2);
        assert_relative_eq!(hist.bin_center(0), 0.125, epsilon = 1e-12);
        assert_eq!(hist.bin_edges(3), (0.75, 1.0));
    }

    #[test]
    fn test_density_integrates_to_one() {
        let sample: Vec<f64> = (0..1000).map(|i| (i as f64 / 1000.0).powi(2) * 4.0 - 2.0).collect();
        let hist = Histogram::from_sample(&sample, 37, -2.0, 2.0).unwrap();
        let integral: f64 = hist.density().iter().map(|d| d * hist.bin_width).sum();
        assert_relative_eq!(integral, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_histograms() {
        assert!(Histogram::new(0, 0.0, 1.0).is_err());
        assert!(Histogram::new(10, 1.0, 1.0).is_err());
        let mut hist = Histogram::new(3, 0.0, 3.0).unwrap();
        assert_eq!(hist.density(), vec![0.0; 3]);
        hist.record(1.5);
        hist.record(7.0);
        assert_eq!(hist.total_visits, 1);
        assert_eq!(hist.outside, 1);
    }
}
