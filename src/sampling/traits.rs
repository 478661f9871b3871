//! Traits for Monte Carlo statistic sampling.

use rand::Rng;

use crate::tail::Sample;

/// A real-valued statistic that can be drawn repeatedly.
pub trait StatisticSampler {
    /// Draw one realisation of the statistic.
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;

    /// Reference value deviations are measured from.
    fn center(&self) -> f64;

    /// Draw `n_trials` independent realisations.
    fn sample<R: Rng + ?Sized>(&self, n_trials: usize, rng: &mut R) -> Sample {
        (0..n_trials).map(|_| self.draw(rng)).collect()
    }
}
