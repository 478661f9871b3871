//! Sampling module - Monte Carlo samplers for concentration experiments.

mod traits;
mod statistics;

pub use traits::StatisticSampler;
pub use statistics::{
    gaussian_vector, sample_sphere_point, BernoulliMean, ChiSquare, GaussianNorm, GaussianRadius,
    RademacherMean, SphereCoordinate,
};
