//! Rust NumExp - numerical experiments on concentration of measure and
//! integrable lattices.
//!
//! The crate compares Monte Carlo tail probabilities with closed-form
//! concentration bounds (Chebyshev, Hoeffding, Gaussian Lipschitz, spherical
//! cap, chi-square Chernoff) and evolves small open Toda chains through their
//! Lax pair. Every experiment writes an SVG figure and returns a short report.

pub mod error;
pub mod grid;
pub mod bounds;
pub mod tail;
pub mod sampling;
pub mod histogram;
pub mod toda;
pub mod render;
pub mod experiments;
pub mod io;

// Re-export commonly used types at crate root
pub use error::{ExperimentError, Result};
pub use grid::{linspace, GridSpec};
pub use bounds::{Chebyshev, ChiSquareChernoff, GaussianLipschitz, Hoeffding, SphericalCap, TailBound};
pub use tail::{compute_tail_curve, compute_upper_tail_curve, Sample, TailComparison, TailCurve, ThresholdGrid};
pub use sampling::StatisticSampler;
pub use histogram::Histogram;
pub use toda::{evolve, LaxFlow, LaxPair, LaxTrajectory, TodaState, TwoParticleTau};
pub use experiments::{
    make_rng, run_all, run_experiment, Experiment, ExperimentConfig, ExperimentParams,
    ExperimentReport, TodaParams,
};
pub use io::{read_experiment_config, parse_experiment_config};
