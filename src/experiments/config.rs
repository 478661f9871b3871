//! Parameters of every experiment.
//!
//! The defaults reproduce the constants of the reference experiments: sample
//! sizes, dimensions, grid ranges and output file names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, Result};
use crate::grid::GridSpec;
use crate::toda::{LaxFlow, TodaState};

/// Parameters of a Monte Carlo experiment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentParams {
    /// Draws per statistic (n) or dimension (d), depending on the experiment
    pub sample_size: usize,
    /// Number of independent realisations of the statistic
    pub n_trials: usize,
    /// Threshold grid, or histogram range and bin count
    pub grid: GridSpec,
    pub output: PathBuf,
    /// Single threshold reported in the summary
    #[serde(default)]
    pub probe: Option<f64>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ExperimentParams {
    pub fn new(sample_size: usize, n_trials: usize, grid: GridSpec, output: impl Into<PathBuf>) -> Self {
        Self {
            sample_size,
            n_trials,
            grid,
            output: output.into(),
            probe: None,
            seed: None,
        }
    }

    pub fn with_probe(mut self, t: f64) -> Self {
        self.probe = Some(t);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(ExperimentError::invalid("sample_size must be positive"));
        }
        if self.n_trials == 0 {
            return Err(ExperimentError::invalid("n_trials must be positive"));
        }
        if let Some(t) = self.probe {
            if !(t.is_finite() && t >= 0.0) {
                return Err(ExperimentError::invalid(format!("probe threshold {} is invalid", t)));
            }
        }
        self.grid.validate()
    }
}

/// Parameters of a Toda lattice scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodaParams {
    pub momenta: Vec<f64>,
    pub positions: Vec<f64>,
    pub t_end: f64,
    pub n_steps: usize,
    #[serde(default)]
    pub flow: LaxFlow,
    pub output: PathBuf,
}

impl TodaParams {
    pub fn state(&self) -> Result<TodaState> {
        TodaState::new(self.momenta.clone(), self.positions.clone())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.t_end.is_finite() && self.t_end > 0.0) {
            return Err(ExperimentError::invalid(format!("t_end {} must be positive", self.t_end)));
        }
        if self.n_steps < 2 {
            return Err(ExperimentError::invalid("n_steps must be at least 2"));
        }
        self.state().map(|_| ())
    }

    pub fn time_grid(&self) -> Result<Vec<f64>> {
        self.validate()?;
        GridSpec::new(0.0, self.t_end, self.n_steps).points()
    }
}

/// Configuration of every experiment, one entry each.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    pub chebyshev: ExperimentParams,
    pub hoeffding: ExperimentParams,
    pub gaussian_norm: ExperimentParams,
    pub sphere_coordinate: ExperimentParams,
    pub sphere_tail: ExperimentParams,
    pub gaussian_radius: ExperimentParams,
    pub chi_square: ExperimentParams,
    pub toda_lax: TodaParams,
    pub toda_tau: TodaParams,
    pub toda_three: TodaParams,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        let two_particle = |n_steps: usize, output: &str| TodaParams {
            momenta: vec![1.0, -1.0],
            positions: vec![0.0, 1.0],
            t_end: 10.0,
            n_steps,
            flow: LaxFlow::Conjugation,
            output: PathBuf::from(output),
        };

        Self {
            chebyshev: ExperimentParams::new(
                100,
                50_000,
                GridSpec::new(0.02, 0.25, 50),
                "plots/chebyshev_inequality.svg",
            )
            .with_probe(0.1),
            hoeffding: ExperimentParams::new(
                100,
                50_000,
                GridSpec::new(0.02, 0.5, 60),
                "plots/hoeffding_ineq.svg",
            ),
            gaussian_norm: ExperimentParams::new(
                500,
                40_000,
                GridSpec::new(0.05, 5.0, 80),
                "plots/gaussian_norm_concentration.svg",
            ),
            sphere_coordinate: ExperimentParams::new(
                10,
                100_000,
                GridSpec::new(-4.0, 4.0, 60),
                "plots/first_coord.svg",
            ),
            sphere_tail: ExperimentParams::new(
                10,
                100_000,
                GridSpec::new(0.05, 4.0, 80),
                "plots/sphere_coordinate_tail.svg",
            ),
            gaussian_radius: ExperimentParams::new(
                10,
                100_000,
                GridSpec::new(0.0, 2.5, 50),
                "plots/gaussian_radius.svg",
            ),
            chi_square: ExperimentParams::new(
                20,
                100_000,
                GridSpec::new(0.1, 3.0, 40),
                "plots/chi_square_chernoff.svg",
            ),
            toda_lax: two_particle(500, "plots/toda_two_particle.svg"),
            toda_tau: two_particle(500, "plots/toda_tau_positions.svg"),
            toda_three: TodaParams {
                momenta: vec![1.0, 0.0, -1.0],
                positions: vec![0.0, 1.0, 2.0],
                t_end: 10.0,
                n_steps: 300,
                flow: LaxFlow::Conjugation,
                output: PathBuf::from("plots/toda_three_particle.svg"),
            },
        }
    }
}

fn relocate(output: &mut PathBuf, dir: &Path) {
    let file_name = output.file_name().map(PathBuf::from).unwrap_or_default();
    *output = dir.join(file_name);
}

impl ExperimentConfig {
    fn monte_carlo_mut(&mut self) -> [&mut ExperimentParams; 7] {
        [
            &mut self.chebyshev,
            &mut self.hoeffding,
            &mut self.gaussian_norm,
            &mut self.sphere_coordinate,
            &mut self.sphere_tail,
            &mut self.gaussian_radius,
            &mut self.chi_square,
        ]
    }

    /// Keep every artifact's file name but write it under `dir`.
    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        for params in self.monte_carlo_mut() {
            relocate(&mut params.output, dir);
        }
        for params in [&mut self.toda_lax, &mut self.toda_tau, &mut self.toda_three] {
            relocate(&mut params.output, dir);
        }
        self
    }

    /// Seed every Monte Carlo experiment.
    pub fn with_seed(mut self, seed: u64) -> Self {
        for params in self.monte_carlo_mut() {
            params.seed = Some(seed);
        }
        self
    }
}
