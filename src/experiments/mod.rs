//! Experiments module - one runnable function per scenario plus a dispatcher.

mod concentration;
mod config;
mod lattice;

use std::fmt;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::error::Result;

pub use concentration::{
    chebyshev_tails, chi_square_tails, gaussian_norm_tails, gaussian_radius_histogram,
    hoeffding_tails, run_chebyshev, run_chi_square, run_gaussian_norm, run_gaussian_radius,
    run_hoeffding, run_sphere_coordinate, run_sphere_tail, sphere_coordinate_histogram,
    sphere_coordinate_tails, TailOutcome,
};
pub use config::{ExperimentConfig, ExperimentParams, TodaParams};
pub use lattice::{compute_lax_trajectory, run_toda_lax, run_toda_tau, run_toda_three};

/// Every runnable scenario.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Experiment {
    Chebyshev,
    Hoeffding,
    GaussianNorm,
    SphereCoordinate,
    SphereTail,
    GaussianRadius,
    ChiSquare,
    TodaLax,
    TodaTau,
    TodaThree,
}

impl Experiment {
    pub const ALL: [Experiment; 10] = [
        Experiment::Chebyshev,
        Experiment::Hoeffding,
        Experiment::GaussianNorm,
        Experiment::SphereCoordinate,
        Experiment::SphereTail,
        Experiment::GaussianRadius,
        Experiment::ChiSquare,
        Experiment::TodaLax,
        Experiment::TodaTau,
        Experiment::TodaThree,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Experiment::Chebyshev => "chebyshev",
            Experiment::Hoeffding => "hoeffding",
            Experiment::GaussianNorm => "gaussian-norm",
            Experiment::SphereCoordinate => "sphere-coordinate",
            Experiment::SphereTail => "sphere-tail",
            Experiment::GaussianRadius => "gaussian-radius",
            Experiment::ChiSquare => "chi-square",
            Experiment::TodaLax => "toda-lax",
            Experiment::TodaTau => "toda-tau",
            Experiment::TodaThree => "toda-three",
        }
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one experiment.
#[derive(Clone, Debug)]
pub struct ExperimentReport {
    pub name: &'static str,
    /// Files written
    pub artifacts: Vec<PathBuf>,
    /// Human-readable result lines
    pub summary: Vec<String>,
}

/// Seeded generator when `seed` is set, entropy-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run a single experiment with its own generator.
pub fn run_experiment(experiment: Experiment, config: &ExperimentConfig) -> Result<ExperimentReport> {
    info!("Running experiment {}", experiment);
    let rng = |params: &ExperimentParams| make_rng(params.seed);
    match experiment {
        Experiment::Chebyshev => run_chebyshev(&config.chebyshev, &mut rng(&config.chebyshev)),
        Experiment::Hoeffding => run_hoeffding(&config.hoeffding, &mut rng(&config.hoeffding)),
        Experiment::GaussianNorm => {
            run_gaussian_norm(&config.gaussian_norm, &mut rng(&config.gaussian_norm))
        }
        Experiment::SphereCoordinate => run_sphere_coordinate(
            &config.sphere_coordinate,
            &mut rng(&config.sphere_coordinate),
        ),
        Experiment::SphereTail => run_sphere_tail(&config.sphere_tail, &mut rng(&config.sphere_tail)),
        Experiment::GaussianRadius => {
            run_gaussian_radius(&config.gaussian_radius, &mut rng(&config.gaussian_radius))
        }
        Experiment::ChiSquare => run_chi_square(&config.chi_square, &mut rng(&config.chi_square)),
        Experiment::TodaLax => run_toda_lax(&config.toda_lax),
        Experiment::TodaTau => run_toda_tau(&config.toda_tau),
        Experiment::TodaThree => run_toda_three(&config.toda_three),
    }
}

/// Run `experiments` in order, handing each report to `on_report` as soon as
/// it is ready. Stops at the first failure; earlier reports have already been
/// delivered by then.
pub fn run_all<F>(
    experiments: &[Experiment],
    config: &ExperimentConfig,
    mut on_report: F,
) -> Result<Vec<ExperimentReport>>
where
    F: FnMut(&ExperimentReport),
{
    let mut reports = Vec::with_capacity(experiments.len());
    for &experiment in experiments {
        let report = run_experiment(experiment, config)?;
        on_report(&report);
        reports.push(report);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSpec;
    use clap::ValueEnum;
    use rand::Rng;

    fn quick_config(dir: &std::path::Path) -> ExperimentConfig {
        let mut config = ExperimentConfig::default().with_output_dir(dir).with_seed(42);
        for params in [
            &mut config.chebyshev,
            &mut config.hoeffding,
            &mut config.gaussian_norm,
            &mut config.sphere_coordinate,
            &mut config.sphere_tail,
            &mut config.gaussian_radius,
            &mut config.chi_square,
        ] {
            params.n_trials = 500;
        }
        config.gaussian_norm.sample_size = 20;
        for params in [&mut config.toda_lax, &mut config.toda_tau, &mut config.toda_three] {
            params.n_steps = 30;
        }
        config
    }

    #[test]
    fn test_names_match_cli_values() {
        for experiment in Experiment::ALL {
            let value = experiment.to_possible_value().unwrap();
            assert_eq!(value.get_name(), experiment.name());
            assert_eq!(Experiment::from_str(experiment.name(), false).unwrap(), experiment);
        }
        assert_eq!(Experiment::value_variants().len(), Experiment::ALL.len());
    }

    #[test]
    fn test_make_rng_is_reproducible() {
        let a: Vec<u32> = (0..4).map({
            let mut rng = make_rng(Some(7));
            move |_| rng.gen()
        }).collect();
        let b: Vec<u32> = (0..4).map({
            let mut rng = make_rng(Some(7));
            move |_| rng.gen()
        }).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let config = quick_config(dir.path());
        let first = run_experiment(Experiment::Hoeffding, &config).unwrap();
        let second = run_experiment(Experiment::Hoeffding, &config).unwrap();
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn test_run_all_writes_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = quick_config(dir.path());
        let mut delivered = Vec::new();
        let reports = run_all(&Experiment::ALL, &config, |r| delivered.push(r.name)).unwrap();
        assert_eq!(delivered, Experiment::ALL.map(Experiment::name).to_vec());
        assert_eq!(reports.len(), Experiment::ALL.len());
        for (report, experiment) in reports.iter().zip(Experiment::ALL) {
            assert_eq!(report.name, experiment.name());
            assert!(!report.summary.is_empty());
            for artifact in &report.artifacts {
                assert!(artifact.starts_with(dir.path()));
                assert!(artifact.exists(), "{} missing", artifact.display());
            }
        }
    }

    #[test]
    fn test_run_all_stops_on_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = quick_config(dir.path());
        config.hoeffding.grid = GridSpec::new(0.5, 0.1, 10);
        let mut delivered = Vec::new();
        let result = run_all(
            &[Experiment::Chebyshev, Experiment::Hoeffding, Experiment::TodaLax],
            &config,
            |r| delivered.push(r.summary.clone()),
        );
        assert!(result.is_err());
        // the experiment before the failure was still reported
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0][0].starts_with("[Chebyshev] For t=0.1"));
    }
}
