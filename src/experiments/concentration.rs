//! Concentration-of-measure experiments.
//!
//! Every experiment draws a Monte Carlo sample of one statistic, measures its
//! empirical tail on a grid and overlays the matching closed-form bound.

use rand::Rng;
use tracing::{debug, info};

use super::config::ExperimentParams;
use super::ExperimentReport;
use crate::bounds::{
    standard_normal_pdf, Chebyshev, ChiSquareChernoff, GaussianLipschitz, Hoeffding,
    SphericalCap, TailBound,
};
use crate::error::Result;
use crate::grid::linspace;
use crate::histogram::Histogram;
use crate::render::{plot_histogram, plot_tail_comparison, HistogramFigure, Series};
use crate::sampling::{
    BernoulliMean, ChiSquare, GaussianNorm, GaussianRadius, RademacherMean, SphereCoordinate,
    StatisticSampler,
};
use crate::tail::{
    compute_tail_curve, compute_upper_tail_curve, Sample, TailComparison, ThresholdGrid,
};

/// Success probability of the Bernoulli draws in the Chebyshev experiment.
const BERNOULLI_P: f64 = 0.5;
/// Resolution of reference density curves.
const PDF_POINTS: usize = 400;

/// Sample and tail comparison produced by one experiment.
#[derive(Clone, Debug)]
pub struct TailOutcome {
    pub comparison: TailComparison,
    pub sample: Sample,
    pub center: f64,
}

fn compare_tails<S, B, R>(
    title: String,
    sampler: &S,
    bound: &B,
    params: &ExperimentParams,
    rng: &mut R,
) -> Result<TailOutcome>
where
    S: StatisticSampler,
    B: TailBound,
    R: Rng + ?Sized,
{
    params.validate()?;
    let thresholds = ThresholdGrid::from_grid(&params.grid)?;
    let sample = sampler.sample(params.n_trials, rng);
    let center = sampler.center();
    let empirical = compute_tail_curve(&sample, &thresholds, center)?;
    let comparison = TailComparison::new(title, thresholds.to_vec(), empirical, bound)?;
    debug!(
        "{}: {} trials, center {:.4}, {} thresholds",
        comparison.title,
        sample.len(),
        center,
        thresholds.len()
    );
    Ok(TailOutcome { comparison, sample, center })
}

fn render_tail_report<B: TailBound>(
    name: &'static str,
    tag: &str,
    outcome: &TailOutcome,
    bound: &B,
    params: &ExperimentParams,
) -> Result<ExperimentReport> {
    plot_tail_comparison(&outcome.comparison, &params.output)?;
    info!("{}: wrote {}", name, params.output.display());

    let mut summary = Vec::new();
    if let Some(t0) = params.probe {
        let at = compute_tail_curve(&outcome.sample, &[t0], outcome.center)?;
        summary.push(format!(
            "[{}] For t={}, empirical={:.3e}, bound={:.3e}",
            tag,
            t0,
            at.probabilities[0],
            bound.evaluate(t0)
        ));
    }
    summary.push(format!(
        "[{}] Empirical tail above the bound at {} of {} grid points",
        tag,
        outcome.comparison.violations(0.0).len(),
        outcome.comparison.grid.len()
    ));

    Ok(ExperimentReport {
        name,
        artifacts: vec![params.output.clone()],
        summary,
    })
}

/// Mean of `sample_size` fair coin flips against Chebyshev's inequality.
pub fn chebyshev_tails<R: Rng + ?Sized>(params: &ExperimentParams, rng: &mut R) -> Result<TailOutcome> {
    let sampler = BernoulliMean::new(params.sample_size, BERNOULLI_P)?;
    let bound = Chebyshev { n: params.sample_size, p: BERNOULLI_P };
    compare_tails(
        "Chebyshev Inequality - Bernoulli Sample Mean".to_string(),
        &sampler,
        &bound,
        params,
        rng,
    )
}

pub fn run_chebyshev<R: Rng + ?Sized>(params: &ExperimentParams, rng: &mut R) -> Result<ExperimentReport> {
    let outcome = chebyshev_tails(params, rng)?;
    let bound = Chebyshev { n: params.sample_size, p: BERNOULLI_P };
    render_tail_report("chebyshev", "Chebyshev", &outcome, &bound, params)
}

/// Mean of `sample_size` Rademacher signs against Hoeffding's inequality.
pub fn hoeffding_tails<R: Rng + ?Sized>(params: &ExperimentParams, rng: &mut R) -> Result<TailOutcome> {
    let sampler = RademacherMean::new(params.sample_size)?;
    compare_tails(
        "Hoeffding Inequality - Rademacher Sample Mean".to_string(),
        &sampler,
        &Hoeffding::rademacher(params.sample_size),
        params,
        rng,
    )
}

pub fn run_hoeffding<R: Rng + ?Sized>(params: &ExperimentParams, rng: &mut R) -> Result<ExperimentReport> {
    let outcome = hoeffding_tails(params, rng)?;
    let bound = Hoeffding::rademacher(params.sample_size);
    let mut report = render_tail_report("hoeffding", "Hoeffding", &outcome, &bound, params)?;
    if let Some(median) = outcome.sample.median_abs_deviation(0.0) {
        report.summary.push(format!("[Hoeffding] Median of |S_n|: {:.3e}", median));
    }
    Ok(report)
}

/// Norm of a Gaussian vector in dimension `sample_size`, centred at sqrt(d).
pub fn gaussian_norm_tails<R: Rng + ?Sized>(params: &ExperimentParams, rng: &mut R) -> Result<TailOutcome> {
    let sampler = GaussianNorm::new(params.sample_size)?;
    compare_tails(
        format!("Gaussian Norm Concentration (d={})", params.sample_size),
        &sampler,
        &GaussianLipschitz::default(),
        params,
        rng,
    )
}

pub fn run_gaussian_norm<R: Rng + ?Sized>(params: &ExperimentParams, rng: &mut R) -> Result<ExperimentReport> {
    let outcome = gaussian_norm_tails(params, rng)?;
    let mut report = render_tail_report(
        "gaussian-norm",
        "Gaussian",
        &outcome,
        &GaussianLipschitz::default(),
        params,
    )?;
    if let Some(mean) = outcome.sample.mean() {
        report.summary.push(format!(
            "[Gaussian] Mean norm: {:.3}, sqrt(d): {:.3}",
            mean, outcome.center
        ));
    }
    Ok(report)
}

/// Scaled first coordinate of a uniform point on the sphere against the cap bound.
pub fn sphere_coordinate_tails<R: Rng + ?Sized>(
    params: &ExperimentParams,
    rng: &mut R,
) -> Result<TailOutcome> {
    let sampler = SphereCoordinate::new(params.sample_size)?;
    compare_tails(
        format!("Sphere Coordinate Concentration (d={})", params.sample_size),
        &sampler,
        &SphericalCap,
        params,
        rng,
    )
}

pub fn run_sphere_tail<R: Rng + ?Sized>(params: &ExperimentParams, rng: &mut R) -> Result<ExperimentReport> {
    let outcome = sphere_coordinate_tails(params, rng)?;
    render_tail_report("sphere-tail", "Sphere", &outcome, &SphericalCap, params)
}

/// Upper tail P(Z >= (1+δ)d) of a chi-square variable against the Chernoff bound.
///
/// The grid holds relative deviations δ; the probe, if any, is a δ as well.
pub fn chi_square_tails<R: Rng + ?Sized>(params: &ExperimentParams, rng: &mut R) -> Result<TailOutcome> {
    params.validate()?;
    let sampler = ChiSquare::new(params.sample_size)?;
    let d = sampler.center();
    let deltas = ThresholdGrid::from_grid(&params.grid)?;
    let levels: Vec<f64> = deltas.iter().map(|delta| (1.0 + delta) * d).collect();

    let sample = sampler.sample(params.n_trials, rng);
    let empirical = compute_upper_tail_curve(&sample, &levels)?;
    let comparison = TailComparison::new(
        format!("Chi-square Tail vs Chernoff Bound (d={})", params.sample_size),
        deltas.to_vec(),
        empirical,
        &ChiSquareChernoff { d: params.sample_size },
    )?
    .with_axis_labels("Relative deviation delta", "P(Z >= (1+delta)d)");

    Ok(TailOutcome { comparison, sample, center: d })
}

pub fn run_chi_square<R: Rng + ?Sized>(params: &ExperimentParams, rng: &mut R) -> Result<ExperimentReport> {
    let outcome = chi_square_tails(params, rng)?;
    let bound = ChiSquareChernoff { d: params.sample_size };
    plot_tail_comparison(&outcome.comparison, &params.output)?;
    info!("chi-square: wrote {}", params.output.display());

    let mut summary = Vec::new();
    if let Some(delta) = params.probe {
        let at = compute_upper_tail_curve(&outcome.sample, &[(1.0 + delta) * outcome.center])?;
        summary.push(format!(
            "[Chernoff] For delta={}, empirical={:.3e}, bound={:.3e}",
            delta,
            at.probabilities[0],
            bound.evaluate(delta)
        ));
    }
    summary.push(format!(
        "[Chernoff] Empirical tail above the bound at {} of {} grid points",
        outcome.comparison.violations(0.0).len(),
        outcome.comparison.grid.len()
    ));

    Ok(ExperimentReport {
        name: "chi-square",
        artifacts: vec![params.output.clone()],
        summary,
    })
}

fn histogram_of<S, R>(sampler: &S, params: &ExperimentParams, rng: &mut R) -> Result<(Histogram, Sample)>
where
    S: StatisticSampler,
    R: Rng + ?Sized,
{
    params.validate()?;
    let sample = sampler.sample(params.n_trials, rng);
    let grid = params.grid;
    let hist = Histogram::from_sample(&sample, grid.resolution, grid.lower, grid.upper)?;
    debug!(
        "histogram: {} binned, {} outside [{}, {}]",
        hist.total_visits, hist.outside, grid.lower, grid.upper
    );
    Ok((hist, sample))
}

/// Histogram of sqrt(d)·X₁ for X uniform on S^{d-1}; the grid gives range and bin count.
pub fn sphere_coordinate_histogram<R: Rng + ?Sized>(
    params: &ExperimentParams,
    rng: &mut R,
) -> Result<(Histogram, Sample)> {
    histogram_of(&SphereCoordinate::new(params.sample_size)?, params, rng)
}

pub fn run_sphere_coordinate<R: Rng + ?Sized>(
    params: &ExperimentParams,
    rng: &mut R,
) -> Result<ExperimentReport> {
    let (hist, sample) = sphere_coordinate_histogram(params, rng)?;
    let xs = linspace(params.grid.lower, params.grid.upper, PDF_POINTS);
    let pdf: Vec<f64> = xs.iter().map(|&x| standard_normal_pdf(x)).collect();

    plot_histogram(
        &HistogramFigure {
            title: "First coordinate sqrt(d) X_1 vs N(0,1)",
            x_label: "sqrt(d) X_1",
            histogram: &hist,
            overlay: Some(Series::new("N(0,1) density", &xs, &pdf)),
            marker: None,
        },
        &params.output,
    )?;
    info!("sphere-coordinate: wrote {}", params.output.display());

    let second_moment = sample.iter().map(|x| x * x).sum::<f64>() / sample.len() as f64;
    Ok(ExperimentReport {
        name: "sphere-coordinate",
        artifacts: vec![params.output.clone()],
        summary: vec![format!(
            "[Sphere] d={}, mean of sqrt(d) X_1: {:.3e}, second moment: {:.3} (N(0,1): 1)",
            params.sample_size,
            sample.mean().unwrap_or(f64::NAN),
            second_moment
        )],
    })
}

/// Histogram of |g| / sqrt(d) for a standard Gaussian vector g.
pub fn gaussian_radius_histogram<R: Rng + ?Sized>(
    params: &ExperimentParams,
    rng: &mut R,
) -> Result<(Histogram, Sample)> {
    histogram_of(&GaussianRadius::new(params.sample_size)?, params, rng)
}

pub fn run_gaussian_radius<R: Rng + ?Sized>(
    params: &ExperimentParams,
    rng: &mut R,
) -> Result<ExperimentReport> {
    let (hist, sample) = gaussian_radius_histogram(params, rng)?;

    plot_histogram(
        &HistogramFigure {
            title: "Radius of a d-dimensional Gaussian / sqrt(d)",
            x_label: "|g|_2 / sqrt(d)",
            histogram: &hist,
            overlay: None,
            marker: Some(1.0),
        },
        &params.output,
    )?;
    info!("gaussian-radius: wrote {}", params.output.display());

    Ok(ExperimentReport {
        name: "gaussian-radius",
        artifacts: vec![params.output.clone()],
        summary: vec![format!(
            "[Radius] d={}, mean of |g|/sqrt(d): {:.3}, median |deviation from 1|: {:.3e}",
            params.sample_size,
            sample.mean().unwrap_or(f64::NAN),
            sample.median_abs_deviation(1.0).unwrap_or(f64::NAN)
        )],
    })
}
