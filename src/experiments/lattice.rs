//! Toda lattice scenes: Lax matrix evolution and tau-function positions.

use tracing::info;

use super::config::TodaParams;
use super::ExperimentReport;
use crate::error::Result;
use crate::render::{plot_panels, Panel, Series};
use crate::toda::{evolve, LaxPair, LaxTrajectory, TwoParticleTau};

/// Sample L(t) on the configured time grid.
pub fn compute_lax_trajectory(params: &TodaParams) -> Result<LaxTrajectory> {
    let times = params.time_grid()?;
    let pair = LaxPair::from_state(&params.state()?)?;
    evolve(&pair, &times, params.flow)
}

fn entry_panel(trajectory: &LaxTrajectory) -> Panel {
    let n = trajectory.dim();
    let mut series = Vec::new();
    for i in 0..n {
        series.push(Series::new(
            format!("L{}{}(t)", i + 1, i + 1),
            &trajectory.times,
            &trajectory.diagonal_series(i),
        ));
    }
    for i in 0..n.saturating_sub(1) {
        series.push(Series::new(
            format!("L{}{}(t)", i + 1, i + 2),
            &trajectory.times,
            &trajectory.entry_series(i, i + 1),
        ));
    }
    Panel {
        title: "Lax matrix entries".to_string(),
        x_label: "t".to_string(),
        y_label: "L_ij(t)".to_string(),
        series,
    }
}

fn eigenvalue_panel(trajectory: &LaxTrajectory) -> Panel {
    let series = (0..trajectory.dim())
        .map(|k| {
            Series::new(
                format!("lambda{}(t)", k + 1),
                &trajectory.times,
                &trajectory.eigenvalue_series(k),
            )
        })
        .collect();
    Panel {
        title: "Eigenvalues of L(t)".to_string(),
        x_label: "t".to_string(),
        y_label: "lambda".to_string(),
        series,
    }
}

fn format_spectrum(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{:.6}", v)).collect();
    format!("[{}]", parts.join(", "))
}

/// Two-particle chain: entries of L(t) beside its (constant) spectrum.
pub fn run_toda_lax(params: &TodaParams) -> Result<ExperimentReport> {
    let trajectory = compute_lax_trajectory(params)?;
    plot_panels(
        &[entry_panel(&trajectory), eigenvalue_panel(&trajectory)],
        &params.output,
    )?;
    info!("toda-lax: wrote {}", params.output.display());

    let spectrum = trajectory.eigenvalues.first().cloned().unwrap_or_default();
    Ok(ExperimentReport {
        name: "toda-lax",
        artifacts: vec![params.output.clone()],
        summary: vec![
            format!(
                "[Toda] Eigenvalues of L0: {}, max drift over t in [0, {}]: {:.3e}",
                format_spectrum(&spectrum),
                params.t_end,
                trajectory.spectral_drift()
            ),
            "Lax matrix entries and eigenvalues computed and plotted successfully.".to_string(),
        ],
    })
}

/// Two-particle positions q₁(t), q₂(t) from the tau functions.
pub fn run_toda_tau(params: &TodaParams) -> Result<ExperimentReport> {
    let times = params.time_grid()?;
    let tau = TwoParticleTau::new(&params.state()?)?;
    let (q1, q2) = tau.trajectory(&times);

    plot_panels(
        &[Panel {
            title: "Toda particle positions from tau functions".to_string(),
            x_label: "t".to_string(),
            y_label: "q_i(t)".to_string(),
            series: vec![
                Series::new("q1(t)", &times, &q1),
                Series::new("q2(t)", &times, &q2),
            ],
        }],
        &params.output,
    )?;
    info!("toda-tau: wrote {}", params.output.display());

    let last = times.len() - 1;
    Ok(ExperimentReport {
        name: "toda-tau",
        artifacts: vec![params.output.clone()],
        summary: vec![format!(
            "[Toda] Eigenvalues {}, q1({t}) = {:.4}, q2({t}) = {:.4}",
            format_spectrum(&tau.eigenvalues),
            q1[last],
            q2[last],
            t = params.t_end
        )],
    })
}

/// Diagonal entries of L(t), one line per particle.
pub fn run_toda_three(params: &TodaParams) -> Result<ExperimentReport> {
    let trajectory = compute_lax_trajectory(params)?;
    let series = (0..trajectory.dim())
        .map(|k| {
            Series::new(
                format!("particle {}", k + 1),
                &trajectory.times,
                &trajectory.diagonal_series(k),
            )
        })
        .collect();

    plot_panels(
        &[Panel {
            title: format!("{}-particle Toda lattice: diagonal of L(t)", trajectory.dim()),
            x_label: "t".to_string(),
            y_label: "L_kk(t)".to_string(),
            series,
        }],
        &params.output,
    )?;
    info!("toda-three: wrote {}", params.output.display());

    let spectrum = trajectory.eigenvalues.first().cloned().unwrap_or_default();
    Ok(ExperimentReport {
        name: "toda-three",
        artifacts: vec![params.output.clone()],
        summary: vec![format!(
            "[Toda] {} particles, eigenvalues {}, trace {:.6}",
            trajectory.dim(),
            format_spectrum(&spectrum),
            spectrum.iter().sum::<f64>()
        )],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::config::ExperimentConfig;
    use crate::toda::LaxFlow;
    use approx::assert_relative_eq;

    fn small(mut params: TodaParams, dir: &std::path::Path, name: &str) -> TodaParams {
        params.n_steps = 40;
        params.output = dir.join(name);
        params
    }

    #[test]
    fn test_lax_trajectory_conserves_trace() {
        let params = ExperimentConfig::default().toda_lax;
        let trajectory = compute_lax_trajectory(&params).unwrap();
        assert_eq!(trajectory.len(), 500);
        assert_relative_eq!(trajectory.times[499], 10.0);
        for m in &trajectory.matrices {
            assert_relative_eq!(m.trace(), 0.0, epsilon = 1e-9);
        }
        assert!(trajectory.spectral_drift() < 1e-8);
    }

    #[test]
    fn test_toda_flow_variant_is_isospectral() {
        let mut params = ExperimentConfig::default().toda_three;
        params.n_steps = 50;
        params.flow = LaxFlow::Toda { substeps: 20 };
        let trajectory = compute_lax_trajectory(&params).unwrap();
        assert_eq!(trajectory.dim(), 3);
        assert!(trajectory.spectral_drift() < 1e-6);
    }

    #[test]
    fn test_run_toda_scenes() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExperimentConfig::default();

        let lax = run_toda_lax(&small(config.toda_lax, dir.path(), "lax.svg")).unwrap();
        assert!(lax.artifacts[0].exists());
        assert_eq!(
            lax.summary[1],
            "Lax matrix entries and eigenvalues computed and plotted successfully."
        );

        let tau = run_toda_tau(&small(config.toda_tau, dir.path(), "tau.svg")).unwrap();
        assert!(tau.artifacts[0].exists());
        assert!(tau.summary[0].starts_with("[Toda] Eigenvalues"));

        let three = run_toda_three(&small(config.toda_three, dir.path(), "three.svg")).unwrap();
        assert!(three.summary[0].starts_with("[Toda] 3 particles"));
        let svg = std::fs::read_to_string(&three.artifacts[0]).unwrap();
        assert!(svg.contains("particle 3"));
    }

    #[test]
    fn test_tau_scene_rejects_three_particles() {
        let dir = tempfile::tempdir().unwrap();
        let params = small(ExperimentConfig::default().toda_three, dir.path(), "bad.svg");
        assert!(run_toda_tau(&params).is_err());
    }
}
