use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rust_numexp::io::{experiment_config_to_yaml, read_experiment_config};
use rust_numexp::{run_all, Experiment, ExperimentConfig, ExperimentError, ExperimentReport};

#[derive(Parser, Debug)]
#[command(version, about = "Concentration-of-measure and Toda lattice experiments", long_about = None)]
struct Args {
    /// Experiments to run; all of them when omitted
    #[arg(value_enum)]
    experiments: Vec<Experiment>,

    /// YAML file overriding the default parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the generated figures
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Seed every Monte Carlo experiment
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    dump_config: bool,
}

fn print_report(report: &ExperimentReport) {
    println!("== {} ==", report.name);
    for line in &report.summary {
        println!("{}", line);
    }
    for artifact in &report.artifacts {
        println!("Saved figure to {}", artifact.display());
    }
}

fn main() -> Result<(), ExperimentError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => read_experiment_config(path)?,
        None => ExperimentConfig::default(),
    };
    if let Some(dir) = &args.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    if args.dump_config {
        print!("{}", experiment_config_to_yaml(&config)?);
        return Ok(());
    }

    let experiments = if args.experiments.is_empty() {
        Experiment::ALL.to_vec()
    } else {
        args.experiments
    };

    let reports = run_all(&experiments, &config, print_report)?;
    info!("Finished {} experiment(s)", reports.len());
    Ok(())
}
