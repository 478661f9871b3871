//! YAML configuration of the experiments.
//!
//! A file only needs the keys it changes; everything else keeps its default.
//! Unknown keys are an error.
//!
//! ```yaml
//! chebyshev:
//!   n_trials: 20000
//!   seed: 7
//! toda_three:
//!   flow:
//!     kind: toda
//!     substeps: 20
//! ```

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::Result;
use crate::experiments::ExperimentConfig;

/// Overlay `patch` onto `base`, recursing into mappings. Sequences and scalars replace.
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Mapping(base), Value::Mapping(patch)) => merge_mapping(base, patch),
        (base, patch) => *base = patch,
    }
}

fn merge_mapping(base: &mut Mapping, patch: Mapping) {
    for (key, value) in patch {
        match base.get_mut(&key) {
            Some(slot) => merge(slot, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

/// Parse a (possibly partial) configuration, filling missing keys from the defaults.
pub fn parse_experiment_config(text: &str) -> Result<ExperimentConfig> {
    let patch: Value = serde_yaml::from_str(text)?;
    let mut merged = serde_yaml::to_value(ExperimentConfig::default())?;
    if !patch.is_null() {
        merge(&mut merged, patch);
    }
    Ok(serde_yaml::from_value(merged)?)
}

pub fn read_experiment_config(path: &Path) -> Result<ExperimentConfig> {
    let text = std::fs::read_to_string(path)?;
    let config = parse_experiment_config(&text)?;
    debug!("Loaded experiment configuration from {}", path.display());
    Ok(config)
}

pub fn experiment_config_to_yaml(config: &ExperimentConfig) -> Result<String> {
    Ok(serde_yaml::to_string(config)?)
}

pub fn write_experiment_config(config: &ExperimentConfig, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_yaml::to_writer(writer, config)?;
    Ok(())
}
