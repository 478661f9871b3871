//! IO module - experiment configuration files.

mod config;

pub use config::{
    experiment_config_to_yaml, parse_experiment_config, read_experiment_config,
    write_experiment_config,
};
