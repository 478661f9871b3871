//! Error types shared by every experiment.

use thiserror::Error;

use crate::render::PlotError;

/// Errors that can occur while running an experiment
#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plot error: {0}")]
    Plot(#[from] PlotError),
}

impl ExperimentError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ExperimentError::InvalidInput(msg.into())
    }
}

pub type Result<T> = core::result::Result<T, ExperimentError>;
