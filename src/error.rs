//! Error type shared by the grid, kernel and propagation modules.

use thiserror::Error;

/// Errors raised while configuring or running a phase-space propagator.
///
/// Every variant is raised before any propagation step runs, so a value of
/// this type never coexists with a partially built kernel.
#[derive(Debug, Error)]
pub enum WignerError {
    /// Missing or inconsistent parameters (temperature, grid, shapes, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A requested mode that is deliberately not implemented (kT <= 0).
    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl WignerError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, WignerError>;
