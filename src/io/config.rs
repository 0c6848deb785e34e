//! YAML run configuration.
//!
//! Example:
//!
//! ```yaml
//! grid:
//!   x_grid_dim: 256
//!   x_amplitude: 10.0
//!   p_grid_dim: 256
//!   p_amplitude: 10.0
//! kt: 0.5
//! dbeta: 0.01
//! system: !Harmonic
//!   omega: 1.0
//! boundary: Transparent
//! stationarity_steps: 1000
//! output: gibbs_state.txt
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bloch::BlochParams;
use crate::error::Result;
use crate::grid::{AbsorbingBoundary, GridParams};
use crate::hamiltonian::SystemModel;

fn default_dt() -> f64 {
    0.01
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub grid: GridParams,
    /// Missing temperature is reported when the projector is built.
    #[serde(default)]
    pub kt: Option<f64>,
    #[serde(default)]
    pub dbeta: Option<f64>,
    #[serde(default)]
    pub t: f64,
    pub system: SystemModel,
    #[serde(default)]
    pub boundary: AbsorbingBoundary,
    /// Real-time steps used to check that the Gibbs state is stationary; 0 skips the check.
    #[serde(default)]
    pub stationarity_steps: usize,
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl RunConfig {
    pub fn bloch_params(&self) -> BlochParams {
        BlochParams {
            grid: self.grid,
            hamiltonian: self.system.hamiltonian(),
            kt: self.kt,
            dbeta: self.dbeta,
            t: self.t,
            boundary: self.boundary,
        }
    }
}

/// Read a [`RunConfig`] from a YAML file.
pub fn read_run_config(path: impl AsRef<Path>) -> Result<RunConfig> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let config: RunConfig = serde_yaml::from_reader(reader)?;
    Ok(config)
}

pub fn parse_run_config(text: &str) -> Result<RunConfig> {
    Ok(serde_yaml::from_str(text)?)
}
