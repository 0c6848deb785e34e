//! IO module - configuration and file handling.

mod config;
mod output;

pub use config::{RunConfig, read_run_config, parse_run_config};
pub use output::write_wignerfunction;
