//! Bloch module - Gibbs state of a separable Hamiltonian in phase space.

mod schedule;
mod projector;

pub use schedule::{TemperatureSchedule, DEFAULT_DBETA};
pub use projector::{BlochParams, ProjectionState, WignerBloch};
