//! Hamiltonian module - separable Hamiltonians and preset systems.

mod split;
mod models;

pub use split::{EnergyTerm, EnergyKind, HamiltonianSplit, StaticEnergy, TimedEnergy};
pub use models::{SystemModel, harmonic_oscillator, double_well, harmonic_gibbs_state};
