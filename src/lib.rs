//! Wigner Bloch - thermal states of 1D quantum systems in phase space
//!
//! This crate computes the Boltzmann–Gibbs state ρ ∝ exp(-H/kT) of a separable
//! Hamiltonian H = K(p) + V(x) as a Wigner function, by split-operator
//! propagation of the Bloch equation on a phase-space grid. The same
//! propagation engine runs real-time Wigner–Moyal dynamics, so the thermal
//! state can be used directly as an initial condition.

pub mod error;
pub mod grid;
pub mod transform;
pub mod hamiltonian;
pub mod kernel;
pub mod propagator;
pub mod bloch;
pub mod io;


// Re-export commonly used types at crate root
pub use error::{WignerError, Result};
pub use grid::{GridParams, PhaseSpaceGrid, AbsorbingBoundary};
pub use hamiltonian::{
    EnergyTerm, EnergyKind, HamiltonianSplit, SystemModel,
    harmonic_oscillator, double_well, harmonic_gibbs_state,
};
pub use kernel::{KernelProvider, BlochKernels, RealTimeKernels, TimeDependence};
pub use propagator::{WignerMoyal, EhrenfestTrace};
pub use bloch::{BlochParams, ProjectionState, TemperatureSchedule, WignerBloch, DEFAULT_DBETA};
pub use io::{RunConfig, read_run_config, parse_run_config, write_wignerfunction};
