//! Gibbs state projection by imaginary-time propagation.
//!
//! Starting from a flat Wigner function (equal weight on every state), the
//! Bloch kernels are applied `num_beta_steps` times. Each application is one
//! inverse-temperature increment dβ, so the final state is the canonical
//! ensemble at β = 1/kT.
//!
//! Reference: D. I. Bondar, A. G. Campos, R. Cabrera, H. A. Rabitz (2016),
//! "Efficient computations of quantum canonical Gibbs state in phase space",
//! arXiv:1602.07288

use nalgebra::DMatrix;
use tracing::info;

use super::schedule::TemperatureSchedule;
use crate::error::Result;
use crate::grid::{AbsorbingBoundary, GridParams, PhaseSpaceGrid};
use crate::hamiltonian::HamiltonianSplit;
use crate::kernel::{BlochKernels, TimeDependence};
use crate::propagator::WignerMoyal;

/// Construction parameters for [`WignerBloch`].
#[derive(Clone, Debug)]
pub struct BlochParams {
    pub grid: GridParams,
    pub hamiltonian: HamiltonianSplit,
    /// Temperature of the Gibbs state; required.
    pub kt: Option<f64>,
    /// Requested inverse temperature increment, 0.01 if unset.
    pub dbeta: Option<f64>,
    /// Time at which a time-dependent Hamiltonian is frozen.
    pub t: f64,
    pub boundary: AbsorbingBoundary,
}

impl BlochParams {
    pub fn new(grid: GridParams, hamiltonian: HamiltonianSplit) -> Self {
        Self {
            grid,
            hamiltonian,
            kt: None,
            dbeta: None,
            t: 0.0,
            boundary: AbsorbingBoundary::Transparent,
        }
    }

    pub fn with_kt(mut self, kt: f64) -> Self {
        self.kt = Some(kt);
        self
    }

    pub fn with_dbeta(mut self, dbeta: f64) -> Self {
        self.dbeta = Some(dbeta);
        self
    }

    pub fn with_time(mut self, t: f64) -> Self {
        self.t = t;
        self
    }

    pub fn with_boundary(mut self, boundary: AbsorbingBoundary) -> Self {
        self.boundary = boundary;
        self
    }
}

/// Lifecycle of the projected Wigner function.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProjectionState {
    /// Kernels built, no distribution set yet.
    Uninitialized,
    /// W = 1 everywhere.
    Flat,
    /// Propagated to β = 1/kT; terminal.
    Converged,
}

/// Gibbs state projector for a separable Hamiltonian.
pub struct WignerBloch {
    schedule: TemperatureSchedule,
    propagator: WignerMoyal<BlochKernels>,
    state: ProjectionState,
}

impl WignerBloch {
    /// Validate the parameters and build the cached Bloch kernels.
    ///
    /// Temperature and grid are checked before any kernel is computed; a
    /// missing `kt` is a configuration error and `kt <= 0` is an unsupported
    /// mode.
    pub fn new(params: BlochParams) -> Result<Self> {
        let BlochParams {
            grid,
            hamiltonian,
            kt,
            dbeta,
            t,
            boundary,
        } = params;

        let schedule = TemperatureSchedule::resolve(kt, dbeta)?;
        let grid = PhaseSpaceGrid::new(grid)?;
        let mask = boundary.mask(&grid)?;

        let kernels = BlochKernels::build(schedule.dbeta, &hamiltonian, &grid, &mask, Some(t))?;
        let mut propagator = WignerMoyal::new(grid, hamiltonian, kernels, schedule.dbeta, t)?;
        // expectation values are meaningless along an imaginary-time flow
        propagator.set_ehrenfest(false)?;

        info!(
            kt = schedule.kt,
            dbeta = schedule.dbeta,
            num_beta_steps = schedule.num_beta_steps,
            "Bloch propagator ready"
        );

        Ok(Self {
            schedule,
            propagator,
            state: ProjectionState::Uninitialized,
        })
    }

    /// Set the flat starting distribution W = 1.
    pub fn initialize(&mut self) {
        self.propagator.set_wignerfunction_fn(|_, _| 1.0);
        self.state = ProjectionState::Flat;
    }

    /// The Boltzmann–Gibbs state, computed on first call and kept afterwards.
    pub fn get_gibbs_state(&mut self) -> &DMatrix<f64> {
        if self.state == ProjectionState::Uninitialized {
            self.initialize();
        }
        if self.state == ProjectionState::Flat {
            info!(steps = self.schedule.num_beta_steps, "calculating the Gibbs state");
            self.propagator.propagate(self.schedule.num_beta_steps);
            self.state = ProjectionState::Converged;
        }
        self.propagator.wignerfunction()
    }

    /// Consume the projector and return the Gibbs state.
    pub fn into_gibbs_state(mut self) -> DMatrix<f64> {
        self.get_gibbs_state();
        self.propagator.into_wignerfunction()
    }

    pub fn state(&self) -> ProjectionState {
        self.state
    }

    pub fn schedule(&self) -> &TemperatureSchedule {
        &self.schedule
    }

    pub fn kernels(&self) -> &BlochKernels {
        self.propagator.kernels()
    }

    pub fn grid(&self) -> &PhaseSpaceGrid {
        self.propagator.grid()
    }

    pub fn propagator(&self) -> &WignerMoyal<BlochKernels> {
        &self.propagator
    }

    /// Hamiltonian terms frozen at a fixed time during construction.
    pub fn time_dependence_warnings(&self) -> &[TimeDependence] {
        self.kernels().time_dependence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WignerError;
    use crate::hamiltonian::{harmonic_oscillator, EnergyKind, EnergyTerm};
    use approx::assert_relative_eq;

    fn params() -> BlochParams {
        BlochParams::new(GridParams::square(32, 6.0), harmonic_oscillator(1.0))
    }

    #[test]
    fn test_missing_temperature_is_configuration_error() {
        assert!(matches!(
            WignerBloch::new(params()),
            Err(WignerError::Configuration(_))
        ));
    }

    #[test]
    fn test_non_positive_temperature_is_unsupported() {
        for kt in [0.0, -0.5] {
            assert!(matches!(
                WignerBloch::new(params().with_kt(kt)),
                Err(WignerError::UnsupportedMode(_))
            ));
        }
    }

    #[test]
    fn test_bad_grid_is_configuration_error() {
        let p =
            BlochParams::new(GridParams::square(31, 6.0), harmonic_oscillator(1.0)).with_kt(1.0);
        assert!(matches!(WignerBloch::new(p), Err(WignerError::Configuration(_))));
    }

    #[test]
    fn test_state_transitions() {
        let mut bloch = WignerBloch::new(params().with_kt(1.0).with_dbeta(0.05)).unwrap();
        assert_eq!(bloch.state(), ProjectionState::Uninitialized);
        assert_eq!(bloch.schedule().num_beta_steps, 20);
        assert!(!bloch.propagator().is_ehrenfest());

        bloch.initialize();
        assert_eq!(bloch.state(), ProjectionState::Flat);
        assert!(bloch.propagator().wignerfunction().iter().all(|&w| w == 1.0));

        let first = bloch.get_gibbs_state().clone();
        assert_eq!(bloch.state(), ProjectionState::Converged);
        let t = bloch.propagator().t();
        assert_relative_eq!(t, 1.0, epsilon = 1e-12);

        // terminal: no further propagation
        let second = bloch.get_gibbs_state().clone();
        assert_eq!(first, second);
        assert_eq!(bloch.propagator().t(), t);
        let cell = bloch.grid().cell_area();
        assert_relative_eq!(second.sum() * cell, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_time_dependent_potential_warns_and_completes() {
        let h = HamiltonianSplit::new(
            EnergyTerm::time_independent(|p| 0.5 * p * p),
            EnergyTerm::time_dependent(|x, t| 0.5 * (1.0 + t) * x * x),
        );
        let mut bloch = WignerBloch::new(
            BlochParams::new(GridParams::square(32, 6.0), h)
                .with_kt(1.0)
                .with_dbeta(0.05)
                .with_time(0.25),
        )
        .unwrap();
        assert_eq!(
            bloch.time_dependence_warnings(),
            &[TimeDependence { kind: EnergyKind::Potential, t: 0.25 }]
        );
        let w = bloch.get_gibbs_state();
        assert!(w.iter().all(|v| v.is_finite()));
    }
}
