//! Preset one-dimensional systems.
//!
//! Natural units ℏ = m = 1 throughout, K(p) = p²/2.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::split::{EnergyTerm, HamiltonianSplit};
use crate::grid::PhaseSpaceGrid;

/// Systems selectable from a configuration file.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SystemModel {
    /// V(x) = ω²x²/2
    Harmonic { omega: f64 },
    /// V(x) = h (x² - a²)² / a⁴ with minima at ±a and barrier height h at x = 0.
    DoubleWell { well_position: f64, barrier_height: f64 },
}

impl SystemModel {
    pub fn hamiltonian(&self) -> HamiltonianSplit {
        match *self {
            Self::Harmonic { omega } => harmonic_oscillator(omega),
            Self::DoubleWell {
                well_position,
                barrier_height,
            } => double_well(well_position, barrier_height),
        }
    }

    /// Analytic Gibbs state, where one is known.
    pub fn exact_gibbs_state(&self, grid: &PhaseSpaceGrid, kt: f64) -> Option<DMatrix<f64>> {
        match *self {
            Self::Harmonic { omega } => Some(harmonic_gibbs_state(grid, omega, kt)),
            Self::DoubleWell { .. } => None,
        }
    }
}

fn free_kinetic() -> EnergyTerm {
    EnergyTerm::time_independent(|p| 0.5 * p * p)
}

pub fn harmonic_oscillator(omega: f64) -> HamiltonianSplit {
    let omega2 = omega * omega;
    HamiltonianSplit::new(
        free_kinetic(),
        EnergyTerm::time_independent(move |x| 0.5 * omega2 * x * x),
    )
    .with_derivatives(
        EnergyTerm::time_independent(|p| p),
        EnergyTerm::time_independent(move |x| omega2 * x),
    )
}

/// Sombrero potential h (x² - a²)² / a⁴.
pub fn double_well(well_position: f64, barrier_height: f64) -> HamiltonianSplit {
    let a2 = well_position * well_position;
    let coupling = barrier_height / (a2 * a2);
    HamiltonianSplit::new(
        free_kinetic(),
        EnergyTerm::time_independent(move |x| {
            let d = x * x - a2;
            coupling * d * d
        }),
    )
    .with_derivatives(
        EnergyTerm::time_independent(|p| p),
        EnergyTerm::time_independent(move |x| 4.0 * coupling * x * (x * x - a2)),
    )
}

/// Wigner function of the harmonic oscillator Gibbs state:
///
///   W(x, p) = tanh(ω / 2kT) / π · exp(-2 tanh(ω / 2kT) H(x, p) / ω)
pub fn harmonic_gibbs_state(grid: &PhaseSpaceGrid, omega: f64, kt: f64) -> DMatrix<f64> {
    let th = (0.5 * omega / kt).tanh();
    let omega2 = omega * omega;
    grid.evaluate(|x, p| {
        let energy = 0.5 * p * p + 0.5 * omega2 * x * x;
        th / std::f64::consts::PI * (-2.0 * th * energy / omega).exp()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridParams;
    use approx::assert_relative_eq;

    #[test]
    fn test_harmonic_terms() {
        let h = harmonic_oscillator(2.0);
        assert_relative_eq!(h.energy(1.0, 1.0, 0.0), 2.5);
        assert_relative_eq!(h.diff_potential.as_ref().unwrap().at(1.5, 0.0), 6.0);
        assert!(!h.is_time_dependent());
    }

    #[test]
    fn test_double_well_minima_and_barrier() {
        let h = double_well(1.5, 2.0);
        let v = &h.potential;
        assert_relative_eq!(v.at(1.5, 0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.at(-1.5, 0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.at(0.0, 0.0), 2.0, epsilon = 1e-12);
        let dv = h.diff_potential.as_ref().unwrap();
        let step = 1e-6;
        let numerical = (v.at(0.7 + step, 0.0) - v.at(0.7 - step, 0.0)) / (2.0 * step);
        assert_relative_eq!(dv.at(0.7, 0.0), numerical, epsilon = 1e-6);
    }

    #[test]
    fn test_harmonic_gibbs_state_normalized() {
        let grid = PhaseSpaceGrid::new(GridParams::square(128, 8.0)).unwrap();
        let w = harmonic_gibbs_state(&grid, 1.0, 0.5);
        assert_relative_eq!(w.sum() * grid.cell_area(), 1.0, epsilon = 1e-8);
        assert!(SystemModel::DoubleWell { well_position: 1.0, barrier_height: 1.0 }
            .exact_gibbs_state(&grid, 0.5)
            .is_none());
    }
}
