//! Ehrenfest theorem bookkeeping.
//!
//! For H = K(p) + V(x):
//!   d⟨x⟩/dt = ⟨K'(p)⟩,   d⟨p⟩/dt = -⟨V'(x)⟩
//! Recording both sides each step is a cheap consistency check on a
//! real-time propagation.

use nalgebra::DMatrix;

use crate::grid::PhaseSpaceGrid;
use crate::hamiltonian::{EnergyTerm, HamiltonianSplit};

/// Per-step expectation values.
#[derive(Clone, Debug, Default)]
pub struct EhrenfestTrace {
    pub x_average: Vec<f64>,
    pub p_average: Vec<f64>,
    /// ⟨K'(p)⟩
    pub x_average_rhs: Vec<f64>,
    /// -⟨V'(x)⟩
    pub p_average_rhs: Vec<f64>,
    pub hamiltonian_average: Vec<f64>,
}

impl EhrenfestTrace {
    pub fn len(&self) -> usize {
        self.x_average.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_average.is_empty()
    }

    /// Append the averages of a normalized Wigner function at time `t`.
    pub(crate) fn record(
        &mut self,
        grid: &PhaseSpaceGrid,
        hamiltonian: &HamiltonianSplit,
        diff_kinetic: &EnergyTerm,
        diff_potential: &EnergyTerm,
        wignerfunction: &DMatrix<f64>,
        t: f64,
    ) {
        let x_marginal = marginal_x(grid, wignerfunction);
        let p_marginal = marginal_p(grid, wignerfunction);

        let average_x = |f: &dyn Fn(f64) -> f64| -> f64 {
            x_marginal
                .iter()
                .enumerate()
                .map(|(j, w)| f(grid.x_coordinate(j)) * w)
                .sum()
        };
        let average_p = |f: &dyn Fn(f64) -> f64| -> f64 {
            p_marginal
                .iter()
                .enumerate()
                .map(|(i, w)| f(grid.p_coordinate(i)) * w)
                .sum()
        };

        self.x_average.push(average_x(&|x| x));
        self.p_average.push(average_p(&|p| p));
        self.x_average_rhs.push(average_p(&|p| diff_kinetic.at(p, t)));
        self.p_average_rhs.push(-average_x(&|x| diff_potential.at(x, t)));
        self.hamiltonian_average.push(
            average_p(&|p| hamiltonian.kinetic.at(p, t))
                + average_x(&|x| hamiltonian.potential.at(x, t)),
        );
    }
}

/// ∫ W dp at each x, already multiplied by dx·dp.
fn marginal_x(grid: &PhaseSpaceGrid, w: &DMatrix<f64>) -> Vec<f64> {
    w.column_iter().map(|c| c.sum() * grid.cell_area()).collect()
}

/// ∫ W dx at each p, already multiplied by dx·dp.
fn marginal_p(grid: &PhaseSpaceGrid, w: &DMatrix<f64>) -> Vec<f64> {
    w.row_iter().map(|r| r.sum() * grid.cell_area()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridParams;
    use crate::hamiltonian::harmonic_oscillator;
    use approx::assert_relative_eq;

    #[test]
    fn test_averages_of_displaced_gaussian() {
        let grid = PhaseSpaceGrid::new(GridParams::square(128, 8.0)).unwrap();
        let (x0, p0) = (1.0, -0.5);
        let w = grid.evaluate(|x, p| {
            (-(x - x0).powi(2) - (p - p0).powi(2)).exp() / std::f64::consts::PI
        });
        let h = harmonic_oscillator(2.0);
        let (dk, dv) = (h.diff_kinetic.clone().unwrap(), h.diff_potential.clone().unwrap());
        let mut trace = EhrenfestTrace::default();
        assert!(trace.is_empty());
        trace.record(&grid, &h, &dk, &dv, &w, 0.0);

        assert_eq!(trace.len(), 1);
        assert!(!trace.is_empty());
        assert_relative_eq!(trace.x_average[0], x0, epsilon = 1e-8);
        assert_relative_eq!(trace.p_average[0], p0, epsilon = 1e-8);
        assert_relative_eq!(trace.x_average_rhs[0], p0, epsilon = 1e-8);
        assert_relative_eq!(trace.p_average_rhs[0], -4.0 * x0, epsilon = 1e-8);
        // ⟨p²⟩/2 + 2⟨x²⟩ with variances 1/2
        let expected = 0.5 * (p0 * p0 + 0.5) + 2.0 * (x0 * x0 + 0.5);
        assert_relative_eq!(trace.hamiltonian_average[0], expected, epsilon = 1e-8);
    }
}
