//! Unitary Wigner–Moyal kernels for real-time propagation.

use nalgebra::DMatrix;
use num_complex::Complex64;

use super::traits::KernelProvider;
use crate::error::{Result, WignerError};
use crate::grid::{validate_mask, PhaseSpaceGrid};
use crate::hamiltonian::HamiltonianSplit;

/// Kernels of the Moyal equation, split as e^{-iV dt/2} e^{-iK dt} e^{-iV dt/2}:
///
///   exp(-i dt/2 · [V(X - Θ/2) - V(X + Θ/2)]) · mask   over (θ, x)
///   exp(-i dt   · [K(P + Λ/2) - K(P - Λ/2)])          over (p, λ)
///
/// Time-dependent terms are re-evaluated whenever the step time changes.
pub struct RealTimeKernels {
    dt: f64,
    hamiltonian: HamiltonianSplit,
    grid: PhaseSpaceGrid,
    mask: DMatrix<f64>,
    exp_v: DMatrix<Complex64>,
    exp_k: DMatrix<Complex64>,
    v_time: f64,
    k_time: f64,
}

impl RealTimeKernels {
    pub fn new(
        dt: f64,
        hamiltonian: &HamiltonianSplit,
        grid: &PhaseSpaceGrid,
        mask: DMatrix<f64>,
        t: f64,
    ) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(WignerError::config(format!("time step must be positive, got {dt}")));
        }
        validate_mask(grid, &mask)?;

        let mut kernels = Self {
            dt,
            hamiltonian: hamiltonian.clone(),
            grid: grid.clone(),
            mask,
            exp_v: DMatrix::zeros(grid.p_grid_dim, grid.x_grid_dim),
            exp_k: DMatrix::zeros(grid.p_grid_dim, grid.x_grid_dim),
            v_time: t,
            k_time: t,
        };
        kernels.exp_v = kernels.potential_kernel(t);
        kernels.exp_k = kernels.kinetic_kernel(t);

        if kernels
            .exp_v
            .iter()
            .chain(kernels.exp_k.iter())
            .any(|k| !(k.re.is_finite() && k.im.is_finite()))
        {
            return Err(WignerError::config(
                "the Hamiltonian is not finite on the grid",
            ));
        }
        Ok(kernels)
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    fn potential_kernel(&self, t: f64) -> DMatrix<Complex64> {
        let v = &self.hamiltonian.potential;
        let half_dt = 0.5 * self.dt;
        let mut kernel = self.grid.x.zip_map(&self.grid.theta, |x, th| {
            let phase = -half_dt * (v.at(x - 0.5 * th, t) - v.at(x + 0.5 * th, t));
            Complex64::from_polar(1.0, phase)
        });
        for (k, m) in kernel.iter_mut().zip(self.mask.iter()) {
            *k *= *m;
        }
        kernel
    }

    fn kinetic_kernel(&self, t: f64) -> DMatrix<Complex64> {
        let k = &self.hamiltonian.kinetic;
        let dt = self.dt;
        self.grid.p.zip_map(&self.grid.lambda, |p, lam| {
            let phase = -dt * (k.at(p + 0.5 * lam, t) - k.at(p - 0.5 * lam, t));
            Complex64::from_polar(1.0, phase)
        })
    }
}

impl KernelProvider for RealTimeKernels {
    fn apply_exp_v(&mut self, rep: &mut DMatrix<Complex64>, t: f64) {
        if self.hamiltonian.potential.is_time_dependent() && t != self.v_time {
            self.exp_v = self.potential_kernel(t);
            self.v_time = t;
        }
        rep.component_mul_assign(&self.exp_v);
    }

    fn apply_exp_k(&mut self, rep: &mut DMatrix<Complex64>, t: f64) {
        if self.hamiltonian.kinetic.is_time_dependent() && t != self.k_time {
            self.exp_k = self.kinetic_kernel(t);
            self.k_time = t;
        }
        rep.component_mul_assign(&self.exp_k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{AbsorbingBoundary, GridParams};
    use crate::hamiltonian::{harmonic_oscillator, EnergyTerm};
    use approx::assert_relative_eq;

    #[test]
    fn test_kernels_are_unimodular_without_mask() {
        let grid = PhaseSpaceGrid::new(GridParams::square(32, 6.0)).unwrap();
        let mask = AbsorbingBoundary::Transparent.mask(&grid).unwrap();
        let kernels =
            RealTimeKernels::new(0.01, &harmonic_oscillator(1.0), &grid, mask, 0.0).unwrap();
        for k in kernels.exp_v.iter().chain(kernels.exp_k.iter()) {
            assert_relative_eq!(k.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_time_dependent_potential_is_refreshed() {
        let grid = PhaseSpaceGrid::new(GridParams::square(16, 4.0)).unwrap();
        let mask = AbsorbingBoundary::Transparent.mask(&grid).unwrap();
        let h = HamiltonianSplit::new(
            EnergyTerm::time_independent(|p| 0.5 * p * p),
            EnergyTerm::time_dependent(|x, t| x * t.sin()),
        );
        let mut kernels = RealTimeKernels::new(0.1, &h, &grid, mask, 0.0).unwrap();
        let before = kernels.exp_v.clone();

        let mut rep = DMatrix::from_element(16, 16, Complex64::new(1.0, 0.0));
        kernels.apply_exp_v(&mut rep, 1.0);
        assert_eq!(kernels.v_time, 1.0);
        assert_ne!(before, kernels.exp_v);
        assert_eq!(rep, kernels.exp_v);
    }

    #[test]
    fn test_rejects_bad_step() {
        let grid = PhaseSpaceGrid::new(GridParams::square(8, 4.0)).unwrap();
        let mask = AbsorbingBoundary::Transparent.mask(&grid).unwrap();
        assert!(RealTimeKernels::new(0.0, &harmonic_oscillator(1.0), &grid, mask, 0.0).is_err());
    }
}
