//! Split-operator propagation of a Wigner function on a phase-space grid.

use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::{debug, warn};

use super::ehrenfest::EhrenfestTrace;
use crate::error::{Result, WignerError};
use crate::grid::{AbsorbingBoundary, PhaseSpaceGrid};
use crate::hamiltonian::HamiltonianSplit;
use crate::kernel::{KernelProvider, RealTimeKernels};
use crate::transform::PhaseSpaceTransform;

/// Wigner function propagator with pluggable kernels.
///
/// One step is
///
///   (p,x) → (θ,x) · exp_v → (p,x) → (p,λ) · exp_k → (p,x) → (θ,x) · exp_v → (p,x)
///
/// followed by normalization to unit phase-space integral. The kernels decide
/// whether this is real-time (unitary) or imaginary-time (Bloch) evolution.
pub struct WignerMoyal<P: KernelProvider> {
    grid: PhaseSpaceGrid,
    hamiltonian: HamiltonianSplit,
    kernels: P,
    transform: PhaseSpaceTransform,
    wignerfunction: DMatrix<f64>,
    rep: DMatrix<Complex64>,
    t: f64,
    dt: f64,
    ehrenfest: Option<EhrenfestTrace>,
}

impl WignerMoyal<RealTimeKernels> {
    /// Real-time propagator for `hamiltonian`, starting at time `t`.
    pub fn real_time(
        grid: PhaseSpaceGrid,
        hamiltonian: HamiltonianSplit,
        dt: f64,
        t: f64,
        boundary: AbsorbingBoundary,
    ) -> Result<Self> {
        let mask = boundary.mask(&grid)?;
        let kernels = RealTimeKernels::new(dt, &hamiltonian, &grid, mask, t)?;
        Self::new(grid, hamiltonian, kernels, dt, t)
    }
}

impl<P: KernelProvider> WignerMoyal<P> {
    /// The Wigner function starts out as zero; set it before propagating.
    pub fn new(
        grid: PhaseSpaceGrid,
        hamiltonian: HamiltonianSplit,
        kernels: P,
        dt: f64,
        t: f64,
    ) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(WignerError::config(format!("time step must be positive, got {dt}")));
        }
        if !t.is_finite() {
            return Err(WignerError::config(format!("initial time must be finite, got {t}")));
        }
        let (rows, cols) = grid.shape();
        Ok(Self {
            transform: PhaseSpaceTransform::new(&grid),
            wignerfunction: DMatrix::zeros(rows, cols),
            rep: DMatrix::zeros(rows, cols),
            grid,
            hamiltonian,
            kernels,
            t,
            dt,
            ehrenfest: None,
        })
    }

    /// Replace the current Wigner function.
    pub fn set_wignerfunction(&mut self, wignerfunction: DMatrix<f64>) -> Result<&mut Self> {
        self.grid.ensure_shape("wigner function", &wignerfunction)?;
        self.wignerfunction = wignerfunction;
        Ok(self)
    }

    /// Replace the current Wigner function by `f(x, p)` tabulated on the grid.
    pub fn set_wignerfunction_fn<F: Fn(f64, f64) -> f64>(&mut self, f: F) -> &mut Self {
        self.wignerfunction = self.grid.evaluate(f);
        self
    }

    /// Turn per-step Ehrenfest bookkeeping on or off.
    ///
    /// Enabling it needs both K'(p) and V'(x); turning it off discards the trace.
    pub fn set_ehrenfest(&mut self, enabled: bool) -> Result<()> {
        if !enabled {
            self.ehrenfest = None;
            return Ok(());
        }
        if !self.hamiltonian.has_derivatives() {
            return Err(WignerError::config(
                "Ehrenfest bookkeeping requires diff_kinetic and diff_potential",
            ));
        }
        self.ehrenfest.get_or_insert_with(EhrenfestTrace::default);
        Ok(())
    }

    pub fn ehrenfest(&self) -> Option<&EhrenfestTrace> {
        self.ehrenfest.as_ref()
    }

    pub fn is_ehrenfest(&self) -> bool {
        self.ehrenfest.is_some()
    }

    /// Advance by `steps` time steps and return the resulting Wigner function.
    pub fn propagate(&mut self, steps: usize) -> &DMatrix<f64> {
        debug!(steps, t = self.t, dt = self.dt, "propagating");
        for _ in 0..steps {
            self.single_step_propagation();
        }
        &self.wignerfunction
    }

    pub fn single_step_propagation(&mut self) {
        for (c, w) in self.rep.iter_mut().zip(self.wignerfunction.iter()) {
            *c = Complex64::new(*w, 0.0);
        }

        self.transform.p_to_theta(&mut self.rep);
        self.kernels.apply_exp_v(&mut self.rep, self.t);
        self.transform.theta_to_p(&mut self.rep);

        self.transform.x_to_lambda(&mut self.rep);
        self.kernels.apply_exp_k(&mut self.rep, self.t);
        self.transform.lambda_to_x(&mut self.rep);

        self.transform.p_to_theta(&mut self.rep);
        self.kernels.apply_exp_v(&mut self.rep, self.t);
        self.transform.theta_to_p(&mut self.rep);

        for (w, c) in self.wignerfunction.iter_mut().zip(self.rep.iter()) {
            *w = c.re;
        }
        self.normalize();

        if let (Some(trace), Some(dk), Some(dv)) = (
            self.ehrenfest.as_mut(),
            &self.hamiltonian.diff_kinetic,
            &self.hamiltonian.diff_potential,
        ) {
            trace.record(&self.grid, &self.hamiltonian, dk, dv, &self.wignerfunction, self.t);
        }
        self.t += self.dt;
    }

    fn normalize(&mut self) {
        let norm = self.wignerfunction.sum() * self.grid.cell_area();
        if norm.is_finite() && norm > 0.0 {
            self.wignerfunction /= norm;
        } else {
            warn!(norm, t = self.t, "wigner function cannot be normalized");
        }
    }

    /// Phase-space average of `f(x, p)` over the current Wigner function.
    pub fn average<F: Fn(f64, f64) -> f64>(&self, f: F) -> f64 {
        let mut total = 0.0;
        for j in 0..self.grid.x_grid_dim {
            let x = self.grid.x_coordinate(j);
            for i in 0..self.grid.p_grid_dim {
                total += f(x, self.grid.p_coordinate(i)) * self.wignerfunction[(i, j)];
            }
        }
        total * self.grid.cell_area()
    }

    pub fn wignerfunction(&self) -> &DMatrix<f64> {
        &self.wignerfunction
    }

    pub fn into_wignerfunction(self) -> DMatrix<f64> {
        self.wignerfunction
    }

    pub fn grid(&self) -> &PhaseSpaceGrid {
        &self.grid
    }

    pub fn hamiltonian(&self) -> &HamiltonianSplit {
        &self.hamiltonian
    }

    pub fn kernels(&self) -> &P {
        &self.kernels
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }
}
