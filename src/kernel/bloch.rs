//! Imaginary-time (Bloch) kernels for the Gibbs state.
//!
//! The Bloch equation ∂ρ/∂β = -(Hρ + ρH)/2 is split as
//!
//!   e^{-dβ V/2} e^{-dβ K} e^{-dβ V/2}
//!
//! In the (x, θ) representation ρ(x - θ/2, x + θ/2) the potential acts as the
//! Bopp-shifted pair V(x - θ/2), V(x + θ/2), each entering with weight 1/2,
//! so the exponent of a step is the mean of the two shifted energies. The
//! kinetic kernel is the same construction in (p, λ).
//!
//! Before exponentiating, the minimum of the energy array is subtracted. This
//! keeps the largest kernel value at exactly 1 and avoids overflow for deep
//! potentials; the constant drops out when the Wigner function is normalized.

use std::fmt;

use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::{debug, warn};

use super::traits::KernelProvider;
use crate::error::{Result, WignerError};
use crate::grid::{validate_mask, PhaseSpaceGrid};
use crate::hamiltonian::{EnergyKind, EnergyTerm, HamiltonianSplit};

/// Non-fatal diagnostic: a time-dependent energy term was frozen at time `t`.
///
/// A time-dependent Hamiltonian has no static thermal state in general; the
/// Gibbs state computed here is the one of H(t) at that instant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeDependence {
    pub kind: EnergyKind,
    pub t: f64,
}

impl fmt::Display for TimeDependence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "the {} energy is time dependent; \
             the Gibbs state is calculated with respect to time t = {}",
            self.kind, self.t
        )
    }
}

/// Cached Bloch kernels, real valued and positive.
#[derive(Clone, Debug)]
pub struct BlochKernels {
    dbeta: f64,
    potential: DMatrix<f64>,
    kinetic: DMatrix<f64>,
    time_dependence: Vec<TimeDependence>,
}

impl BlochKernels {
    /// Build the potential half-step and kinetic full-step kernels.
    ///
    /// # Arguments
    /// * `dbeta` - inverse temperature increment of one step
    /// * `hamiltonian` - the separable Hamiltonian
    /// * `grid` - phase-space grid supplying X, Θ, P and Λ
    /// * `mask` - absorbing boundary, multiplied into the potential kernel
    /// * `t` - evaluation time for time-dependent terms
    ///
    /// Fails if a time-dependent term meets `t = None`, if the mask does not
    /// match the grid, or if an energy evaluates to a non-finite value.
    pub fn build(
        dbeta: f64,
        hamiltonian: &HamiltonianSplit,
        grid: &PhaseSpaceGrid,
        mask: &DMatrix<f64>,
        t: Option<f64>,
    ) -> Result<Self> {
        if !(dbeta.is_finite() && dbeta > 0.0) {
            return Err(WignerError::config(format!(
                "inverse temperature increment must be positive, got {dbeta}"
            )));
        }
        validate_mask(grid, mask)?;

        let mut time_dependence = Vec::new();
        let t_potential = frozen_time(
            &hamiltonian.potential,
            EnergyKind::Potential,
            t,
            &mut time_dependence,
        )?;
        let t_kinetic =
            frozen_time(&hamiltonian.kinetic, EnergyKind::Kinetic, t, &mut time_dependence)?;

        // V(X - Θ/2) + V(X + Θ/2), half step
        let potential_sum = bopp_sum(&hamiltonian.potential, &grid.x, &grid.theta, t_potential);
        let mut potential = boltzmann_weight(potential_sum, 0.5 * dbeta, EnergyKind::Potential)?;
        potential.component_mul_assign(mask);

        // K(P + Λ/2) + K(P - Λ/2), full step
        let kinetic_sum = bopp_sum(&hamiltonian.kinetic, &grid.p, &grid.lambda, t_kinetic);
        let kinetic = boltzmann_weight(kinetic_sum, dbeta, EnergyKind::Kinetic)?;

        debug!(
            dbeta,
            potential_min = potential.iter().copied().fold(f64::INFINITY, f64::min),
            kinetic_min = kinetic.iter().copied().fold(f64::INFINITY, f64::min),
            "built Bloch kernels"
        );

        Ok(Self {
            dbeta,
            potential,
            kinetic,
            time_dependence,
        })
    }

    pub fn dbeta(&self) -> f64 {
        self.dbeta
    }

    /// exp(-dβ/2 · mean shifted V), times the boundary mask, over (θ, x).
    pub fn potential_kernel(&self) -> &DMatrix<f64> {
        &self.potential
    }

    /// exp(-dβ · mean shifted K) over (p, λ).
    pub fn kinetic_kernel(&self) -> &DMatrix<f64> {
        &self.kinetic
    }

    /// Terms that were frozen at a fixed time while building.
    pub fn time_dependence(&self) -> &[TimeDependence] {
        &self.time_dependence
    }
}

impl KernelProvider for BlochKernels {
    fn apply_exp_v(&mut self, rep: &mut DMatrix<Complex64>, _t: f64) {
        multiply_real(rep, &self.potential);
    }

    fn apply_exp_k(&mut self, rep: &mut DMatrix<Complex64>, _t: f64) {
        multiply_real(rep, &self.kinetic);
    }
}

fn multiply_real(rep: &mut DMatrix<Complex64>, kernel: &DMatrix<f64>) {
    for (w, k) in rep.iter_mut().zip(kernel.iter()) {
        *w *= *k;
    }
}

fn frozen_time(
    term: &EnergyTerm,
    kind: EnergyKind,
    t: Option<f64>,
    time_dependence: &mut Vec<TimeDependence>,
) -> Result<f64> {
    if !term.is_time_dependent() {
        // never read by a time-independent term
        return Ok(t.unwrap_or(0.0));
    }
    let t = t.ok_or_else(|| {
        WignerError::config(format!(
            "the {kind} energy requires a time argument but no evaluation time was supplied"
        ))
    })?;
    let diagnostic = TimeDependence { kind, t };
    warn!("{diagnostic}");
    time_dependence.push(diagnostic);
    Ok(t)
}

/// f(q - d/2) + f(q + d/2) on every grid cell.
fn bopp_sum(term: &EnergyTerm, base: &DMatrix<f64>, dual: &DMatrix<f64>, t: f64) -> DMatrix<f64> {
    base.zip_map(dual, |q, d| term.at(q - 0.5 * d, t) + term.at(q + 0.5 * d, t))
}

/// exp(-scale · (S - min S) / 2); equals 1 where S is minimal.
fn boltzmann_weight(sum: DMatrix<f64>, scale: f64, kind: EnergyKind) -> Result<DMatrix<f64>> {
    if let Some(bad) = sum.iter().find(|s| !s.is_finite()) {
        return Err(WignerError::config(format!(
            "the {kind} energy is not finite on the grid (found {bad})"
        )));
    }
    let min = sum.iter().copied().fold(f64::INFINITY, f64::min);
    Ok(sum.map(|s| (-scale * 0.5 * (s - min)).exp()))
}
