//! Kernel provider seam between the propagation loop and its evolution kernels.

use nalgebra::DMatrix;
use num_complex::Complex64;

/// Source of the two split-operator kernels applied in every propagation step.
///
/// The step loop calls `apply_exp_v` in the (θ, x) representation, then
/// `apply_exp_k` in the (p, λ) representation, then `apply_exp_v` again.
/// Implementations differ in what the kernels are and whether they change
/// with time:
///
/// - [`super::RealTimeKernels`]: unitary Wigner–Moyal kernels, recomputed
///   when the Hamiltonian is time dependent.
/// - [`super::BlochKernels`]: static Bloch (imaginary-time) kernels built
///   once and cached.
pub trait KernelProvider {
    /// Multiply the (θ, x) representation by the potential half-step kernel at time `t`.
    fn apply_exp_v(&mut self, rep: &mut DMatrix<Complex64>, t: f64);

    /// Multiply the (p, λ) representation by the kinetic full-step kernel at time `t`.
    fn apply_exp_k(&mut self, rep: &mut DMatrix<Complex64>, t: f64);
}
