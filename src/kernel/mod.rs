//! Kernel module - split-operator evolution kernels.

mod traits;
mod bloch;
mod real_time;

pub use traits::KernelProvider;
pub use bloch::{BlochKernels, TimeDependence};
pub use real_time::RealTimeKernels;
