//! Propagator module - the split-operator step loop over a Wigner function.

mod engine;
mod ehrenfest;

pub use engine::WignerMoyal;
pub use ehrenfest::EhrenfestTrace;
