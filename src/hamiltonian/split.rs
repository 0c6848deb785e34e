//! Separable Hamiltonian H = K(p) + V(x).
//!
//! Each energy term declares up front whether it takes an explicit time
//! argument, so callers never have to probe a callable's signature.

use std::fmt;
use std::sync::Arc;

/// Energy function of a single coordinate.
pub type StaticEnergy = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Energy function of a coordinate and the time, called as `f(q, t)`.
pub type TimedEnergy = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// One term of a separable Hamiltonian, tagged with its time dependence.
#[derive(Clone)]
pub enum EnergyTerm {
    TimeIndependent(StaticEnergy),
    TimeDependent(TimedEnergy),
}

impl EnergyTerm {
    pub fn time_independent<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::TimeIndependent(Arc::new(f))
    }

    pub fn time_dependent<F>(f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self::TimeDependent(Arc::new(f))
    }

    pub fn is_time_dependent(&self) -> bool {
        matches!(self, Self::TimeDependent(_))
    }

    /// Evaluate the term at coordinate `q`. `t` is ignored by time-independent terms.
    #[inline]
    pub fn at(&self, q: f64, t: f64) -> f64 {
        match self {
            Self::TimeIndependent(f) => f(q),
            Self::TimeDependent(f) => f(q, t),
        }
    }
}

impl fmt::Debug for EnergyTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeIndependent(_) => write!(f, "EnergyTerm::TimeIndependent(..)"),
            Self::TimeDependent(_) => write!(f, "EnergyTerm::TimeDependent(..)"),
        }
    }
}

/// Which half of the Hamiltonian a diagnostic refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnergyKind {
    Kinetic,
    Potential,
}

impl fmt::Display for EnergyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kinetic => write!(f, "kinetic"),
            Self::Potential => write!(f, "potential"),
        }
    }
}

/// Separable Hamiltonian H = K(p) + V(x).
///
/// The derivatives K'(p) and V'(x) are optional; they are only needed for
/// Ehrenfest bookkeeping during real-time propagation.
#[derive(Clone, Debug)]
pub struct HamiltonianSplit {
    pub kinetic: EnergyTerm,
    pub potential: EnergyTerm,
    pub diff_kinetic: Option<EnergyTerm>,
    pub diff_potential: Option<EnergyTerm>,
}

impl HamiltonianSplit {
    pub fn new(kinetic: EnergyTerm, potential: EnergyTerm) -> Self {
        Self {
            kinetic,
            potential,
            diff_kinetic: None,
            diff_potential: None,
        }
    }

    /// Attach K'(p) and V'(x).
    pub fn with_derivatives(
        mut self,
        diff_kinetic: EnergyTerm,
        diff_potential: EnergyTerm,
    ) -> Self {
        self.diff_kinetic = Some(diff_kinetic);
        self.diff_potential = Some(diff_potential);
        self
    }

    pub fn is_time_dependent(&self) -> bool {
        self.kinetic.is_time_dependent() || self.potential.is_time_dependent()
    }

    pub fn has_derivatives(&self) -> bool {
        self.diff_kinetic.is_some() && self.diff_potential.is_some()
    }

    /// Classical energy K(p) + V(x) at time `t`.
    #[inline]
    pub fn energy(&self, x: f64, p: f64, t: f64) -> f64 {
        self.kinetic.at(p, t) + self.potential.at(x, t)
    }

    pub fn term(&self, kind: EnergyKind) -> &EnergyTerm {
        match kind {
            EnergyKind::Kinetic => &self.kinetic,
            EnergyKind::Potential => &self.potential,
        }
    }
}
