//! Inverse-temperature stepping for the Bloch propagation.

use tracing::{debug, info};

use crate::error::{Result, WignerError};

/// Inverse temperature increment used when none is requested.
pub const DEFAULT_DBETA: f64 = 0.01;

/// Relative distance from an integer below which 1/(kT dβ) counts as whole.
const WHOLE_STEPS_TOLERANCE: f64 = 1e-9;

/// Validated (dβ, step count) pair with `num_beta_steps · dbeta · kt == 1`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TemperatureSchedule {
    pub kt: f64,
    pub dbeta: f64,
    pub num_beta_steps: usize,
}

impl TemperatureSchedule {
    /// Resolve the schedule for temperature `kt`.
    ///
    /// The step count is 1/(kT dβ) rounded to the nearest integer (at least
    /// one) and dβ is then recomputed as 1/(kT n), so the propagation ends
    /// exactly at β = 1/kT rather than leaving a fractional step behind.
    pub fn resolve(kt: Option<f64>, dbeta: Option<f64>) -> Result<Self> {
        let kt = kt.ok_or_else(|| WignerError::config("temperature (kT) was not specified"))?;
        if kt.is_nan() {
            return Err(WignerError::config("temperature (kT) is not a number"));
        }
        if kt <= 0.0 {
            return Err(WignerError::UnsupportedMode(format!(
                "the ground state (kT = {kt}) Wigner function is not implemented; \
                 kT must be positive"
            )));
        }
        if kt.is_infinite() {
            return Err(WignerError::config("temperature (kT) must be finite"));
        }

        let requested = dbeta.unwrap_or(DEFAULT_DBETA);
        if !(requested.is_finite() && requested > 0.0) {
            return Err(WignerError::config(format!(
                "inverse temperature increment (dbeta) must be positive, got {requested}"
            )));
        }

        let raw_steps = 1.0 / (kt * requested);
        if !raw_steps.is_finite() || raw_steps > usize::MAX as f64 {
            return Err(WignerError::config(format!(
                "kT = {kt} with dbeta = {requested} needs too many steps"
            )));
        }
        let rounded = raw_steps.round().max(1.0);
        let num_beta_steps = rounded as usize;
        let dbeta = 1.0 / (kt * rounded);

        if (raw_steps - rounded).abs() > WHOLE_STEPS_TOLERANCE * raw_steps.max(1.0) {
            info!(
                requested,
                adjusted = dbeta,
                num_beta_steps,
                "dbeta adjusted so that a whole number of steps reaches beta = 1/kT"
            );
        } else {
            debug!(dbeta, num_beta_steps, "temperature schedule");
        }

        Ok(Self {
            kt,
            dbeta,
            num_beta_steps,
        })
    }

    /// Target inverse temperature 1/kT.
    pub fn beta(&self) -> f64 {
        1.0 / self.kt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand_distr::{Distribution, Uniform};

    #[test]
    fn test_whole_step_count_kept() {
        let s = TemperatureSchedule::resolve(Some(0.5), None).unwrap();
        assert_eq!(s.num_beta_steps, 200);
        assert_relative_eq!(s.dbeta, DEFAULT_DBETA, epsilon = 1e-15);
    }

    #[test]
    fn test_fractional_step_count_rounded() {
        let s = TemperatureSchedule::resolve(Some(0.3), Some(0.01)).unwrap();
        assert_eq!(s.num_beta_steps, 333);
        assert_relative_eq!(s.dbeta, 1.0 / (0.3 * 333.0), epsilon = 1e-15);

        // rounds up as well as down
        let s = TemperatureSchedule::resolve(Some(1.0), Some(0.0015)).unwrap();
        assert_eq!(s.num_beta_steps, 667);
    }

    #[test]
    fn test_at_least_one_step() {
        let s = TemperatureSchedule::resolve(Some(50.0), Some(0.1)).unwrap();
        assert_eq!(s.num_beta_steps, 1);
        assert_relative_eq!(s.dbeta, 0.02, epsilon = 1e-15);
    }

    #[test]
    fn test_exactness_for_random_inputs() {
        let mut rng = rand::thread_rng();
        let kts = Uniform::new(0.01, 10.0);
        let dbetas = Uniform::new(1e-4, 0.5);
        for _ in 0..1000 {
            let kt = kts.sample(&mut rng);
            let s = TemperatureSchedule::resolve(Some(kt), Some(dbetas.sample(&mut rng))).unwrap();
            assert!(s.num_beta_steps >= 1);
            assert_relative_eq!(s.num_beta_steps as f64 * s.dbeta * kt, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invalid_temperatures() {
        assert!(matches!(
            TemperatureSchedule::resolve(None, None),
            Err(WignerError::Configuration(_))
        ));
        assert!(matches!(
            TemperatureSchedule::resolve(Some(0.0), None),
            Err(WignerError::UnsupportedMode(_))
        ));
        assert!(matches!(
            TemperatureSchedule::resolve(Some(-1.0), None),
            Err(WignerError::UnsupportedMode(_))
        ));
        assert!(matches!(
            TemperatureSchedule::resolve(Some(f64::NAN), None),
            Err(WignerError::Configuration(_))
        ));
        assert!(matches!(
            TemperatureSchedule::resolve(Some(1.0), Some(0.0)),
            Err(WignerError::Configuration(_))
        ));
    }
}
