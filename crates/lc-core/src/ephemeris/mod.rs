//! Ephemerides used to phase-fold light curves

use serde::{Deserialize, Serialize};

use crate::{CoreError, Result};

mod phase;
mod registry;

pub use phase::PhaseAxis;
pub use registry::{EphemerisRegistry, EphemerisSubscriber};

/// Reference epoch and period of a periodic signal
///
/// Both values are in the unit of the relative time axis the ephemeris is
/// applied to, with `t0` measured from that axis' reference time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EphemerisParameters {
    pub t0: f64,
    pub period: f64,
}

impl Default for EphemerisParameters {
    fn default() -> Self {
        Self {
            t0: 0.0,
            period: 1.0,
        }
    }
}

impl EphemerisParameters {
    /// Create validated parameters
    pub fn new(t0: f64, period: f64) -> Result<Self> {
        let params = Self { t0, period };
        if !params.is_valid() {
            return Err(CoreError::InvalidInput(format!(
                "ephemeris needs a finite t0 and a positive finite period, got t0={} period={}",
                t0, period
            )));
        }
        Ok(params)
    }

    pub fn is_valid(&self) -> bool {
        self.t0.is_finite() && self.period.is_finite() && self.period > 0.0
    }

    /// Phase of a relative time in `[0, 1)`
    pub fn phase_of(&self, time: f64) -> f64 {
        let phase = ((time - self.t0) / self.period).rem_euclid(1.0);
        // rem_euclid rounds tiny negative inputs up to exactly 1.0
        if phase >= 1.0 {
            0.0
        } else {
            phase
        }
    }

    /// Whole cycles elapsed since `t0`
    pub fn cycle_of(&self, time: f64) -> i64 {
        ((time - self.t0) / self.period).floor() as i64
    }
}

/// Store of named ephemeris components owned outside the gesture handlers
///
/// Updates take `&self`; implementations hold their own interior locking so a
/// store can be shared between viewers.
pub trait EphemerisStore: Send + Sync {
    /// Current parameters of a component, `None` if it is unknown
    fn get(&self, component: &str) -> Option<EphemerisParameters>;

    /// Request an update of one or both parameters of a component
    fn update(&self, component: &str, t0: Option<f64>, period: Option<f64>);
}
