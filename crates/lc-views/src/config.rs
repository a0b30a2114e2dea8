//! Gesture configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning of the ephemeris gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum wall time between period updates while dragging
    pub debounce_ms: u64,

    /// Phase offset that changes the period by 1/sensitivity of itself
    pub period_sensitivity: f64,

    /// Phase a plain click moves to the clicked point
    pub click_target_phase: f64,

    /// Phase an alt or meta click moves to the clicked point
    pub modified_click_target_phase: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            period_sensitivity: 10.0,
            click_target_phase: 0.5,
            modified_click_target_phase: 0.0,
        }
    }
}

impl GestureConfig {
    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
