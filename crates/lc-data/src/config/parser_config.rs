//! Configuration for loading light curves into the viewer

use lc_core::TimeUnit;
use serde::{Deserialize, Serialize};

use super::FeatureFlags;
use crate::Result;

/// Light-curve loading configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Label used when neither the caller nor the metadata names the data
    pub default_label: String,

    /// Reference of the flux-vs-time viewer
    pub time_viewer_ref: String,

    /// References of the phase viewers that also receive new data
    pub phase_viewer_refs: Vec<String>,

    /// Whether loaded data is added to viewers
    pub show_in_viewer: bool,

    /// Unit of the relative time axis
    pub time_unit: TimeUnit,

    /// Experimental data types
    pub features: FeatureFlags,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_label: "Light curve".to_string(),
            time_viewer_ref: "flux-vs-time".to_string(),
            phase_viewer_refs: Vec::new(),
            show_in_viewer: true,
            time_unit: TimeUnit::Day,
            features: FeatureFlags::default(),
        }
    }
}

impl ParserConfig {
    /// Parse a configuration from JSON, filling gaps with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a phase viewer reference if it is not already known
    pub fn add_phase_viewer(&mut self, viewer_ref: impl Into<String>) {
        let viewer_ref = viewer_ref.into();
        if !self.phase_viewer_refs.contains(&viewer_ref) {
            self.phase_viewer_refs.push(viewer_ref);
        }
    }
}
