//! Opt-in switches for experimental data types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Target pixel file support
pub const TPF: &str = "tpf";

/// Feature flag configuration
///
/// Only features registered in the default set can be enabled; unknown names
/// are ignored so stale configuration cannot invent features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFlags {
    enabled: IndexMap<String, bool>,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enabled: IndexMap::from([(TPF.to_string(), false)]),
        }
    }
}

impl FeatureFlags {
    /// Check if a feature is currently enabled
    pub fn is_enabled(&self, feature: &str) -> bool {
        self.enabled.get(feature).copied().unwrap_or(false)
    }

    /// Enable features for the lifetime of this configuration
    pub fn enable(&mut self, features: &[&str]) {
        for feature in features {
            match self.enabled.get_mut(*feature) {
                Some(flag) => *flag = true,
                None => debug!("Ignoring unknown feature flag '{}'", feature),
            }
        }
    }

    /// Run `f` with features enabled, restoring the previous flags afterwards
    pub fn temporarily_enabled<R>(&mut self, features: &[&str], f: impl FnOnce(&Self) -> R) -> R {
        let previous = self.enabled.clone();
        self.enable(features);
        let result = f(self);
        self.enabled = previous;
        result
    }

    /// Names of all known features
    pub fn known_features(&self) -> impl Iterator<Item = &str> {
        self.enabled.keys().map(String::as_str)
    }
}
