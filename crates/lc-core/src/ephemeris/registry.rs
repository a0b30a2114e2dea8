//! In-memory ephemeris store

use std::sync::{Arc, Weak};

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::{EphemerisParameters, EphemerisStore};

/// Trait for components that need to respond to ephemeris changes
pub trait EphemerisSubscriber: Send + Sync {
    /// Called after a component's parameters changed
    fn on_ephemeris_change(&self, component: &str, ephemeris: &EphemerisParameters);

    /// Called after a component was removed or renamed away
    fn on_ephemeris_removed(&self, _component: &str) {}
}

/// Named ephemeris components shared between phase viewers
pub struct EphemerisRegistry {
    components: Arc<RwLock<AHashMap<String, EphemerisParameters>>>,
    subscribers: Arc<RwLock<Vec<Weak<dyn EphemerisSubscriber>>>>,
}

impl EphemerisRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            components: Arc::new(RwLock::new(AHashMap::new())),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Add or replace a component
    pub fn add_component(&self, component: impl Into<String>, ephemeris: EphemerisParameters) {
        let component = component.into();
        self.components.write().insert(component.clone(), ephemeris);
        self.notify_subscribers(&component, &ephemeris);
    }

    /// Remove a component, returning its last parameters
    pub fn remove_component(&self, component: &str) -> Option<EphemerisParameters> {
        let removed = self.components.write().remove(component)?;
        debug!("Ephemeris '{}' removed", component);
        self.notify_removed(component);
        Some(removed)
    }

    /// Rename a component, keeping its parameters
    ///
    /// Subscribers see the old name removed and the new name changed.
    pub fn rename_component(&self, old: &str, new: impl Into<String>) -> bool {
        let new = new.into();
        let mut components = self.components.write();
        let Some(ephemeris) = components.remove(old) else {
            return false;
        };
        components.insert(new.clone(), ephemeris);
        drop(components);

        debug!("Ephemeris '{}' renamed to '{}'", old, new);
        self.notify_removed(old);
        self.notify_subscribers(&new, &ephemeris);
        true
    }

    /// Names of all known components
    pub fn component_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.components.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn EphemerisSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    fn notify_subscribers(&self, component: &str, ephemeris: &EphemerisParameters) {
        for subscriber in self.live_subscribers() {
            subscriber.on_ephemeris_change(component, ephemeris);
        }
    }

    fn notify_removed(&self, component: &str) {
        for subscriber in self.live_subscribers() {
            subscriber.on_ephemeris_removed(component);
        }
    }

    fn live_subscribers(&self) -> Vec<Arc<dyn EphemerisSubscriber>> {
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);
        subscribers.iter().filter_map(Weak::upgrade).collect()
    }
}

impl Default for EphemerisRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EphemerisStore for EphemerisRegistry {
    fn get(&self, component: &str) -> Option<EphemerisParameters> {
        self.components.read().get(component).copied()
    }

    fn update(&self, component: &str, t0: Option<f64>, period: Option<f64>) {
        let mut components = self.components.write();
        let Some(current) = components.get_mut(component) else {
            warn!("Ignoring ephemeris update for unknown component '{}'", component);
            return;
        };

        let candidate = EphemerisParameters {
            t0: t0.unwrap_or(current.t0),
            period: period.unwrap_or(current.period),
        };
        if !candidate.is_valid() {
            warn!(
                "Ignoring invalid ephemeris update for '{}': t0={} period={}",
                component, candidate.t0, candidate.period
            );
            return;
        }

        *current = candidate;
        drop(components);

        debug!(
            "Ephemeris '{}' updated: t0={} period={}",
            component, candidate.t0, candidate.period
        );
        self.notify_subscribers(component, &candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(String, EphemerisParameters)>>,
        removed: Mutex<Vec<String>>,
    }

    impl EphemerisSubscriber for Recorder {
        fn on_ephemeris_change(&self, component: &str, ephemeris: &EphemerisParameters) {
            self.seen.lock().push((component.to_string(), *ephemeris));
        }

        fn on_ephemeris_removed(&self, component: &str) {
            self.removed.lock().push(component.to_string());
        }
    }

    #[test]
    fn test_partial_updates() {
        let registry = EphemerisRegistry::new();
        registry.add_component("default", EphemerisParameters::new(0.0, 10.0).unwrap());

        registry.update("default", Some(2.0), None);
        assert_eq!(registry.get("default"), Some(EphemerisParameters { t0: 2.0, period: 10.0 }));

        registry.update("default", None, Some(8.0));
        assert_eq!(registry.get("default"), Some(EphemerisParameters { t0: 2.0, period: 8.0 }));
    }

    #[test]
    fn test_invalid_and_unknown_updates_are_ignored() {
        let registry = EphemerisRegistry::new();
        registry.add_component("default", EphemerisParameters::default());

        registry.update("default", None, Some(-1.0));
        registry.update("default", Some(f64::INFINITY), None);
        registry.update("missing", Some(1.0), None);

        assert_eq!(registry.get("default"), Some(EphemerisParameters::default()));
        assert_eq!(registry.get("missing"), None);
    }

    #[test]
    fn test_subscribers_are_notified() {
        let registry = EphemerisRegistry::new();
        let recorder = Arc::new(Recorder::default());
        registry.add_subscriber(recorder.clone());

        registry.add_component("default", EphemerisParameters::default());
        registry.update("default", Some(0.25), None);

        let seen = recorder.seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].0, "default");
        assert_eq!(seen[1].1.t0, 0.25);
    }

    #[test]
    fn test_rename_component() {
        let registry = EphemerisRegistry::new();
        registry.add_component("default", EphemerisParameters::default());
        assert!(registry.rename_component("default", "planet b"));
        assert!(!registry.rename_component("default", "other"));
        assert_eq!(registry.component_names(), vec!["planet b".to_string()]);
    }

    #[test]
    fn test_remove_and_rename_notify_subscribers() {
        let registry = EphemerisRegistry::new();
        let recorder = Arc::new(Recorder::default());
        registry.add_component("default", EphemerisParameters::new(1.0, 2.0).unwrap());
        registry.add_component("other", EphemerisParameters::default());
        registry.add_subscriber(recorder.clone());

        assert!(registry.rename_component("default", "planet b"));
        assert_eq!(*recorder.removed.lock(), vec!["default".to_string()]);
        assert_eq!(recorder.seen.lock().last().unwrap().0, "planet b");
        assert_eq!(recorder.seen.lock().last().unwrap().1.period, 2.0);

        assert_eq!(registry.remove_component("other"), Some(EphemerisParameters::default()));
        assert_eq!(registry.remove_component("other"), None);
        assert!(!registry.rename_component("missing", "anything"));
        assert_eq!(*recorder.removed.lock(), vec!["default".to_string(), "other".to_string()]);
    }
}
