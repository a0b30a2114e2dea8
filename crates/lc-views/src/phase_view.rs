//! Phase-folded presentation of light-curve tables

use std::sync::Arc;

use ahash::AHashMap;
use lc_core::{
    DataAddedToViewer, EphemerisParameters, EphemerisStore, EphemerisSubscriber, EventBus,
    PhaseAxis, ViewerRenamed,
};
use lc_data::table::DataId;
use lc_data::DataTable;
use parking_lot::RwLock;
use tracing::debug;

use crate::ephemeris_component;

/// A flux-vs-phase viewer bound to one ephemeris component
///
/// Folded axes are cached per table and dropped whenever the component's
/// ephemeris changes or the component goes away. Register the view with
/// [`lc_core::EphemerisRegistry::add_subscriber`] to receive those changes.
pub struct PhaseView {
    viewer_ref: RwLock<String>,
    store: Arc<dyn EphemerisStore>,
    folded: RwLock<AHashMap<DataId, Arc<PhaseAxis>>>,
    /// Labels of the data shown in this viewer, in the order they arrived
    shown: RwLock<Vec<String>>,
}

impl PhaseView {
    pub fn new(store: Arc<dyn EphemerisStore>, viewer_ref: impl Into<String>) -> Self {
        Self {
            viewer_ref: RwLock::new(viewer_ref.into()),
            store,
            folded: RwLock::new(AHashMap::new()),
            shown: RwLock::new(Vec::new()),
        }
    }

    pub fn viewer_ref(&self) -> String {
        self.viewer_ref.read().clone()
    }

    /// Ephemeris component named by the viewer reference
    pub fn component(&self) -> Option<String> {
        ephemeris_component(&self.viewer_ref.read()).map(str::to_string)
    }

    /// Current parameters of the viewer's component
    pub fn ephemeris(&self) -> Option<EphemerisParameters> {
        self.store.get(&self.component()?)
    }

    /// Fold a table's time axis, `None` when the viewer has no ephemeris
    pub fn fold(&self, data: &DataTable) -> Option<Arc<PhaseAxis>> {
        let ephemeris = self.ephemeris()?;
        if let Some(folded) = self.folded.read().get(&data.id()) {
            if folded.ephemeris() == ephemeris {
                return Some(folded.clone());
            }
        }

        let folded = Arc::new(PhaseAxis::fold(data.coords(), ephemeris));
        self.folded.write().insert(data.id(), folded.clone());
        Some(folded)
    }

    /// `(phase, value)` pairs of a column, sorted by phase
    pub fn folded_column(
        &self,
        data: &DataTable,
        column: &str,
    ) -> lc_data::Result<Vec<(f64, f64)>> {
        let values = data.float_values(column)?;
        let Some(folded) = self.fold(data) else {
            return Ok(Vec::new());
        };
        Ok(folded
            .sorted_rows()
            .into_iter()
            .map(|row| (folded.phases()[row], values[row]))
            .collect())
    }

    /// Follow a viewer rename
    pub fn on_viewer_renamed(&self, old_viewer_ref: &str, new_viewer_ref: &str) {
        let mut viewer_ref = self.viewer_ref.write();
        if *viewer_ref == old_viewer_ref {
            *viewer_ref = new_viewer_ref.to_string();
            self.folded.write().clear();
        }
    }

    /// Record data attached to a viewer, ignoring other viewers
    pub fn on_data_added(&self, label: &str, viewer_ref: &str) {
        if *self.viewer_ref.read() != viewer_ref {
            return;
        }
        let mut shown = self.shown.write();
        if !shown.iter().any(|l| l == label) {
            debug!("'{}' now shows '{}'", viewer_ref, label);
            shown.push(label.to_string());
        }
    }

    /// Labels of the data shown in this viewer
    pub fn labels(&self) -> Vec<String> {
        self.shown.read().clone()
    }

    /// Number of cached folds
    pub fn cached_folds(&self) -> usize {
        self.folded.read().len()
    }
}

impl EphemerisSubscriber for PhaseView {
    fn on_ephemeris_change(&self, component: &str, ephemeris: &EphemerisParameters) {
        if self.component().as_deref() != Some(component) {
            return;
        }
        debug!(
            "Refolding '{}' for t0={} period={}",
            self.viewer_ref.read(),
            ephemeris.t0,
            ephemeris.period
        );
        self.folded.write().clear();
    }

    fn on_ephemeris_removed(&self, component: &str) {
        if self.component().as_deref() == Some(component) {
            debug!("Ephemeris of '{}' removed", self.viewer_ref.read());
            self.folded.write().clear();
        }
    }
}

/// Keep a phase view in step with viewer renames and data attached to it
pub fn subscribe_phase_view(view: &Arc<PhaseView>, events: &EventBus) {
    let renamed = Arc::downgrade(view);
    events.subscribe_fn::<ViewerRenamed, _>(move |event| {
        if let Some(view) = renamed.upgrade() {
            view.on_viewer_renamed(&event.old_viewer_ref, &event.new_viewer_ref);
        }
    });
    let added = Arc::downgrade(view);
    events.subscribe_fn::<DataAddedToViewer, _>(move |event| {
        if let Some(view) = added.upgrade() {
            view.on_data_added(&event.label, &event.viewer_ref);
        }
    });
}
