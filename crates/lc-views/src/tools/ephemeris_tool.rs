//! Click and drag editing of the ephemeris shown in a phase viewer
//!
//! A click shifts `t0` so the clicked phase lands on the target phase (0.5,
//! or 0.0 with alt/meta held). Dragging horizontally scales the period in
//! proportion to the phase travelled since the drag started. Period updates
//! are rate limited; the host calls [`ViewerTool::tick`] so a deferred update
//! is applied once its window has passed.

use std::sync::Arc;
use std::time::Instant;

use lc_core::{EphemerisParameters, EphemerisStore, EventBus, ViewerRenamed};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::{GestureEvent, GestureKind, ViewerTool};
use crate::{ephemeris_component, Debouncer, GestureConfig};

/// Phase and period captured when a drag starts
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    start_phase: f64,
    start_period: f64,
}

/// Gesture handler editing the ephemeris of one phase viewer
pub struct EphemerisGesture {
    store: Arc<dyn EphemerisStore>,
    viewer_ref: String,
    /// Component derived from `viewer_ref`, cleared when the viewer is renamed
    component: Option<String>,
    drag: Option<DragState>,
    limiter: Debouncer<f64>,
    active: bool,
    config: GestureConfig,
}

impl EphemerisGesture {
    pub fn new(store: Arc<dyn EphemerisStore>, viewer_ref: impl Into<String>) -> Self {
        Self::with_config(store, viewer_ref, GestureConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn EphemerisStore>,
        viewer_ref: impl Into<String>,
        config: GestureConfig,
    ) -> Self {
        Self {
            store,
            viewer_ref: viewer_ref.into(),
            component: None,
            drag: None,
            limiter: Debouncer::new(config.debounce_interval()),
            active: false,
            config,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Ephemeris component edited by this gesture
    pub fn ephemeris_component(&mut self) -> Option<&str> {
        if self.component.is_none() {
            self.component = ephemeris_component(&self.viewer_ref).map(str::to_string);
        }
        self.component.as_deref()
    }

    /// Whether a derived component is currently cached
    pub fn has_cached_component(&self) -> bool {
        self.component.is_some()
    }

    /// Invalidate the cached component after a viewer rename
    pub fn on_viewer_renamed(&mut self, old_viewer_ref: &str, new_viewer_ref: &str) {
        if old_viewer_ref == self.viewer_ref {
            self.viewer_ref = new_viewer_ref.to_string();
        } else if new_viewer_ref != self.viewer_ref {
            return;
        }
        debug!(
            "Viewer renamed from '{}' to '{}', clearing cached ephemeris component",
            old_viewer_ref, new_viewer_ref
        );
        self.component = None;
    }

    /// Component name and parameters, if both are available
    fn current(&mut self) -> Option<(String, EphemerisParameters)> {
        let component = self.ephemeris_component()?.to_string();
        let Some(ephemeris) = self.store.get(&component) else {
            debug!("No ephemeris '{}' for viewer '{}'", component, self.viewer_ref);
            return None;
        };
        if !ephemeris.is_valid() {
            debug!("Ephemeris '{}' is not usable: {:?}", component, ephemeris);
            return None;
        }
        Some((component, ephemeris))
    }

    fn on_click(&mut self, event: &GestureEvent) {
        let Some((component, ephemeris)) = self.current() else {
            return;
        };
        let target = if event.modifiers.alt || event.modifiers.meta {
            self.config.modified_click_target_phase
        } else {
            self.config.click_target_phase
        };
        let t0 = ephemeris.t0 + ephemeris.period * (event.domain_x - target);
        debug!("Click at phase {} moves t0 of '{}' to {}", event.domain_x, component, t0);
        self.store.update(&component, Some(t0), None);
    }

    fn on_drag_start(&mut self, event: &GestureEvent) {
        self.limiter.reset();
        self.drag = self.current().map(|(_, ephemeris)| DragState {
            start_phase: event.domain_x,
            start_period: ephemeris.period,
        });
    }

    fn on_drag_move(&mut self, event: &GestureEvent, now: Instant) {
        let Some(drag) = self.drag else {
            debug!("Drag move without a drag start, starting a new drag");
            self.on_drag_start(event);
            return;
        };
        let delta = event.domain_x - drag.start_phase;
        let period = drag.start_period * (1.0 + delta / self.config.period_sensitivity);
        if let Some(period) = self.limiter.submit(now, period) {
            self.apply_period(period);
        }
    }

    /// Finish a drag
    ///
    /// The drag end itself sets nothing. A move still held back by the rate
    /// limiter is applied here, so the last period the user dragged to is not
    /// lost.
    fn on_drag_end(&mut self) {
        if let Some(period) = self.limiter.flush() {
            self.apply_period(period);
        }
        self.drag = None;
    }

    fn apply_period(&mut self, period: f64) {
        let Some(component) = self.ephemeris_component().map(str::to_string) else {
            return;
        };
        debug!("Drag sets period of '{}' to {}", component, period);
        self.store.update(&component, None, Some(period));
    }
}

impl ViewerTool for EphemerisGesture {
    fn tool_id(&self) -> &str {
        "lcviz:ephem"
    }

    fn tooltip(&self) -> &str {
        "Click to set the phase of the clicked point (alt to zero), \
         drag horizontally to adjust the period"
    }

    fn viewer_ref(&self) -> &str {
        &self.viewer_ref
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn activate(&mut self) {
        self.active = true;
        info!("Ephemeris gesture active on '{}'", self.viewer_ref);
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.drag = None;
        self.limiter.reset();
        info!("Ephemeris gesture inactive on '{}'", self.viewer_ref);
    }

    fn handle_event(&mut self, event: &GestureEvent, now: Instant) {
        if !self.active {
            return;
        }
        if !event.domain_x.is_finite() {
            debug!("Ignoring gesture at non-finite position {}", event.domain_x);
            return;
        }
        match event.kind {
            GestureKind::Click => self.on_click(event),
            GestureKind::DragStart => self.on_drag_start(event),
            GestureKind::DragMove => self.on_drag_move(event, now),
            GestureKind::DragEnd => self.on_drag_end(),
        }
    }

    fn tick(&mut self, now: Instant) {
        if let Some(period) = self.limiter.poll(now) {
            self.apply_period(period);
        }
    }
}

/// Clear the gesture's cached component whenever a viewer is renamed
pub fn subscribe_to_renames(gesture: &Arc<Mutex<EphemerisGesture>>, events: &EventBus) {
    let gesture = Arc::downgrade(gesture);
    events.subscribe_fn::<ViewerRenamed, _>(move |event| {
        if let Some(gesture) = gesture.upgrade() {
            gesture
                .lock()
                .on_viewer_renamed(&event.old_viewer_ref, &event.new_viewer_ref);
        }
    });
}
