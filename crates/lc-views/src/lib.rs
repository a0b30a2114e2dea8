//! Viewer-side interaction for light curves: phase viewers and the gesture
//! tool that edits their ephemeris

mod config;
mod debounce;
mod phase_view;
pub mod tools;

pub use config::GestureConfig;
pub use debounce::Debouncer;
pub use phase_view::{subscribe_phase_view, PhaseView};
pub use tools::{EphemerisGesture, GestureEvent, GestureKind, Modifiers, ViewerTool};

/// Ephemeris component named by a viewer reference
///
/// Phase viewer references look like `flux-vs-phase:<component>`; references
/// without a component (or with an empty one) yield `None`.
pub fn ephemeris_component(viewer_ref: &str) -> Option<&str> {
    viewer_ref
        .split(':')
        .nth(1)
        .filter(|component| !component.is_empty())
}
