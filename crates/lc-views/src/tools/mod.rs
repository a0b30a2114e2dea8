//! Interactive tools attached to viewers

use std::time::Instant;

mod ephemeris_tool;
mod events;

pub use ephemeris_tool::{subscribe_to_renames, EphemerisGesture};
pub use events::{GestureEvent, GestureKind, Modifiers};

/// Base trait for tools that react to pointer gestures in a viewer
pub trait ViewerTool: Send + Sync {
    /// Identifier used by the host toolbar
    fn tool_id(&self) -> &str;

    /// Short description shown on hover
    fn tooltip(&self) -> &str;

    /// Reference of the viewer the tool is attached to
    fn viewer_ref(&self) -> &str;

    fn is_active(&self) -> bool;

    /// Start listening to gestures
    fn activate(&mut self);

    /// Stop listening to gestures and drop any in-progress interaction
    fn deactivate(&mut self);

    /// Handle one gesture observed at `now`
    fn handle_event(&mut self, event: &GestureEvent, now: Instant);

    /// Called periodically by the host so deferred work can complete
    fn tick(&mut self, _now: Instant) {}
}
