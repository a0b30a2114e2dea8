//! Core functionality for the light-curve viewer
//!
//! This crate provides the time model, the time coordinate system handed to
//! the visualization framework, the ephemeris model used for phase-folding,
//! and the event bus that carries viewer notifications.

pub mod coordinates;
pub mod ephemeris;
pub mod error;
pub mod events;
pub mod time;

// Re-export commonly used types
pub use coordinates::{Coordinates, TimeAxis};
pub use ephemeris::{
    EphemerisParameters, EphemerisRegistry, EphemerisStore, EphemerisSubscriber, PhaseAxis,
};
pub use error::{CoreError, Result};
pub use events::{DataAdded, DataAddedToViewer, EventBus, ViewerRenamed};
pub use time::{Time, TimeScale, TimeUnit};
