//! Coordinate systems handed to the visualization framework
//!
//! The framework works on pixel (array index) and world (physical) values.
//! Implementations convert between the two for each axis they describe.

use std::fmt::Debug;

use crate::Result;

mod interp;
mod time_axis;

pub use interp::interp;
pub use time_axis::TimeAxis;

/// Trait for coordinate systems attached to a table
///
/// Values that have no counterpart on the other side of the mapping come back
/// as `NaN`, which is how the framework marks "no corresponding sample".
pub trait Coordinates: Send + Sync + Debug {
    /// Number of axes described by this coordinate system
    fn n_dim(&self) -> usize;

    /// Unit string of each world axis
    fn world_axis_units(&self) -> Vec<String>;

    /// Convert pixel values (one slice per axis) to world values
    fn pixel_to_world_values(&self, pixel: &[&[f64]]) -> Result<Vec<f64>>;

    /// Convert world values (one slice per axis) to pixel values
    fn world_to_pixel_values(&self, world: &[&[f64]]) -> Result<Vec<f64>>;
}
