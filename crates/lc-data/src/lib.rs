//! Light-curve data model and its translation to the viewer's tables

pub mod collection;
pub mod config;
pub mod light_curve;
pub mod parser;
pub mod table;
pub mod target_pixel;
pub mod translator;

use arrow::error::ArrowError;
use lc_core::CoreError;
use thiserror::Error;

// Re-exports
pub use collection::DataCollection;
pub use config::{FeatureFlags, ParserConfig};
pub use light_curve::{LightCurve, Meta, Quantity};
pub use parser::{light_curve_parser, preserve_flux_origin, ParserInput};
pub use table::{DataOrSubset, DataTable, Mask, Subset};
pub use target_pixel::TargetPixelFile;
pub use translator::{Attribute, LightCurveHandler};

/// Metadata key naming the column the active flux came from
pub const FLUX_ORIGIN: &str = "FLUX_ORIGIN";
/// Metadata key holding the origin of the relative time axis
pub const REFERENCE_TIME: &str = "reference_time";
/// Metadata key describing what the uncertainty column means
pub const UNCERTAINTY_TYPE: &str = "uncertainty_type";

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Table has more than one column ({0}) and none is named flux, uncertainty or quality, \
         so you will need to specify which one to use as the flux using the `attribute` argument"
    )]
    AmbiguousAttribute(String),

    #[error("Table has no columns")]
    EmptyAttributes,

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Unknown dataset '{0}'")]
    UnknownData(String),

    #[error("{0} support is not enabled")]
    FeatureDisabled(String),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<CoreError> for DataError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidInput(message) => DataError::InvalidInput(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
