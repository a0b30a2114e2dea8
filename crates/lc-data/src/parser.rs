//! Loading light curves into the data collection

use tracing::{debug, info};

use crate::config::TPF;
use crate::{
    DataCollection, DataError, LightCurve, LightCurveHandler, ParserConfig, Result, TargetPixelFile,
    FLUX_ORIGIN,
};

/// Column holding a copy of the generic flux
const FLUX_ORIG: &str = "flux:orig";
const FLUX_ORIG_ERR: &str = "flux:orig_err";

/// Something the parser can load
#[derive(Debug, Clone)]
pub enum ParserInput {
    LightCurve(LightCurve),
    TargetPixelFile(TargetPixelFile),
}

impl From<LightCurve> for ParserInput {
    fn from(light_curve: LightCurve) -> Self {
        ParserInput::LightCurve(light_curve)
    }
}

impl From<TargetPixelFile> for ParserInput {
    fn from(tpf: TargetPixelFile) -> Self {
        ParserInput::TargetPixelFile(tpf)
    }
}

/// Keep a copy of a generic `flux` column under `flux:orig`
///
/// Selecting another flux column overwrites `flux`, so the generic values are
/// copied first and `FLUX_ORIGIN` is pointed at the copy. Returns whether a
/// copy was made.
pub fn preserve_flux_origin(light_curve: &mut LightCurve) -> bool {
    let origin = light_curve.meta.get(FLUX_ORIGIN).and_then(|v| v.as_str());
    let generic = match origin {
        Some(origin) => origin == "flux",
        None => light_curve.has_column("flux"),
    };
    if !generic {
        return false;
    }

    let flux = light_curve.flux.clone();
    let flux_err = light_curve.flux_err.clone();
    // Lengths match the timestamps already, so neither insert can fail
    if light_curve.set_column(FLUX_ORIG, flux).is_err()
        || light_curve.set_column(FLUX_ORIG_ERR, flux_err).is_err()
    {
        return false;
    }
    light_curve
        .meta
        .insert(FLUX_ORIGIN.to_string(), serde_json::Value::String(FLUX_ORIG.to_string()));
    true
}

/// Load a light curve (or a target pixel file) into `collection`
///
/// The label comes from `data_label`, then the `OBJECT` metadata entry, then
/// the configured default. The table shares the reference time of the data
/// already loaded so every curve lines up on one relative axis. Returns the
/// label the data was stored under. Timestamps on another time scale than
/// the shared reference are converted onto it.
pub fn light_curve_parser(
    collection: &mut DataCollection,
    input: impl Into<ParserInput>,
    data_label: Option<&str>,
    config: &ParserConfig,
) -> Result<String> {
    let mut light_curve = match input.into() {
        ParserInput::LightCurve(light_curve) => light_curve,
        ParserInput::TargetPixelFile(tpf) => {
            if !config.features.is_enabled(TPF) {
                return Err(DataError::FeatureDisabled("Target pixel file".to_string()));
            }
            debug!("Summing target pixel file with {} cadences", tpf.time.len());
            tpf.to_light_curve()?
        }
    };

    let label = data_label
        .map(str::to_string)
        .or_else(|| {
            light_curve
                .meta
                .get("OBJECT")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| config.default_label.clone());

    if preserve_flux_origin(&mut light_curve) {
        debug!("Preserved generic flux of '{}' as '{}'", label, FLUX_ORIG);
    }

    let reference_time = collection.first_reference_time();
    let handler = LightCurveHandler::with_unit(config.time_unit);
    let data = handler.to_table_with_reference(&light_curve, reference_time)?;
    let label = collection.add_data(data, &label);
    info!("Loaded light curve '{}' with {} samples", label, light_curve.len());

    if config.show_in_viewer {
        collection.add_data_to_viewer(&config.time_viewer_ref, &label)?;
        for viewer_ref in &config.phase_viewer_refs {
            collection.add_data_to_viewer(viewer_ref, &label)?;
        }
    }
    Ok(label)
}
