//! Target pixel files: per-cadence pixel stamps around a target

use lc_core::Time;

use crate::{DataError, LightCurve, Meta, Quantity, Result};

/// Pixel fluxes for every cadence of an observation
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPixelFile {
    pub time: Vec<Time>,
    /// One flattened pixel stamp per cadence
    pub flux: Vec<Vec<f64>>,
    /// Uncertainties aligned with `flux`
    pub flux_err: Vec<Vec<f64>>,
    pub flux_unit: String,
    pub quality: Option<Vec<i32>>,
    pub meta: Meta,
}

impl TargetPixelFile {
    /// Sum every pixel of each cadence into a light curve
    ///
    /// NaN pixels are skipped; uncertainties add in quadrature.
    pub fn to_light_curve(&self) -> Result<LightCurve> {
        if self.flux.len() != self.time.len() || self.flux_err.len() != self.time.len() {
            return Err(DataError::InvalidInput(format!(
                "target pixel file has {} cadences but {} flux and {} error stamps",
                self.time.len(),
                self.flux.len(),
                self.flux_err.len()
            )));
        }

        let flux: Vec<f64> = self
            .flux
            .iter()
            .map(|stamp| stamp.iter().filter(|v| !v.is_nan()).sum())
            .collect();
        let flux_err: Vec<f64> = self
            .flux_err
            .iter()
            .map(|stamp| {
                stamp
                    .iter()
                    .filter(|v| !v.is_nan())
                    .map(|v| v * v)
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();

        let mut light_curve = LightCurve::new(
            self.time.clone(),
            Quantity::new(flux, self.flux_unit.clone()),
            Quantity::new(flux_err, self.flux_unit.clone()),
        )?
        .with_meta(self.meta.clone());
        if let Some(quality) = &self.quality {
            light_curve = light_curve.with_quality(quality.clone())?;
        }
        Ok(light_curve)
    }
}
