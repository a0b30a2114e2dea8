//! Translation between light curves and viewer tables
//!
//! A light curve becomes a [`DataTable`] with `flux`, `uncertainty`, `dt` and,
//! when present, `quality` columns plus any additional flux columns. The
//! table's [`TimeAxis`] keeps the absolute timestamps, so the reverse
//! translation can rebuild `time` exactly.

use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array};
use lc_core::{Time, TimeAxis, TimeUnit};
use tracing::{debug, warn};

use crate::{
    DataError, DataOrSubset, DataTable, LightCurve, Mask, Quantity, Result, REFERENCE_TIME,
    UNCERTAINTY_TYPE,
};

/// Column names the translator gives special meaning
const FLUX: &str = "flux";
const UNCERTAINTY: &str = "uncertainty";
const QUALITY: &str = "quality";
const DT: &str = "dt";

/// Explicit choice of the table columns to read back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// A single column
    Column(String),
    /// Several columns, in order
    Columns(Vec<String>),
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        Attribute::Column(name.to_string())
    }
}

impl From<Vec<String>> for Attribute {
    fn from(names: Vec<String>) -> Self {
        Attribute::Columns(names)
    }
}

/// Translates between [`LightCurve`] objects and [`DataTable`]s
#[derive(Debug, Clone, Default)]
pub struct LightCurveHandler {
    /// Unit of the relative time axis and the `dt` column
    unit: TimeUnit,
}

impl LightCurveHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(unit: TimeUnit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Convert a light curve into a table, relative to its first timestamp
    pub fn to_table(&self, light_curve: &LightCurve) -> Result<DataTable> {
        self.to_table_with_reference(light_curve, None)
    }

    /// Convert a light curve into a table relative to `reference_time`
    ///
    /// Sharing one reference time lets several tables line up on the same
    /// relative axis.
    pub fn to_table_with_reference(
        &self,
        light_curve: &LightCurve,
        reference_time: Option<Time>,
    ) -> Result<DataTable> {
        let axis = Arc::new(TimeAxis::with_reference(
            light_curve.time.clone(),
            reference_time,
            self.unit,
        )?);
        let mut data = DataTable::new(axis.clone())?;

        let meta = data.meta_mut();
        meta.extend(light_curve.meta.iter().map(|(k, v)| (k.clone(), v.clone())));
        meta.insert(REFERENCE_TIME.to_string(), serde_json::to_value(axis.reference_time())?);
        meta.insert(UNCERTAINTY_TYPE.to_string(), serde_json::Value::from("std"));

        data.add_quantity(FLUX, light_curve.flux.values(), light_curve.flux.unit())?;
        data.add_quantity(UNCERTAINTY, light_curve.flux_err.values(), light_curve.flux_err.unit())?;
        data.add_quantity(DT, axis.relative_values(), axis.unit().vounit())?;

        if let Some(quality) = &light_curve.quality {
            let array: ArrayRef = Arc::new(Int32Array::from(quality.clone()));
            data.add_column(QUALITY, array, None)?;
        }

        for (name, values) in light_curve.extra_columns() {
            if matches!(name.as_str(), FLUX | UNCERTAINTY | QUALITY | DT) {
                warn!(
                    "Skipping light-curve column '{}' which clashes with a reserved table column",
                    name
                );
                continue;
            }
            data.add_quantity(name, values.values(), values.unit())?;
        }

        debug!(
            "Translated light curve with {} samples into table with columns {:?}",
            light_curve.len(),
            data.column_names()
        );
        Ok(data)
    }

    /// Convert a table, or a subset of one, back into a light curve
    ///
    /// Without an explicit `attribute` a single-column table uses that column;
    /// otherwise the `flux`, `uncertainty` and `quality` columns present are
    /// used, and a table with none of them is ambiguous.
    pub fn to_light_curve<'a>(
        &self,
        data_or_subset: impl Into<DataOrSubset<'a>>,
        attribute: Option<Attribute>,
    ) -> Result<LightCurve> {
        let (data, mask) = data_or_subset.into().into_parts();
        let columns = data.column_names();

        let selected = match attribute {
            Some(Attribute::Column(name)) => vec![name],
            Some(Attribute::Columns(names)) => names,
            None => resolve_attributes(&columns)?,
        };
        if selected.is_empty() {
            return Err(DataError::EmptyAttributes);
        }
        for name in &selected {
            if !data.has_column(name) {
                return Err(DataError::UnknownColumn(name.clone()));
            }
        }

        let time = mask.apply(data.coords().time_axis());
        let size = time.len();

        // Non-standard columns stand in for the flux unless `flux` itself was chosen
        let mut flux_claimed = selected.iter().any(|name| name == FLUX);
        let mut flux = None;
        let mut flux_err = None;
        let mut quality = None;
        let mut extra = Vec::new();

        for name in &selected {
            match name.as_str() {
                QUALITY => {
                    quality = Some(mask.apply(&data.int_values(name)?));
                }
                UNCERTAINTY => {
                    flux_err = Some(self.read_quantity(data, name, &mask)?);
                }
                FLUX => {
                    flux = Some(self.read_quantity(data, name, &mask)?);
                }
                _ if !flux_claimed => {
                    debug!("Using column '{}' as the light-curve flux", name);
                    flux = Some(self.read_quantity(data, name, &mask)?);
                    flux_claimed = true;
                }
                _ => {
                    extra.push((name.clone(), self.read_quantity(data, name, &mask)?));
                }
            }
        }

        let flux = flux.unwrap_or_else(|| Quantity::nan(size, ""));
        let flux_err = flux_err.unwrap_or_else(|| Quantity::nan(size, flux.unit()));

        let mut light_curve = LightCurve::new(time, flux, flux_err)?.with_meta(data.meta().clone());
        if let Some(quality) = quality {
            light_curve = light_curve.with_quality(quality)?;
        }
        for (name, values) in extra {
            light_curve.set_column(name, values)?;
        }

        debug!(
            "Translated table with {} rows into light curve with {} samples",
            data.num_rows(),
            light_curve.len()
        );
        Ok(light_curve)
    }

    fn read_quantity(&self, data: &DataTable, name: &str, mask: &Mask) -> Result<Quantity> {
        let values = mask.apply(&data.float_values(name)?);
        let unit = data.column_unit(name)?.unwrap_or_default();
        Ok(Quantity::new(values, unit))
    }
}

/// Pick the columns to read when the caller did not say
fn resolve_attributes(columns: &[String]) -> Result<Vec<String>> {
    match columns {
        [] => Err(DataError::EmptyAttributes),
        [only] => Ok(vec![only.clone()]),
        _ => {
            let known: Vec<String> = [FLUX, UNCERTAINTY, QUALITY]
                .into_iter()
                .filter(|name| columns.iter().any(|c| c.as_str() == *name))
                .map(String::from)
                .collect();
            if known.is_empty() {
                Err(DataError::AmbiguousAttribute(columns.join(", ")))
            } else {
                Ok(known)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Meta, Subset, FLUX_ORIGIN};
    use arrow::array::Float64Array;

    fn light_curve() -> LightCurve {
        let time = [1000.0, 1000.02, 1000.04, 1000.06, 1000.5]
            .iter()
            .map(|&t| Time::from_btjd(t))
            .collect();
        let mut meta = Meta::new();
        meta.insert("OBJECT".to_string(), serde_json::json!("TIC 1234"));
        LightCurve::new(
            time,
            Quantity::new(vec![1.0, 0.98, 0.97, 1.01, 1.02], "electron / s"),
            Quantity::new(vec![0.01, 0.011, 0.012, 0.01, 0.009], "electron / s"),
        )
        .unwrap()
        .with_quality(vec![0, 0, 512, 0, 1])
        .unwrap()
        .with_meta(meta)
    }

    fn bare_table(names: &[&str]) -> DataTable {
        let times = (0..3).map(|i| Time::from_btjd(i as f64)).collect();
        let mut table = DataTable::new(Arc::new(TimeAxis::new(times).unwrap())).unwrap();
        for (offset, name) in names.iter().enumerate() {
            let values: Vec<f64> = (0..3).map(|i| (offset * 10 + i) as f64).collect();
            table.add_quantity(name, &values, "Jy").unwrap();
        }
        table
    }

    #[test]
    fn test_to_table_columns_and_meta() {
        let handler = LightCurveHandler::new();
        let table = handler.to_table(&light_curve()).unwrap();

        assert_eq!(table.column_names(), vec!["flux", "uncertainty", "dt", "quality"]);
        assert_eq!(table.column_unit("flux").unwrap().as_deref(), Some("electron / s"));
        assert_eq!(table.column_unit("dt").unwrap().as_deref(), Some("d"));
        assert_eq!(table.meta()[UNCERTAINTY_TYPE], serde_json::json!("std"));
        assert_eq!(table.meta()["OBJECT"], serde_json::json!("TIC 1234"));

        let reference: Time = serde_json::from_value(table.meta()[REFERENCE_TIME].clone()).unwrap();
        assert_eq!(reference, Time::from_btjd(1000.0));
        assert_eq!(table.float_values("dt").unwrap(), table.coords().relative_values());
    }

    #[test]
    fn test_round_trip_is_exact() {
        let handler = LightCurveHandler::new();
        let original = light_curve();
        let restored = handler
            .to_light_curve(&handler.to_table(&original).unwrap(), None)
            .unwrap();

        assert_eq!(restored.time, original.time);
        assert_eq!(restored.flux, original.flux);
        assert_eq!(restored.flux_err, original.flux_err);
        assert_eq!(restored.quality, original.quality);
        assert_eq!(restored.meta["OBJECT"], original.meta["OBJECT"]);
    }

    #[test]
    fn test_explicit_reference_time() {
        let handler = LightCurveHandler::with_unit(TimeUnit::Hour);
        let table = handler
            .to_table_with_reference(&light_curve(), Some(Time::from_btjd(999.0)))
            .unwrap();
        assert_eq!(table.coords().reference_time(), Time::from_btjd(999.0));
        assert_eq!(table.column_unit("dt").unwrap().as_deref(), Some("h"));
        assert!((table.float_values("dt").unwrap()[0] - 24.0).abs() < 1e-6);
    }

    #[test]
    fn test_subset_mask_is_applied() {
        let handler = LightCurveHandler::new();
        let original = light_curve();
        let table = handler.to_table(&original).unwrap();
        let subset = Subset::new(&table, vec![true, false, true, false, true]).unwrap();

        let restored = handler.to_light_curve(subset, None).unwrap();
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.time, vec![original.time[0], original.time[2], original.time[4]]);
        assert_eq!(restored.flux.values(), &[1.0, 0.97, 1.02]);
        assert_eq!(restored.quality, Some(vec![0, 512, 1]));
    }

    #[test]
    fn test_all_false_mask_gives_empty_light_curve() {
        let handler = LightCurveHandler::new();
        let table = handler.to_table(&light_curve()).unwrap();
        let subset = Subset::new(&table, Mask::none(5)).unwrap();

        let restored = handler.to_light_curve(subset, None).unwrap();
        assert!(restored.is_empty());
        assert!(restored.flux.is_empty());
        assert_eq!(restored.quality, Some(Vec::new()));
    }

    #[test]
    fn test_ambiguous_columns() {
        let handler = LightCurveHandler::new();
        let table = bare_table(&["a", "b"]);
        let err = handler.to_light_curve(&table, None).unwrap_err();
        assert!(matches!(err, DataError::AmbiguousAttribute(_)));
        assert!(err.to_string().contains("`attribute`"));

        let lc = handler.to_light_curve(&table, Some("b".into())).unwrap();
        assert_eq!(lc.flux.values(), &[10.0, 11.0, 12.0]);
        assert_eq!(lc.flux.unit(), "Jy");
        assert!(lc.flux_err.values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_single_column_is_used() {
        let handler = LightCurveHandler::new();
        let table = bare_table(&["sap_flux"]);
        let lc = handler.to_light_curve(&table, None).unwrap();
        assert_eq!(lc.flux.values(), &[0.0, 1.0, 2.0]);
        assert_eq!(lc.quality, None);
    }

    #[test]
    fn test_empty_table() {
        let handler = LightCurveHandler::new();
        let table = bare_table(&[]);
        assert!(matches!(handler.to_light_curve(&table, None), Err(DataError::EmptyAttributes)));
        assert!(matches!(
            handler.to_light_curve(&table, Some(Attribute::Columns(Vec::new()))),
            Err(DataError::EmptyAttributes)
        ));
    }

    #[test]
    fn test_unknown_attribute() {
        let handler = LightCurveHandler::new();
        let table = bare_table(&["a"]);
        let result = handler.to_light_curve(&table, Some("missing".into()));
        assert!(matches!(result, Err(DataError::UnknownColumn(name)) if name == "missing"));
    }

    #[test]
    fn test_explicit_columns_keep_extras() {
        let handler = LightCurveHandler::new();
        let table = bare_table(&["flux", "uncertainty", "sap_flux"]);
        let lc = handler
            .to_light_curve(
                &table,
                Some(Attribute::Columns(vec!["flux".into(), "sap_flux".into()])),
            )
            .unwrap();
        assert_eq!(lc.flux.values(), &[0.0, 1.0, 2.0]);
        assert_eq!(lc.column("sap_flux").unwrap().values(), &[20.0, 21.0, 22.0]);
    }

    #[test]
    fn test_quality_is_cast_to_integers() {
        let handler = LightCurveHandler::new();
        let mut table = bare_table(&["flux"]);
        let quality: ArrayRef = Arc::new(Float64Array::from(vec![0.0, 4.0, 16.0]));
        table.add_column("quality", quality, None).unwrap();

        let lc = handler.to_light_curve(&table, None).unwrap();
        assert_eq!(lc.quality, Some(vec![0, 4, 16]));
    }

    #[test]
    fn test_unrepresentable_quality_is_rejected() {
        let handler = LightCurveHandler::new();
        let mut table = bare_table(&["flux"]);
        let quality: ArrayRef = Arc::new(Float64Array::from(vec![0.0, 1e12, 16.0]));
        table.add_column("quality", quality, None).unwrap();

        let result = handler.to_light_curve(&table, None);
        assert!(matches!(result, Err(DataError::InvalidInput(_))));
    }

    #[test]
    fn test_extra_columns_are_carried_into_the_table() {
        let handler = LightCurveHandler::new();
        let mut lc = light_curve();
        lc.set_column("flux:orig", lc.flux.clone()).unwrap();
        lc.meta.insert(FLUX_ORIGIN.to_string(), serde_json::json!("flux:orig"));

        let table = handler.to_table(&lc).unwrap();
        assert!(table.has_column("flux:orig"));
        assert_eq!(table.float_values("flux:orig").unwrap(), table.float_values("flux").unwrap());
        assert_eq!(table.meta()[FLUX_ORIGIN], serde_json::json!("flux:orig"));
    }
}
