//! Light-curve objects as produced by mission pipelines

use indexmap::IndexMap;
use lc_core::Time;
use tracing::debug;

use crate::{DataError, Result, FLUX_ORIGIN};

/// Free-form metadata attached to light curves and tables
pub type Meta = IndexMap<String, serde_json::Value>;

/// Values sharing one physical unit
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    values: Vec<f64>,
    unit: String,
}

impl Quantity {
    pub fn new(values: Vec<f64>, unit: impl Into<String>) -> Self {
        Self {
            values,
            unit: unit.into(),
        }
    }

    /// `len` NaN values, used when a light curve has no uncertainties
    pub fn nan(len: usize, unit: impl Into<String>) -> Self {
        Self::new(vec![f64::NAN; len], unit)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Unit string, empty for dimensionless values
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Time-ordered brightness measurements of a single target
///
/// `flux`, `flux_err` and `quality` are the active measurements. Pipelines
/// ship additional flux columns (`sap_flux`, `pdcsap_flux`, ...) which live in
/// the named column table and can be promoted with [`select_flux_column`].
///
/// [`select_flux_column`]: LightCurve::select_flux_column
#[derive(Debug, Clone, PartialEq)]
pub struct LightCurve {
    pub time: Vec<Time>,
    pub flux: Quantity,
    pub flux_err: Quantity,
    pub quality: Option<Vec<i32>>,
    pub meta: Meta,
    columns: IndexMap<String, Quantity>,
}

impl LightCurve {
    /// Create a light curve, checking that all arrays line up with `time`
    pub fn new(time: Vec<Time>, flux: Quantity, flux_err: Quantity) -> Result<Self> {
        if flux.len() != time.len() || flux_err.len() != time.len() {
            return Err(DataError::InvalidInput(format!(
                "flux ({}) and flux_err ({}) must match the {} timestamps",
                flux.len(),
                flux_err.len(),
                time.len()
            )));
        }
        Ok(Self {
            time,
            flux,
            flux_err,
            quality: None,
            meta: Meta::new(),
            columns: IndexMap::new(),
        })
    }

    /// Attach quality flags
    pub fn with_quality(mut self, quality: Vec<i32>) -> Result<Self> {
        if quality.len() != self.time.len() {
            return Err(DataError::InvalidInput(format!(
                "quality has {} values for {} timestamps",
                quality.len(),
                self.time.len()
            )));
        }
        self.quality = Some(quality);
        Ok(self)
    }

    /// Attach metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Attach an additional named column
    pub fn with_column(mut self, name: impl Into<String>, values: Quantity) -> Result<Self> {
        self.set_column(name, values)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Names of every column, in table order
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec!["time".to_string(), "flux".to_string(), "flux_err".to_string()];
        if self.quality.is_some() {
            names.push("quality".to_string());
        }
        names.extend(self.columns.keys().cloned());
        names
    }

    pub fn has_column(&self, name: &str) -> bool {
        match name {
            "time" | "flux" | "flux_err" => true,
            "quality" => self.quality.is_some(),
            other => self.columns.contains_key(other),
        }
    }

    /// A unit-bearing column by name
    pub fn column(&self, name: &str) -> Option<&Quantity> {
        match name {
            "flux" => Some(&self.flux),
            "flux_err" => Some(&self.flux_err),
            other => self.columns.get(other),
        }
    }

    /// Additional named columns, excluding the active flux and its error
    pub fn extra_columns(&self) -> impl Iterator<Item = (&String, &Quantity)> {
        self.columns.iter()
    }

    /// Add or replace a unit-bearing column
    pub fn set_column(&mut self, name: impl Into<String>, values: Quantity) -> Result<()> {
        let name = name.into();
        if values.len() != self.time.len() {
            return Err(DataError::InvalidInput(format!(
                "column '{}' has {} values for {} timestamps",
                name,
                values.len(),
                self.time.len()
            )));
        }
        match name.as_str() {
            "flux" => self.flux = values,
            "flux_err" => self.flux_err = values,
            "time" | "quality" => {
                return Err(DataError::InvalidInput(format!(
                    "'{}' is not a unit-bearing column",
                    name
                )))
            }
            _ => {
                self.columns.insert(name, values);
            }
        }
        Ok(())
    }

    /// Make a named column the active flux
    ///
    /// The companion `<name>_err` column becomes the active uncertainty, or
    /// NaN when there is none. Records the choice under `FLUX_ORIGIN`. The
    /// previous active flux is overwritten, which is why generic `flux`
    /// columns are preserved as `flux:orig` when loaded.
    pub fn select_flux_column(&mut self, name: &str) -> Result<()> {
        let flux = self
            .column(name)
            .cloned()
            .ok_or_else(|| DataError::UnknownColumn(name.to_string()))?;
        let flux_err = self
            .column(&format!("{}_err", name))
            .cloned()
            .unwrap_or_else(|| Quantity::nan(flux.len(), flux.unit()));

        debug!("Selecting '{}' as the active flux column", name);
        self.flux = flux;
        self.flux_err = flux_err;
        self.meta
            .insert(FLUX_ORIGIN.to_string(), serde_json::Value::String(name.to_string()));
        Ok(())
    }
}
