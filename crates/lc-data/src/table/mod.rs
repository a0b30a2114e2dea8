//! Generic tables consumed by the viewer
//!
//! A table is an arrow record batch whose rows are aligned with a
//! [`TimeAxis`]. Units live in each field's metadata under [`UNIT_KEY`].

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int32Array};
use arrow::compute::{cast, cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use lc_core::TimeAxis;
use uuid::Uuid;

use crate::{DataError, Meta, Result};

mod subset;

pub use subset::{DataOrSubset, Mask, Subset};

/// Field metadata key holding a column's unit
pub const UNIT_KEY: &str = "unit";

/// Unique identifier for a table
pub type DataId = Uuid;

/// Named columns sharing a time coordinate system
#[derive(Debug, Clone)]
pub struct DataTable {
    id: DataId,
    batch: RecordBatch,
    coords: Arc<TimeAxis>,
    meta: Meta,
}

impl DataTable {
    /// Create a table with no columns, one row per sample of `coords`
    pub fn new(coords: Arc<TimeAxis>) -> Result<Self> {
        let options = RecordBatchOptions::new().with_row_count(Some(coords.len()));
        let schema = Arc::new(Schema::empty());
        let batch = RecordBatch::try_new_with_options(schema, Vec::new(), &options)?;
        Ok(Self {
            id: Uuid::new_v4(),
            batch,
            coords,
            meta: Meta::new(),
        })
    }

    pub fn id(&self) -> DataId {
        self.id
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// The time coordinate system
    pub fn coords(&self) -> &TimeAxis {
        &self.coords
    }

    /// Shared handle to the time coordinate system
    pub fn coords_arc(&self) -> Arc<TimeAxis> {
        self.coords.clone()
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    /// The underlying arrow batch
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    /// Add a column, replacing any column with the same name
    pub fn add_column(&mut self, name: &str, array: ArrayRef, unit: Option<&str>) -> Result<()> {
        if array.len() != self.num_rows() {
            return Err(DataError::InvalidInput(format!(
                "column '{}' has {} rows, table has {}",
                name,
                array.len(),
                self.num_rows()
            )));
        }

        let mut field = Field::new(name, array.data_type().clone(), array.null_count() > 0);
        if let Some(unit) = unit {
            field = field.with_metadata(HashMap::from([(UNIT_KEY.to_string(), unit.to_string())]));
        }

        let schema = self.batch.schema();
        let mut fields: Vec<Field> = Vec::with_capacity(schema.fields().len() + 1);
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len() + 1);
        let mut replaced = false;
        for (existing, column) in schema.fields().iter().zip(self.batch.columns()) {
            if existing.name() == name {
                fields.push(field.clone());
                columns.push(array.clone());
                replaced = true;
            } else {
                fields.push(existing.as_ref().clone());
                columns.push(column.clone());
            }
        }
        if !replaced {
            fields.push(field);
            columns.push(array);
        }

        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows()));
        let schema = Arc::new(Schema::new(fields));
        self.batch = RecordBatch::try_new_with_options(schema, columns, &options)?;
        Ok(())
    }

    /// Add a Float64 column with a unit
    pub fn add_quantity(&mut self, name: &str, values: &[f64], unit: &str) -> Result<()> {
        let array: ArrayRef = Arc::new(Float64Array::from(values.to_vec()));
        self.add_column(name, array, Some(unit))
    }

    /// Unit stored for a column, `None` if the column has none
    pub fn column_unit(&self, name: &str) -> Result<Option<String>> {
        let schema = self.batch.schema();
        let field = schema
            .field_with_name(name)
            .map_err(|_| DataError::UnknownColumn(name.to_string()))?;
        Ok(field.metadata().get(UNIT_KEY).cloned())
    }

    fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| DataError::UnknownColumn(name.to_string()))
    }

    /// Values of a column as f64, nulls become NaN
    pub fn float_values(&self, name: &str) -> Result<Vec<f64>> {
        let column = cast(self.column(name)?, &DataType::Float64)?;
        let array = column
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| DataError::InvalidInput(format!("column '{}' is not numeric", name)))?;
        Ok(array.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    /// Values of a column as i32, nulls become 0
    ///
    /// Values that do not fit an i32 (out of range, NaN) are an error rather
    /// than being read as 0.
    pub fn int_values(&self, name: &str) -> Result<Vec<i32>> {
        let options = CastOptions {
            safe: false,
            ..Default::default()
        };
        let column = cast_with_options(self.column(name)?, &DataType::Int32, &options)
            .map_err(|e| {
                DataError::InvalidInput(format!("column '{}' does not fit i32: {}", name, e))
            })?;
        let array = column.as_any().downcast_ref::<Int32Array>().ok_or_else(|| {
            DataError::InvalidInput(format!("column '{}' is not an integer column", name))
        })?;
        Ok(array.iter().map(|v| v.unwrap_or(0)).collect())
    }

    /// Human readable rendering of the columns
    pub fn pretty(&self) -> Result<String> {
        let formatted = arrow::util::pretty::pretty_format_batches(&[self.batch.clone()])?;
        Ok(formatted.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Int64Array;
    use lc_core::Time;

    fn table(rows: usize) -> DataTable {
        let times = (0..rows).map(|i| Time::from_btjd(i as f64)).collect();
        DataTable::new(Arc::new(TimeAxis::new(times).unwrap())).unwrap()
    }

    #[test]
    fn test_empty_table_has_rows() {
        let table = table(4);
        assert_eq!(table.num_rows(), 4);
        assert_eq!(table.num_columns(), 0);
        assert!(table.column_names().is_empty());
    }

    #[test]
    fn test_add_and_replace_columns() {
        let mut table = table(3);
        table.add_quantity("flux", &[1.0, 2.0, 3.0], "electron / s").unwrap();
        table.add_quantity("dt", &[0.0, 1.0, 2.0], "d").unwrap();
        table.add_quantity("flux", &[4.0, 5.0, 6.0], "Jy").unwrap();

        assert_eq!(table.column_names(), vec!["flux", "dt"]);
        assert_eq!(table.float_values("flux").unwrap(), vec![4.0, 5.0, 6.0]);
        assert_eq!(table.column_unit("flux").unwrap(), Some("Jy".to_string()));
        assert!(matches!(table.column_unit("nope"), Err(DataError::UnknownColumn(_))));
    }

    #[test]
    fn test_rejects_misaligned_columns() {
        let mut table = table(3);
        let result = table.add_quantity("flux", &[1.0], "");
        assert!(matches!(result, Err(DataError::InvalidInput(_))));
    }

    #[test]
    fn test_integer_columns() {
        let mut table = table(3);
        let quality: ArrayRef = Arc::new(Int32Array::from(vec![0, 128, 1]));
        table.add_column("quality", quality, None).unwrap();

        assert_eq!(table.int_values("quality").unwrap(), vec![0, 128, 1]);
        assert_eq!(table.float_values("quality").unwrap(), vec![0.0, 128.0, 1.0]);
        assert_eq!(table.column_unit("quality").unwrap(), None);
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let mut table = table(3);
        let wide: ArrayRef = Arc::new(Int64Array::from(vec![0, (1_i64 << 32) | 128, 4]));
        table.add_column("quality", wide, None).unwrap();
        assert!(matches!(table.int_values("quality"), Err(DataError::InvalidInput(_))));

        let nan: ArrayRef = Arc::new(Float64Array::from(vec![0.0, f64::NAN, 4.0]));
        table.add_column("quality", nan, None).unwrap();
        assert!(matches!(table.int_values("quality"), Err(DataError::InvalidInput(_))));

        let nulls: ArrayRef = Arc::new(Int64Array::from(vec![Some(2), None, Some(4)]));
        table.add_column("quality", nulls, None).unwrap();
        assert_eq!(table.int_values("quality").unwrap(), vec![2, 0, 4]);
    }

    #[test]
    fn test_pretty_output_lists_columns() {
        let mut table = table(2);
        table.add_quantity("flux", &[1.5, 2.5], "").unwrap();
        let rendered = table.pretty().unwrap();
        assert!(rendered.contains("flux"));
        assert!(rendered.contains("2.5"));
    }
}
