//! Row subsets of a table
//!
//! The viewer compiles its selection language down to a boolean mask; the
//! mask and the table it applies to travel together as a [`Subset`].

use crate::{DataError, DataTable, Result};

/// Row selection, one flag per table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask(Vec<bool>);

impl Mask {
    /// Select every row
    pub fn all(len: usize) -> Self {
        Self(vec![true; len])
    }

    /// Select no row
    pub fn none(len: usize) -> Self {
        Self(vec![false; len])
    }

    pub fn from_fn(len: usize, f: impl FnMut(usize) -> bool) -> Self {
        Self((0..len).map(f).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of selected rows
    pub fn count_selected(&self) -> usize {
        self.0.iter().filter(|&&keep| keep).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Keep the values whose row is selected
    pub fn apply<T: Clone>(&self, values: &[T]) -> Vec<T> {
        values
            .iter()
            .zip(&self.0)
            .filter(|(_, keep)| **keep)
            .map(|(value, _)| value.clone())
            .collect()
    }
}

impl From<Vec<bool>> for Mask {
    fn from(flags: Vec<bool>) -> Self {
        Self(flags)
    }
}

/// A table together with the rows a selection keeps
#[derive(Debug, Clone)]
pub struct Subset<'a> {
    data: &'a DataTable,
    mask: Mask,
    label: Option<String>,
}

impl<'a> Subset<'a> {
    /// Pair a table with a mask of the same length
    pub fn new(data: &'a DataTable, mask: impl Into<Mask>) -> Result<Self> {
        let mask = mask.into();
        if mask.len() != data.num_rows() {
            return Err(DataError::InvalidInput(format!(
                "mask has {} entries, table has {} rows",
                mask.len(),
                data.num_rows()
            )));
        }
        Ok(Self {
            data,
            mask,
            label: None,
        })
    }

    /// Select rows whose relative time lies in `[start, end]`
    pub fn time_range(data: &'a DataTable, start: f64, end: f64) -> Self {
        let (low, high) = if start <= end { (start, end) } else { (end, start) };
        let values = data.coords().relative_values();
        let mask = Mask::from_fn(values.len(), |row| values[row] >= low && values[row] <= high);
        Self {
            data,
            mask,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn data(&self) -> &'a DataTable {
        self.data
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Input accepted by table-to-object translation
#[derive(Debug, Clone)]
pub enum DataOrSubset<'a> {
    Data(&'a DataTable),
    Subset(Subset<'a>),
}

impl<'a> DataOrSubset<'a> {
    /// Split into the base table and the row mask (all rows for plain data)
    pub fn into_parts(self) -> (&'a DataTable, Mask) {
        match self {
            DataOrSubset::Data(data) => (data, Mask::all(data.num_rows())),
            DataOrSubset::Subset(subset) => (subset.data, subset.mask),
        }
    }
}

impl<'a> From<&'a DataTable> for DataOrSubset<'a> {
    fn from(data: &'a DataTable) -> Self {
        DataOrSubset::Data(data)
    }
}

impl<'a> From<Subset<'a>> for DataOrSubset<'a> {
    fn from(subset: Subset<'a>) -> Self {
        DataOrSubset::Subset(subset)
    }
}
