//! Feather (Arrow IPC file) decoding into typed rows
//!
//! pandas writes feather v2 files, which are Arrow IPC files, usually lz4
//! compressed. Columns are looked up by name and cast to the Rust type the
//! row expects, so integer years stored as floats or dictionary-encoded
//! strings decode the same way.

use arrow::array::{ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::ipc::reader::FileReader;
use arrow::record_batch::RecordBatch;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::StoreError;

/// A table row that can be decoded from one record batch
pub trait FeatherRow: Sized {
    /// Decode every row of `columns`
    fn from_columns(columns: &BatchColumns<'_>) -> Result<Vec<Self>, StoreError>;
}

/// Read all rows of a feather file
pub fn read_rows<R: FeatherRow>(path: &Path, dataset: &str) -> Result<Vec<R>, StoreError> {
    let file = File::open(path)?;
    let reader = FileReader::try_new(BufReader::new(file), None)?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        let columns = BatchColumns::new(&batch, dataset);
        rows.extend(R::from_columns(&columns)?);
    }
    Ok(rows)
}

/// Named, typed column access over one record batch
pub struct BatchColumns<'a> {
    batch: &'a RecordBatch,
    dataset: &'a str,
}

impl<'a> BatchColumns<'a> {
    pub fn new(batch: &'a RecordBatch, dataset: &'a str) -> Self {
        Self { batch, dataset }
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    fn cast_column(&self, name: &str, to: &DataType) -> Result<ArrayRef, StoreError> {
        let column = self
            .batch
            .column_by_name(name)
            .ok_or_else(|| StoreError::MissingColumn {
                dataset: self.dataset.to_string(),
                column: name.to_string(),
            })?;
        Ok(cast(column.as_ref(), to)?)
    }

    fn type_mismatch(&self, name: &str, expected: &str) -> StoreError {
        StoreError::ColumnType {
            dataset: self.dataset.to_string(),
            column: name.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Text column; nulls read as empty strings
    pub fn strings(&self, name: &str) -> Result<Vec<String>, StoreError> {
        let array = self.cast_column(name, &DataType::Utf8)?;
        let values = array
            .as_string_opt::<i32>()
            .ok_or_else(|| self.type_mismatch(name, "Utf8"))?;
        Ok(values
            .iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect())
    }

    /// Floating-point column; nulls and NaN read as `None`
    pub fn floats(&self, name: &str) -> Result<Vec<Option<f64>>, StoreError> {
        let array = self.cast_column(name, &DataType::Float64)?;
        let values = array
            .as_primitive_opt::<Float64Type>()
            .ok_or_else(|| self.type_mismatch(name, "Float64"))?;
        Ok(values
            .iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Integer column; nulls read as `None`
    pub fn ints(&self, name: &str) -> Result<Vec<Option<i64>>, StoreError> {
        let array = self.cast_column(name, &DataType::Int64)?;
        let values = array
            .as_primitive_opt::<Int64Type>()
            .ok_or_else(|| self.type_mismatch(name, "Int64"))?;
        Ok(values.iter().collect())
    }

    /// Integer column that must not contain nulls
    pub fn required_ints(&self, name: &str) -> Result<Vec<i64>, StoreError> {
        self.ints(name)?
            .into_iter()
            .map(|v| v.ok_or_else(|| self.type_mismatch(name, "non-null Int64")))
            .collect()
    }

    /// Float column that must not contain nulls
    pub fn required_floats(&self, name: &str) -> Result<Vec<f64>, StoreError> {
        self.floats(name)?
            .into_iter()
            .map(|v| v.ok_or_else(|| self.type_mismatch(name, "non-null Float64")))
            .collect()
    }
}
