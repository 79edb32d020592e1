//! Row type - a positional collection of datums

use super::datum::Datum;
use super::error::{ExecutorError, ExecutorResult};

/// A row of datums
#[derive(Debug, Clone, Default)]
pub struct Row {
    /// The values in this row
    values: Vec<Datum>,
}

impl Row {
    /// Create a new row with the given values
    pub fn new(values: Vec<Datum>) -> Self {
        Row { values }
    }

    /// Get the number of columns in this row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a datum by index
    pub fn get(&self, index: usize) -> ExecutorResult<&Datum> {
        self.values
            .get(index)
            .ok_or(ExecutorError::ColumnIndexOutOfBounds {
                index,
                row_len: self.values.len(),
            })
    }

    /// Get all values as a slice
    pub fn values(&self) -> &[Datum] {
        &self.values
    }

    /// Take ownership of values
    pub fn into_values(self) -> Vec<Datum> {
        self.values
    }

    /// Concatenate two borrowed rows (for joins)
    pub fn concat_ref(left: &Row, right: &Row) -> Row {
        let mut values = Vec::with_capacity(left.len() + right.len());
        values.extend_from_slice(&left.values);
        values.extend_from_slice(&right.values);
        Row { values }
    }

    /// Create an iterator over the datums
    pub fn iter(&self) -> impl Iterator<Item = &Datum> {
        self.values.iter()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for Row {}
