//! Query results
//!
//! A [`ResultSet`] is the materialized output of a query: named columns plus
//! rows. [`Record`] is a single row keyed by output column name, in select
//! order.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::planner::OutputColumn;

use super::datum::Datum;
use super::row::Row;

/// Materialized query output
#[derive(Debug, Clone)]
pub struct ResultSet {
    columns: Vec<OutputColumn>,
    rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<OutputColumn>, rows: Vec<Row>) -> Self {
        ResultSet { columns, rows }
    }

    pub fn columns(&self) -> &[OutputColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as name-keyed records
    pub fn records(&self) -> Vec<Record> {
        self.rows.iter().map(|row| self.record(row)).collect()
    }

    pub fn into_records(self) -> Vec<Record> {
        let names: Vec<String> = self.columns.into_iter().map(|c| c.name).collect();
        self.rows
            .into_iter()
            .map(|row| Record {
                fields: names.iter().cloned().zip(row.into_values()).collect(),
            })
            .collect()
    }

    fn record(&self, row: &Row) -> Record {
        Record {
            fields: self
                .columns
                .iter()
                .zip(row.iter())
                .map(|(c, v)| (c.name.clone(), v.clone()))
                .collect(),
        }
    }
}

/// One output row as ordered `(column, value)` pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Datum)>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// Append a field
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Datum>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&Datum> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
