//! Relation storage
//!
//! Relations are fully materialized, immutable once loaded, and shared with
//! scans through `Arc`. A [`RelationStore`] is a snapshot of every relation of
//! one dataset together with the catalog describing them.

pub mod error;
pub mod loader;

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::{Catalog, DataType, TableDef};
use crate::executor::{Datum, Row};

pub use error::{StorageError, StorageResult};
pub use loader::{JsonFixtureSource, MemorySource, RelationSource};

/// A named, ordered sequence of rows conforming to a table definition
#[derive(Debug, Clone)]
pub struct Relation {
    def: TableDef,
    rows: Vec<Row>,
}

impl Relation {
    /// Create an empty relation
    pub fn new(def: TableDef) -> Self {
        Relation {
            def,
            rows: Vec::new(),
        }
    }

    /// Append a row, checking arity, column types and nullability.
    ///
    /// Integer values stored into a DOUBLE column are widened to `Float`.
    pub fn insert(&mut self, row: Row) -> StorageResult<()> {
        if row.len() != self.def.width() {
            return Err(StorageError::ArityMismatch {
                table: self.def.name.clone(),
                expected: self.def.width(),
                got: row.len(),
            });
        }

        let mut values = row.into_values();
        for (value, col) in values.iter_mut().zip(&self.def.columns) {
            if value.is_null() {
                if !col.nullable {
                    return Err(StorageError::NullViolation {
                        table: self.def.name.clone(),
                        column: col.name.clone(),
                    });
                }
                continue;
            }
            if col.data_type == DataType::Double {
                if let Some(i) = value.as_int() {
                    *value = Datum::Float(i as f64);
                }
            }
            if !value.fits(col.data_type) {
                return Err(StorageError::TypeMismatch {
                    table: self.def.name.clone(),
                    column: col.name.clone(),
                    expected: col.data_type,
                    got: value.data_type().unwrap_or(col.data_type),
                });
            }
        }

        self.rows.push(Row::new(values));
        Ok(())
    }

    /// Append many rows
    pub fn extend(&mut self, rows: impl IntoIterator<Item = Row>) -> StorageResult<()> {
        for row in rows {
            self.insert(row)?;
        }
        Ok(())
    }

    pub fn def(&self) -> &TableDef {
        &self.def
    }

    pub fn name(&self) -> &str {
        &self.def.name
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
}

/// Read-only snapshot of a dataset's relations
#[derive(Debug, Clone, Default)]
pub struct RelationStore {
    catalog: Catalog,
    relations: HashMap<String, Arc<Relation>>,
}

impl RelationStore {
    pub fn new() -> Self {
        RelationStore::default()
    }

    /// Register a relation and its table definition
    pub fn add_relation(&mut self, relation: Relation) -> StorageResult<()> {
        self.catalog.create_table(relation.def().clone())?;
        self.relations
            .insert(relation.name().to_string(), Arc::new(relation));
        Ok(())
    }

    /// Look up a relation by table name
    pub fn relation(&self, name: &str) -> Option<Arc<Relation>> {
        self.relations.get(name).cloned()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Number of relations
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Total rows across all relations
    pub fn total_rows(&self) -> usize {
        self.relations.values().map(|r| r.len()).sum()
    }
}
