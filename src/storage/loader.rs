//! Relation loading
//!
//! A [`RelationSource`] materializes every table of a catalog for one dataset.
//! Fixtures on disk live at `<root>/<dataset>/<table>.json`, each a JSON array
//! of objects keyed by column name. A key missing from an object loads as
//! NULL; a key that is not a column of the table is rejected.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;

use crate::catalog::{Catalog, DataType, TableDef};
use crate::executor::datum::integral;
use crate::executor::{Datum, Row};

use super::error::{StorageError, StorageResult};
use super::{Relation, RelationStore};

/// Source of dataset snapshots
#[async_trait]
pub trait RelationSource: Send + Sync {
    /// Load every table of `catalog` for `dataset`
    async fn load(&self, dataset: &str, catalog: &Catalog) -> StorageResult<RelationStore>;
}

/// Loads datasets from JSON fixture files
#[derive(Debug, Clone)]
pub struct JsonFixtureSource {
    root: PathBuf,
}

impl JsonFixtureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonFixtureSource { root: root.into() }
    }

    async fn load_table(&self, dir: &Path, dataset: &str, def: &TableDef) -> StorageResult<Relation> {
        let path = dir.join(format!("{}.json", def.name));
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::MissingFixture {
                    dataset: dataset.to_string(),
                    table: def.name.clone(),
                })
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        let value: Value = serde_json::from_str(&content).map_err(|source| StorageError::Json {
            path: path.clone(),
            source,
        })?;
        let Value::Array(objects) = value else {
            return Err(invalid(&path, "expected a JSON array of objects"));
        };

        let mut relation = Relation::new(def.clone());
        for (i, object) in objects.into_iter().enumerate() {
            let Value::Object(fields) = object else {
                return Err(invalid(&path, format!("element {} is not an object", i)));
            };
            let row = object_to_row(&fields, def).map_err(|message| {
                invalid(&path, format!("element {}: {}", i, message))
            })?;
            relation.insert(row)?;
        }

        tracing::debug!(table = %def.name, rows = relation.len(), "loaded fixture table");
        Ok(relation)
    }
}

#[async_trait]
impl RelationSource for JsonFixtureSource {
    async fn load(&self, dataset: &str, catalog: &Catalog) -> StorageResult<RelationStore> {
        let dir = self.root.join(dataset);
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(StorageError::UnknownDataset(dataset.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::UnknownDataset(dataset.to_string()))
            }
            Err(source) => return Err(StorageError::Io { path: dir, source }),
        }

        let mut store = RelationStore::new();
        for name in catalog.list_tables() {
            let def = catalog.require_table(name)?;
            let relation = self.load_table(&dir, dataset, def).await?;
            store.add_relation(relation)?;
        }

        tracing::info!(
            dataset,
            root = %self.root.display(),
            tables = store.len(),
            rows = store.total_rows(),
            "loaded dataset"
        );
        Ok(store)
    }
}

fn invalid(path: &Path, message: impl Into<String>) -> StorageError {
    StorageError::InvalidFixture {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn object_to_row(fields: &Map<String, Value>, def: &TableDef) -> Result<Row, String> {
    if let Some(unknown) = fields.keys().find(|k| def.get_column(k).is_none()) {
        return Err(format!("unknown column '{}'", unknown));
    }

    def.columns
        .iter()
        .map(|col| match fields.get(&col.name) {
            None => Ok(Datum::Null),
            Some(value) => json_to_datum(value)
                .map(|datum| narrow_integral(datum, col.data_type))
                .ok_or_else(|| format!("column '{}' holds a nested value", col.name)),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Row::new)
}

/// Scalar JSON to datum; arrays and objects have no datum form
fn json_to_datum(value: &Value) -> Option<Datum> {
    match value {
        Value::Null => Some(Datum::Null),
        Value::Bool(b) => Some(Datum::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(Datum::Int)
            .or_else(|| n.as_f64().map(Datum::Float)),
        Value::String(s) => Some(Datum::String(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integral JSON floats such as `1.0` load into INT columns as integers
fn narrow_integral(datum: Datum, data_type: DataType) -> Datum {
    match datum {
        Datum::Float(f) if data_type == DataType::Int => {
            integral(f).map_or(Datum::Float(f), Datum::Int)
        }
        other => other,
    }
}

/// Serves pre-built stores by dataset id
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    datasets: HashMap<String, RelationStore>,
}

impl MemorySource {
    pub fn new() -> Self {
        MemorySource::default()
    }

    /// Register a dataset
    #[must_use]
    pub fn with_dataset(mut self, dataset: impl Into<String>, store: RelationStore) -> Self {
        self.datasets.insert(dataset.into(), store);
        self
    }
}

#[async_trait]
impl RelationSource for MemorySource {
    async fn load(&self, dataset: &str, catalog: &Catalog) -> StorageResult<RelationStore> {
        let store = self
            .datasets
            .get(dataset)
            .ok_or_else(|| StorageError::UnknownDataset(dataset.to_string()))?;

        if let Some(table) = catalog
            .list_tables()
            .into_iter()
            .find(|t| store.relation(t).is_none())
        {
            return Err(StorageError::MissingFixture {
                dataset: dataset.to_string(),
                table: table.to_string(),
            });
        }

        tracing::info!(dataset, tables = store.len(), "loaded in-memory dataset");
        Ok(store.clone())
    }
}
