//! Storage error types

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{CatalogError, DataType};

/// Relation storage and loading errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading a fixture file failed
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fixture file is not valid JSON
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Catalog table with no fixture data
    #[error("no fixture for table '{table}' in dataset '{dataset}'")]
    MissingFixture { dataset: String, table: String },

    /// Dataset id not known to the source
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    /// Catalog rejected a table definition
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Row width differs from the table's column count
    #[error("table '{table}' expects {expected} values, row has {got}")]
    ArityMismatch {
        table: String,
        expected: usize,
        got: usize,
    },

    /// Value does not match the declared column type
    #[error("column {table}.{column} is {expected}, got {got}")]
    TypeMismatch {
        table: String,
        column: String,
        expected: DataType,
        got: DataType,
    },

    /// NULL in a non-nullable column
    #[error("column {table}.{column} is not nullable")]
    NullViolation { table: String, column: String },

    /// Fixture is well-formed JSON but not a relation
    #[error("invalid fixture {path}: {message}")]
    InvalidFixture { path: PathBuf, message: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
