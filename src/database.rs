//! Database handle
//!
//! A [`Database`] owns one loaded dataset snapshot. It is acquired with
//! [`Database::from_existing`], queried any number of times, and released on
//! drop. Queries never mutate the snapshot.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::LoaderConfig;
use crate::executor::{self, ExecutorError, Record, ResultSet};
use crate::planner::{ExplainOutput, PhysicalPlanner, Query};
use crate::storage::{RelationSource, RelationStore, StorageError};

/// Database handle errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error("loading dataset '{dataset}' timed out after {timeout:?}")]
    LoadTimeout { dataset: String, timeout: Duration },

    #[error("query returned no rows")]
    NoRows,
}

impl DatabaseError {
    /// Unknown or ambiguous table/column reference
    pub fn is_schema_error(&self) -> bool {
        matches!(self, DatabaseError::Executor(e) if e.is_schema_error())
    }
}

/// Result type for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Handle to a loaded dataset
#[derive(Debug)]
pub struct Database {
    dataset: String,
    store: Arc<RelationStore>,
}

impl Database {
    /// Load `dataset` from `source`, bounded by the configured timeout
    pub async fn from_existing(
        source: &dyn RelationSource,
        dataset: &str,
        catalog: &Catalog,
        config: &LoaderConfig,
    ) -> DatabaseResult<Self> {
        let store = tokio::time::timeout(config.load_timeout, source.load(dataset, catalog))
            .await
            .map_err(|_| DatabaseError::LoadTimeout {
                dataset: dataset.to_string(),
                timeout: config.load_timeout,
            })??;

        tracing::info!(dataset, tables = store.len(), "database opened");
        Ok(Self::from_store(dataset, Arc::new(store)))
    }

    /// Wrap an already loaded snapshot
    pub fn from_store(dataset: impl Into<String>, store: Arc<RelationStore>) -> Self {
        Database {
            dataset: dataset.into(),
            store,
        }
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn store(&self) -> &RelationStore {
        &self.store
    }

    /// Evaluate a query
    pub fn query(&self, query: &Query) -> DatabaseResult<ResultSet> {
        Ok(executor::evaluate(&self.store, query)?)
    }

    /// All records of a query, in result order
    pub fn select_multiple_rows(&self, query: &Query) -> DatabaseResult<Vec<Record>> {
        Ok(self.query(query)?.into_records())
    }

    /// First record of a query
    pub fn select_single_row(&self, query: &Query) -> DatabaseResult<Record> {
        self.select_multiple_rows(query)?
            .into_iter()
            .next()
            .ok_or(DatabaseError::NoRows)
    }

    /// Render the physical plan of a query
    pub fn explain(&self, query: &Query) -> DatabaseResult<String> {
        let plan = PhysicalPlanner::plan(query, self.store.catalog()).map_err(ExecutorError::from)?;
        Ok(ExplainOutput::format(&plan))
    }

    /// Release the snapshot
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        tracing::info!(dataset = %self.dataset, "database closed");
    }
}
