//! Table scan executor
//!
//! Yields the rows of an in-memory relation in insertion order.

use std::sync::Arc;

use crate::storage::Relation;

use super::error::ExecutorResult;
use super::row::Row;
use super::Executor;

/// Full scan of a relation
pub struct TableScan {
    /// Relation being scanned (shared, read-only)
    relation: Arc<Relation>,
    /// Next row position
    position: usize,
}

impl TableScan {
    /// Create a new table scan executor
    pub fn new(relation: Arc<Relation>) -> Self {
        TableScan {
            relation,
            position: 0,
        }
    }
}

impl Executor for TableScan {
    fn open(&mut self) -> ExecutorResult<()> {
        self.position = 0;
        Ok(())
    }

    fn next(&mut self) -> ExecutorResult<Option<Row>> {
        let row = self.relation.rows().get(self.position).cloned();
        if row.is_some() {
            self.position += 1;
        }
        Ok(row)
    }

    fn close(&mut self) -> ExecutorResult<()> {
        self.position = 0;
        Ok(())
    }
}
