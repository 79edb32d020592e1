//! Project executor
//!
//! Picks output columns by position and applies output rounding.

use crate::planner::physical::ProjectColumn;

use super::error::ExecutorResult;
use super::row::Row;
use super::Executor;

/// Project executor
pub struct Project {
    /// Input executor
    input: Box<dyn Executor>,
    /// Output columns
    columns: Vec<ProjectColumn>,
}

impl Project {
    /// Create a new project executor
    pub fn new(input: Box<dyn Executor>, columns: Vec<ProjectColumn>) -> Self {
        Project { input, columns }
    }
}

impl Executor for Project {
    fn open(&mut self) -> ExecutorResult<()> {
        self.input.open()
    }

    fn next(&mut self) -> ExecutorResult<Option<Row>> {
        let Some(row) = self.input.next()? else {
            return Ok(None);
        };

        let mut values = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            let value = row.get(col.index)?;
            values.push(match col.round {
                Some(places) => value.round(places),
                None => value.clone(),
            });
        }
        Ok(Some(Row::new(values)))
    }

    fn close(&mut self) -> ExecutorResult<()> {
        self.input.close()
    }
}
