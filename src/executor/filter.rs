//! Filter executor
//!
//! Filters rows based on a conjunction of column/literal comparisons.

use crate::planner::physical::Predicate;

use super::error::ExecutorResult;
use super::row::Row;
use super::Executor;

/// Filter executor
pub struct Filter {
    /// Input executor
    input: Box<dyn Executor>,
    /// All must hold for a row to pass
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Create a new filter executor
    pub fn new(input: Box<dyn Executor>, predicates: Vec<Predicate>) -> Self {
        Filter { input, predicates }
    }

    fn matches(&self, row: &Row) -> ExecutorResult<bool> {
        for pred in &self.predicates {
            let value = row.get(pred.index)?;
            // NULL or incomparable kinds fail the predicate
            let passed = value
                .sql_cmp(&pred.value)
                .is_some_and(|ordering| pred.op.accepts(ordering));
            if !passed {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Executor for Filter {
    fn open(&mut self) -> ExecutorResult<()> {
        self.input.open()
    }

    fn next(&mut self) -> ExecutorResult<Option<Row>> {
        loop {
            match self.input.next()? {
                Some(row) => {
                    if self.matches(&row)? {
                        return Ok(Some(row));
                    }
                }
                None => return Ok(None),
            }
        }
    }

    fn close(&mut self) -> ExecutorResult<()> {
        self.input.close()
    }
}
