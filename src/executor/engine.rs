//! Executor engine
//!
//! Builds executor trees from physical plans and drives them to completion.

use crate::planner::{PhysicalPlan, PhysicalPlanner, Query};
use crate::storage::RelationStore;

use super::aggregate::HashAggregate;
use super::error::{ExecutorError, ExecutorResult};
use super::filter::Filter;
use super::join::HashJoin;
use super::limit::Limit;
use super::project::Project;
use super::resultset::ResultSet;
use super::scan::TableScan;
use super::sort::Sort;
use super::Executor;

/// Executor engine - builds executors from physical plans
pub struct ExecutorEngine<'a> {
    /// Loaded relations
    store: &'a RelationStore,
}

impl<'a> ExecutorEngine<'a> {
    /// Create a new executor engine
    pub fn new(store: &'a RelationStore) -> Self {
        ExecutorEngine { store }
    }

    /// Build an executor tree from a physical plan
    pub fn build(&self, plan: PhysicalPlan) -> ExecutorResult<Box<dyn Executor>> {
        self.build_node(plan)
    }

    fn build_node(&self, plan: PhysicalPlan) -> ExecutorResult<Box<dyn Executor>> {
        match plan {
            PhysicalPlan::TableScan { table, columns: _ } => {
                let relation = self
                    .store
                    .relation(&table)
                    .ok_or(ExecutorError::TableNotFound(table))?;
                Ok(Box::new(TableScan::new(relation)))
            }

            PhysicalPlan::HashJoin {
                left,
                right,
                left_key,
                right_key,
            } => {
                let left_exec = self.build_node(*left)?;
                let right_exec = self.build_node(*right)?;
                Ok(Box::new(HashJoin::new(
                    left_exec, right_exec, left_key, right_key,
                )))
            }

            PhysicalPlan::Filter { input, predicates } => {
                let input_exec = self.build_node(*input)?;
                Ok(Box::new(Filter::new(input_exec, predicates)))
            }

            PhysicalPlan::HashAggregate {
                input,
                group_by,
                aggregates,
            } => {
                let input_exec = self.build_node(*input)?;
                Ok(Box::new(HashAggregate::new(
                    input_exec, group_by, aggregates,
                )))
            }

            PhysicalPlan::Sort { input, order_by } => {
                let input_exec = self.build_node(*input)?;
                Ok(Box::new(Sort::new(input_exec, order_by)))
            }

            PhysicalPlan::Limit {
                input,
                limit,
                offset,
            } => {
                let input_exec = self.build_node(*input)?;
                Ok(Box::new(Limit::new(input_exec, limit, offset)))
            }

            PhysicalPlan::Project { input, columns } => {
                let input_exec = self.build_node(*input)?;
                Ok(Box::new(Project::new(input_exec, columns)))
            }
        }
    }
}

/// Run a physical plan against the store and materialize its output
pub fn execute_plan(store: &RelationStore, plan: PhysicalPlan) -> ExecutorResult<ResultSet> {
    let columns = plan.output_columns();
    let mut exec = ExecutorEngine::new(store).build(plan)?;

    exec.open()?;
    let mut rows = Vec::new();
    while let Some(row) = exec.next()? {
        rows.push(row);
    }
    exec.close()?;

    tracing::debug!(rows = rows.len(), "query evaluated");
    Ok(ResultSet::new(columns, rows))
}

/// Plan and run a query.
///
/// Validation happens entirely at planning time, so a schema or type error is
/// reported before any row is read.
pub fn evaluate(store: &RelationStore, query: &Query) -> ExecutorResult<ResultSet> {
    let plan = PhysicalPlanner::plan(query, store.catalog())?;
    execute_plan(store, plan)
}
