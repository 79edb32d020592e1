//! Physical planner
//!
//! Validates a [`Query`] against the catalog and lowers it to a
//! [`PhysicalPlan`]. The operator order is fixed:
//!
//! ```text
//! TableScan → HashJoin* → Filter → HashAggregate → Sort → Limit → Project
//! ```
//!
//! Sorting happens before projection so that ordering by a rounded aggregate
//! uses its unrounded value.

use crate::catalog::{Catalog, DataType, TableDef};
use crate::executor::Datum;
use crate::planner::error::{PlannerError, PlannerResult};
use crate::planner::physical::{
    AggregateFunc, PhysicalPlan, PlanColumn, PlannedAggregate, Predicate, ProjectColumn,
};
use crate::planner::query::{
    Aggregate, AggregateKind, ColumnRef, JoinSpec, Query, SelectExpr, SortOrder,
};

/// Columns visible to expressions at a point in the join chain
#[derive(Debug, Clone, Default)]
struct Scope {
    columns: Vec<PlanColumn>,
}

impl Scope {
    fn from_table(def: &TableDef) -> Self {
        Scope {
            columns: def
                .columns
                .iter()
                .map(|c| PlanColumn {
                    table: def.name.clone(),
                    name: c.name.clone(),
                    data_type: c.data_type,
                    nullable: c.nullable,
                })
                .collect(),
        }
    }

    fn contains_table(&self, table: &str) -> bool {
        self.columns.iter().any(|c| c.table == table)
    }

    fn resolve(&self, col: &ColumnRef) -> PlannerResult<usize> {
        let found: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.name == col.column && col.table.as_ref().is_none_or(|t| *t == c.table)
            })
            .map(|(i, _)| i)
            .collect();

        match found.as_slice() {
            [] => Err(PlannerError::UnknownColumn(col.to_string())),
            [index] => Ok(*index),
            many => Err(PlannerError::AmbiguousColumn {
                column: col.to_string(),
                tables: many.iter().map(|&i| self.columns[i].table.clone()).collect(),
            }),
        }
    }

    fn column(&self, index: usize) -> &PlanColumn {
        &self.columns[index]
    }
}

/// Lowers queries to physical plans
pub struct PhysicalPlanner;

impl PhysicalPlanner {
    /// Plan a query against the catalog
    pub fn plan(query: &Query, catalog: &Catalog) -> PlannerResult<PhysicalPlan> {
        Self::check_select_list(query)?;

        let base = Self::table(catalog, &query.from)?;
        let mut scope = Scope::from_table(base);
        let mut plan = PhysicalPlan::TableScan {
            table: base.name.clone(),
            columns: scope.columns.clone(),
        };

        for join in &query.joins {
            if scope.contains_table(&join.table) {
                return Err(PlannerError::InvalidQuery(format!(
                    "table '{}' appears more than once in the join chain",
                    join.table
                )));
            }
            let def = Self::table(catalog, &join.table)?;
            let right = Scope::from_table(def);
            let (left_key, right_key) = Self::resolve_join_keys(&scope, &right, join)?;

            let lcol = scope.column(left_key);
            let rcol = right.column(right_key);
            if !lcol.data_type.is_comparable_with(&rcol.data_type) {
                return Err(PlannerError::TypeMismatch {
                    context: format!(
                        "join {} = {}",
                        lcol.qualified_name(),
                        rcol.qualified_name()
                    ),
                    expected: lcol.data_type.to_string(),
                    got: rcol.data_type,
                });
            }

            plan = PhysicalPlan::HashJoin {
                left: Box::new(plan),
                right: Box::new(PhysicalPlan::TableScan {
                    table: def.name.clone(),
                    columns: right.columns.clone(),
                }),
                left_key,
                right_key,
            };
            scope.columns.extend(right.columns);
        }

        let mut predicates = Vec::with_capacity(query.filters.len());
        for filter in &query.filters {
            let index = scope.resolve(&filter.column)?;
            let col = scope.column(index);
            if let Some(lit_type) = filter.value.data_type() {
                if !col.data_type.is_comparable_with(&lit_type) {
                    return Err(PlannerError::TypeMismatch {
                        context: format!("filter {} {} {}", col.qualified_name(), filter.op, filter.value),
                        expected: col.data_type.to_string(),
                        got: lit_type,
                    });
                }
            }
            if !filter.op.is_equality() && col.data_type == DataType::Boolean {
                return Err(PlannerError::TypeMismatch {
                    context: format!("filter {} {} {}", col.qualified_name(), filter.op, filter.value),
                    expected: "ordered type".to_string(),
                    got: col.data_type,
                });
            }
            predicates.push(Predicate {
                index,
                column: col.qualified_name(),
                op: filter.op,
                value: Datum::from_literal(&filter.value),
            });
        }
        if !predicates.is_empty() {
            plan = PhysicalPlan::Filter {
                input: Box::new(plan),
                predicates,
            };
        }

        let group_index = query
            .group_by
            .as_ref()
            .map(|c| scope.resolve(c))
            .transpose()?;

        let aggregating = group_index.is_some() || query.has_aggregates();
        let columns = if aggregating {
            let (aggregates, columns) = Self::plan_aggregation(query, &scope, group_index)?;
            plan = PhysicalPlan::HashAggregate {
                input: Box::new(plan),
                group_by: group_index,
                aggregates,
            };
            columns
        } else {
            Self::plan_plain_projection(query, &scope)?
        };

        if let Some(order) = &query.order_by {
            let index = match columns.iter().find(|c| c.name == order.column) {
                Some(col) => col.index,
                None => Self::resolve_order_fallback(
                    &order.column,
                    &scope,
                    group_index,
                    aggregating,
                )?,
            };
            plan = PhysicalPlan::Sort {
                input: Box::new(plan),
                order_by: vec![(index, order.order == SortOrder::Ascending)],
            };
        }

        if query.limit.is_some() || query.offset.is_some() {
            plan = PhysicalPlan::Limit {
                input: Box::new(plan),
                limit: query.limit,
                offset: query.offset,
            };
        }

        tracing::debug!(
            table = %query.from,
            joins = query.joins.len(),
            filters = query.filters.len(),
            grouped = group_index.is_some(),
            "planned query"
        );

        Ok(PhysicalPlan::Project {
            input: Box::new(plan),
            columns,
        })
    }

    fn table<'a>(catalog: &'a Catalog, name: &str) -> PlannerResult<&'a TableDef> {
        catalog
            .get_table(name)
            .ok_or_else(|| PlannerError::UnknownTable(name.to_string()))
    }

    fn check_select_list(query: &Query) -> PlannerResult<()> {
        if query.select.is_empty() {
            return Err(PlannerError::InvalidQuery("select list is empty".to_string()));
        }
        for (i, item) in query.select.iter().enumerate() {
            if query.select[..i].iter().any(|other| other.alias == item.alias) {
                return Err(PlannerError::InvalidQuery(format!(
                    "duplicate output column '{}'",
                    item.alias
                )));
            }
        }
        Ok(())
    }

    /// Resolve join keys, accepting the equality written either way round.
    /// Returns (position in scope, position in the joined table).
    fn resolve_join_keys(
        scope: &Scope,
        right: &Scope,
        join: &JoinSpec,
    ) -> PlannerResult<(usize, usize)> {
        let forward = (scope.resolve(&join.left), right.resolve(&join.right));
        if let (Ok(l), Ok(r)) = &forward {
            return Ok((*l, *r));
        }
        if let (Ok(l), Ok(r)) = (scope.resolve(&join.right), right.resolve(&join.left)) {
            return Ok((l, r));
        }
        let (left, right) = forward;
        Ok((left?, right?))
    }

    fn plan_aggregation(
        query: &Query,
        scope: &Scope,
        group_index: Option<usize>,
    ) -> PlannerResult<(Vec<PlannedAggregate>, Vec<ProjectColumn>)> {
        let offset = usize::from(group_index.is_some());
        let mut aggregates = Vec::new();
        let mut columns = Vec::with_capacity(query.select.len());

        for item in &query.select {
            match &item.expr {
                SelectExpr::Column(c) => {
                    let index = scope.resolve(c)?;
                    let col = scope.column(index);
                    if Some(index) == group_index {
                        columns.push(ProjectColumn {
                            index: 0,
                            name: item.alias.clone(),
                            round: None,
                            data_type: Some(col.data_type),
                        });
                    } else {
                        aggregates.push(PlannedAggregate {
                            func: AggregateFunc::First,
                            input: Some(index),
                            input_type: Some(col.data_type),
                            display: format!("FIRST({})", col.qualified_name()),
                        });
                        columns.push(ProjectColumn {
                            index: offset + aggregates.len() - 1,
                            name: item.alias.clone(),
                            round: None,
                            data_type: Some(col.data_type),
                        });
                    }
                }
                SelectExpr::Aggregate(agg) => {
                    let planned = Self::plan_aggregate(agg, scope)?;
                    let data_type = planned.result_type();
                    aggregates.push(planned);
                    columns.push(ProjectColumn {
                        index: offset + aggregates.len() - 1,
                        name: item.alias.clone(),
                        round: agg.round,
                        data_type,
                    });
                }
            }
        }

        Ok((aggregates, columns))
    }

    fn plan_aggregate(agg: &Aggregate, scope: &Scope) -> PlannerResult<PlannedAggregate> {
        let (func, arg) = match &agg.kind {
            AggregateKind::CountStar => (AggregateFunc::CountStar, None),
            AggregateKind::Count(c) => (AggregateFunc::Count, Some(c)),
            AggregateKind::Sum(c) => (AggregateFunc::Sum, Some(c)),
            AggregateKind::Avg(c) => (AggregateFunc::Avg, Some(c)),
        };

        let Some(arg) = arg else {
            return Ok(PlannedAggregate {
                func,
                input: None,
                input_type: None,
                display: "COUNT(*)".to_string(),
            });
        };

        let index = scope.resolve(arg)?;
        let col = scope.column(index);
        let display = format!("{}({})", func.name(), col.qualified_name());
        if matches!(func, AggregateFunc::Sum | AggregateFunc::Avg) && !col.data_type.is_numeric() {
            return Err(PlannerError::TypeMismatch {
                context: display,
                expected: "numeric".to_string(),
                got: col.data_type,
            });
        }

        Ok(PlannedAggregate {
            func,
            input: Some(index),
            input_type: Some(col.data_type),
            display,
        })
    }

    fn plan_plain_projection(query: &Query, scope: &Scope) -> PlannerResult<Vec<ProjectColumn>> {
        query
            .select
            .iter()
            .map(|item| match &item.expr {
                SelectExpr::Column(c) => {
                    let index = scope.resolve(c)?;
                    Ok(ProjectColumn {
                        index,
                        name: item.alias.clone(),
                        round: None,
                        data_type: Some(scope.column(index).data_type),
                    })
                }
                SelectExpr::Aggregate(_) => Err(PlannerError::InvalidQuery(
                    "aggregate in a non-aggregating select list".to_string(),
                )),
            })
            .collect()
    }

    /// ORDER BY a name that is not an output alias: an input column when not
    /// aggregating, or the grouping column itself.
    fn resolve_order_fallback(
        name: &str,
        scope: &Scope,
        group_index: Option<usize>,
        aggregating: bool,
    ) -> PlannerResult<usize> {
        let index = scope.resolve(&ColumnRef::parse(name))?;
        match group_index {
            Some(g) if g == index => Ok(0),
            _ if !aggregating => Ok(index),
            _ => Err(PlannerError::UnknownColumn(name.to_string())),
        }
    }
}
