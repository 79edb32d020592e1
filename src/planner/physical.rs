//! Physical plan representation
//!
//! Physical plans have every column reference resolved to a row position, so
//! the executor never looks at names.

use crate::catalog::DataType;
use crate::executor::Datum;
use crate::planner::query::CompareOp;

/// Column of a scanned or joined row
#[derive(Debug, Clone, PartialEq)]
pub struct PlanColumn {
    /// Owning table
    pub table: String,
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Whether the column can be NULL
    pub nullable: bool,
}

impl PlanColumn {
    /// `table.column`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }
}

/// Output column of the plan root
#[derive(Debug, Clone, PartialEq)]
pub struct OutputColumn {
    /// Output name (alias)
    pub name: String,
    /// Data type, None when only NULL can be produced
    pub data_type: Option<DataType>,
}

/// Resolved `column op value` predicate
#[derive(Debug, Clone)]
pub struct Predicate {
    /// Position of the column in the input row
    pub index: usize,
    /// Qualified column name, for display
    pub column: String,
    pub op: CompareOp,
    pub value: Datum,
}

/// Aggregate function as executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    CountStar,
    Count,
    Sum,
    Avg,
    /// First value seen in the group; used for non-grouped plain columns
    First,
}

impl AggregateFunc {
    /// SQL-style function name
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunc::CountStar | AggregateFunc::Count => "COUNT",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::First => "FIRST",
        }
    }
}

/// Resolved aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedAggregate {
    pub func: AggregateFunc,
    /// Position of the argument column, None for COUNT(*)
    pub input: Option<usize>,
    /// Type of the argument column
    pub input_type: Option<DataType>,
    /// Display form, e.g. `SUM(movies.budget_adjusted)`
    pub display: String,
}

impl PlannedAggregate {
    /// Result type of this aggregate
    pub fn result_type(&self) -> Option<DataType> {
        match self.func {
            AggregateFunc::CountStar | AggregateFunc::Count => Some(DataType::Int),
            AggregateFunc::Avg => Some(DataType::Double),
            AggregateFunc::Sum | AggregateFunc::First => self.input_type,
        }
    }
}

/// Projected output column
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectColumn {
    /// Position in the input row
    pub index: usize,
    /// Output name
    pub name: String,
    /// Decimal places to round to
    pub round: Option<u32>,
    pub data_type: Option<DataType>,
}

/// Physical plan node
#[derive(Debug, Clone)]
pub enum PhysicalPlan {
    /// Full scan of a relation
    TableScan {
        table: String,
        columns: Vec<PlanColumn>,
    },

    /// Inner equi-join; the right side is built into a hash table
    HashJoin {
        left: Box<PhysicalPlan>,
        right: Box<PhysicalPlan>,
        /// Key position in left rows
        left_key: usize,
        /// Key position in right rows
        right_key: usize,
    },

    /// Keep rows satisfying every predicate
    Filter {
        input: Box<PhysicalPlan>,
        predicates: Vec<Predicate>,
    },

    /// Hash-based aggregation.
    ///
    /// Output rows are `[group value] ++ aggregates`, the group value only
    /// being present when `group_by` is set.
    HashAggregate {
        input: Box<PhysicalPlan>,
        group_by: Option<usize>,
        aggregates: Vec<PlannedAggregate>,
    },

    /// Stable in-memory sort
    Sort {
        input: Box<PhysicalPlan>,
        /// (position, ascending)
        order_by: Vec<(usize, bool)>,
    },

    /// Limit rows returned
    Limit {
        input: Box<PhysicalPlan>,
        limit: Option<u64>,
        offset: Option<u64>,
    },

    /// Final projection with output rounding
    Project {
        input: Box<PhysicalPlan>,
        columns: Vec<ProjectColumn>,
    },
}

impl PhysicalPlan {
    /// Output columns of the plan root.
    ///
    /// Only meaningful for `Project`-rooted plans, which is what the planner
    /// always produces; inner nodes report their row width as anonymous
    /// columns.
    pub fn output_columns(&self) -> Vec<OutputColumn> {
        match self {
            PhysicalPlan::Project { columns, .. } => columns
                .iter()
                .map(|c| OutputColumn {
                    name: c.name.clone(),
                    data_type: c.data_type,
                })
                .collect(),
            PhysicalPlan::Filter { input, .. }
            | PhysicalPlan::Sort { input, .. }
            | PhysicalPlan::Limit { input, .. } => input.output_columns(),
            other => (0..other.width())
                .map(|i| OutputColumn {
                    name: format!("column_{}", i),
                    data_type: None,
                })
                .collect(),
        }
    }

    /// Number of values in each output row
    pub fn width(&self) -> usize {
        match self {
            PhysicalPlan::TableScan { columns, .. } => columns.len(),
            PhysicalPlan::HashJoin { left, right, .. } => left.width() + right.width(),
            PhysicalPlan::Filter { input, .. }
            | PhysicalPlan::Sort { input, .. }
            | PhysicalPlan::Limit { input, .. } => input.width(),
            PhysicalPlan::HashAggregate {
                group_by,
                aggregates,
                ..
            } => usize::from(group_by.is_some()) + aggregates.len(),
            PhysicalPlan::Project { columns, .. } => columns.len(),
        }
    }
}
