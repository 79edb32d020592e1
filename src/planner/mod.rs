//! Query planner
//!
//! Turns typed query descriptions into executable physical plans.
//!
//! ## Pipeline
//!
//! ```text
//! Query (built with QueryBuilder)
//!   → PhysicalPlanner::plan(query, catalog) → PhysicalPlan
//!   → ExecutorEngine::build(plan) → Box<dyn Executor>
//! ```
//!
//! All schema and type validation happens in the planner, before any row is
//! touched.

pub mod builder;
pub mod error;
pub mod explain;
pub mod physical;
pub mod query;

pub use builder::PhysicalPlanner;
pub use error::{PlannerError, PlannerResult};
pub use explain::ExplainOutput;
pub use physical::{OutputColumn, PhysicalPlan};
pub use query::{
    Aggregate, AggregateKind, ColumnRef, CompareOp, FilterPredicate, JoinSpec, Literal,
    OrderSpec, Query, QueryBuilder, SelectExpr, SelectItem, SortOrder,
};
