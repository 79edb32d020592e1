//! Query executor - Volcano iterator model
//!
//! The executor takes a physical plan and executes it using the Volcano
//! iterator model: each operator implements open/next/close methods.
//! Evaluation is synchronous; relations are fully loaded before a query runs.

pub mod aggregate;
pub mod datum;
pub mod engine;
pub mod error;
pub mod filter;
pub mod join;
pub mod limit;
pub mod project;
pub mod resultset;
pub mod row;
pub mod scan;
pub mod sort;

pub use datum::Datum;
pub use engine::{evaluate, execute_plan, ExecutorEngine};
pub use error::{ExecutorError, ExecutorResult};
pub use resultset::{Record, ResultSet};
pub use row::Row;

/// Volcano-style iterator executor
///
/// Each operator implements:
/// - `open()`: Initialize the operator
/// - `next()`: Return the next row, or None if exhausted
/// - `close()`: Clean up resources
pub trait Executor: Send {
    /// Initialize the executor
    fn open(&mut self) -> ExecutorResult<()>;

    /// Get the next row, or None if exhausted
    fn next(&mut self) -> ExecutorResult<Option<Row>>;

    /// Close the executor and release resources
    fn close(&mut self) -> ExecutorResult<()>;
}
