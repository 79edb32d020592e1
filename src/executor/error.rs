//! Executor error types

use thiserror::Error;

use crate::catalog::DataType;
use crate::planner::PlannerError;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Executor errors
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// Query failed schema or type validation
    #[error(transparent)]
    Plan(#[from] PlannerError),

    /// Relation named by the plan is missing from the store
    #[error("schema error: table not found: {0}")]
    TableNotFound(String),

    /// Type mismatch during evaluation
    #[error("type mismatch: expected {expected}, got {got} in {context}")]
    TypeMismatch {
        expected: DataType,
        got: DataType,
        context: String,
    },

    /// AVG over a group with no non-null input values
    #[error("empty group: {0} has no values to average")]
    EmptyGroup(String),

    /// Integer aggregate overflowed
    #[error("arithmetic overflow in {0}")]
    Overflow(String),

    /// Column index out of bounds
    #[error("column index {index} out of bounds (row has {row_len} columns)")]
    ColumnIndexOutOfBounds { index: usize, row_len: usize },
}

impl ExecutorError {
    /// Unknown or ambiguous table/column reference
    pub fn is_schema_error(&self) -> bool {
        match self {
            ExecutorError::Plan(e) => e.is_schema_error(),
            ExecutorError::TableNotFound(_) => true,
            _ => false,
        }
    }

    /// Operation applied to a value or column of the wrong type
    pub fn is_type_mismatch(&self) -> bool {
        match self {
            ExecutorError::Plan(e) => matches!(e, PlannerError::TypeMismatch { .. }),
            ExecutorError::TypeMismatch { .. } => true,
            _ => false,
        }
    }
}
