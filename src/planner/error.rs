//! Planner error types

use thiserror::Error;

use crate::catalog::DataType;

/// Planner error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// Relation not present in the catalog
    #[error("schema error: table not found: {0}")]
    UnknownTable(String),

    /// Column not present in any table in scope
    #[error("schema error: column not found: {0}")]
    UnknownColumn(String),

    /// Bare column name present in more than one table in scope
    #[error("schema error: column '{column}' is ambiguous (found in {})", tables.join(", "))]
    AmbiguousColumn { column: String, tables: Vec<String> },

    /// Operand type not accepted by an operation
    #[error("type mismatch: {context} expects {expected}, got {got}")]
    TypeMismatch {
        context: String,
        expected: String,
        got: DataType,
    },

    /// Structurally invalid query
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl PlannerError {
    /// Unknown or ambiguous table/column reference
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            PlannerError::UnknownTable(_)
                | PlannerError::UnknownColumn(_)
                | PlannerError::AmbiguousColumn { .. }
        )
    }
}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
