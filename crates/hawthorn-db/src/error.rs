//! Database error types

use thiserror::Error;

/// Result type alias for database operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Database-level error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Graph error: {0}")]
    Graph(#[from] hawthorn_core::Error),

    #[error("Unknown edge type: {0}")]
    UnknownEdgeType(String),

    #[error("Edge type vocabulary exhausted ({0} names)")]
    EdgeTypesExhausted(usize),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
