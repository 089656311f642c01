//! Hawthorn DB - Thread-safe graph database over the Hawthorn core
//!
//! Wraps a [`hawthorn_core::GraphStore`] behind a lock, names edge types
//! with strings and executes serializable query plans.

pub mod database;
pub mod edge_types;
pub mod error;
pub mod plan;

pub use database::{Database, DatabaseStats, NamedEdge, NodeRecord};
pub use edge_types::EdgeTypes;
pub use error::{DbError, DbResult};
pub use plan::{QueryPlan, QueryStart, QueryStep};
