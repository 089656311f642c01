//! CLI command implementations

pub mod completions;
pub mod config;
pub mod edges;
pub mod nodes;
pub mod query;
pub mod stats;
pub mod traverse;

use hawthorn_core::NodeId;
use hawthorn_db::Database;

use crate::seed::SEED_KEY_PROPERTY;

/// Seed key of a node, or `-` if it has none
pub(crate) fn node_key(db: &Database, id: NodeId) -> anyhow::Result<String> {
    Ok(db
        .node(id)?
        .and_then(|record| record.property(SEED_KEY_PROPERTY).map(str::to_string))
        .unwrap_or_else(|| "-".to_string()))
}
