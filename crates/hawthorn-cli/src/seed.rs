//! JSON seed files describing a graph to load

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use hawthorn_core::NodeId;
use hawthorn_db::Database;
use serde::{Deserialize, Serialize};

/// Property under which each node's seed key is stored
pub const SEED_KEY_PROPERTY: &str = "key";

pub const SEED_VERSION: &str = "1";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SeedData {
    pub version: String,
    #[serde(default)]
    pub nodes: Vec<SeedNode>,
    #[serde(default)]
    pub edges: Vec<SeedEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedNode {
    pub key: String,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl SeedData {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read graph file {}", path.display()))?;
        let seed: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid graph file {}", path.display()))?;

        if seed.version != SEED_VERSION {
            anyhow::bail!(
                "Unsupported graph file version: {} (expected {})",
                seed.version,
                SEED_VERSION
            );
        }
        Ok(seed)
    }

    /// Build a database holding every seed node and edge.
    ///
    /// Nodes get ids in file order. Properties of one node are applied in
    /// key order after the seed key.
    pub fn load(&self, default_weight: f64) -> anyhow::Result<Database> {
        let db = Database::new();
        let mut ids: HashMap<&str, NodeId> = HashMap::with_capacity(self.nodes.len());

        for node in &self.nodes {
            if ids.contains_key(node.key.as_str()) {
                anyhow::bail!("Duplicate node key: {}", node.key);
            }
            if node.properties.contains_key(SEED_KEY_PROPERTY) {
                anyhow::bail!(
                    "Node {} sets '{}', which holds the seed key",
                    node.key,
                    SEED_KEY_PROPERTY
                );
            }

            let mut properties: Vec<(&str, &str)> = node
                .properties
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            properties.sort_unstable();

            let id = db
                .create_node(
                    std::iter::once((SEED_KEY_PROPERTY, node.key.as_str())).chain(properties),
                )
                .with_context(|| format!("Failed to create node {}", node.key))?;
            ids.insert(node.key.as_str(), id);
        }

        for edge in &self.edges {
            let lookup = |key: &str| {
                ids.get(key)
                    .copied()
                    .with_context(|| format!("Edge refers to unknown node: {}", key))
            };
            let from = lookup(edge.from.as_str())?;
            let to = lookup(edge.to.as_str())?;

            db.connect(from, to, &edge.edge_type, edge.weight.unwrap_or(default_weight))?;
        }

        tracing::info!(
            "Loaded graph: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
        Ok(db)
    }
}
