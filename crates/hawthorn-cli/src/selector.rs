//! Node selectors given on the command line

use std::fmt;
use std::str::FromStr;

use hawthorn_core::NodeId;
use hawthorn_db::Database;

/// A decimal node id or a `key=value` property match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSelector {
    Id(NodeId),
    Property { key: String, value: String },
}

impl FromStr for NodeSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((key, value)) = s.split_once('=') {
            if key.is_empty() {
                return Err(format!("missing property key in '{}'", s));
            }
            return Ok(Self::Property {
                key: key.to_string(),
                value: value.to_string(),
            });
        }

        s.parse::<u64>()
            .map(|id| Self::Id(NodeId(id)))
            .map_err(|_| format!("expected a node id or key=value, got '{}'", s))
    }
}

impl fmt::Display for NodeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Property { key, value } => write!(f, "{}={}", key, value),
        }
    }
}

impl NodeSelector {
    /// The selected node; for property matches the one with the lowest id
    pub fn resolve(&self, db: &Database) -> anyhow::Result<NodeId> {
        let found = match self {
            Self::Id(id) => db.node(*id)?.map(|record| record.id),
            Self::Property { key, value } => db.find(key, value)?.first().copied(),
        };
        found.ok_or_else(|| anyhow::anyhow!("No node matches {}", self))
    }
}
