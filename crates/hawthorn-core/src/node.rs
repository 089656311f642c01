//! Node types

use serde::{Deserialize, Serialize};

use crate::alist::AssocList;
use crate::edge::EdgeId;
use crate::limits::RESERVED_ID_KEY;
use crate::radix::RadixMap;

/// Unique identifier for a node, always in `1..=MAX_NODE_ID`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Lowercase hex form stored under the `_id` property
    pub fn to_hex(self) -> String {
        format!("{:x}", self.0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A node in the graph
///
/// Adjacency maps are keyed by [`AdjacencyKey`](crate::edge::AdjacencyKey):
/// `(type, target)` for outbound edges, `(type, source)` for inbound ones.
/// Both hold the id of the edge record owned by the store's edge table.
#[derive(Debug)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) properties: AssocList<String>,
    pub(crate) outbound: RadixMap<u64, EdgeId>,
    pub(crate) inbound: RadixMap<u64, EdgeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            properties: AssocList::with_entry(RESERVED_ID_KEY, id.to_hex()),
            outbound: RadixMap::new(),
            inbound: RadixMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn properties(&self) -> &AssocList<String> {
        &self.properties
    }

    /// Get a single property value
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.fetch(key).map(String::as_str)
    }

    /// Number of outbound edges across all types
    pub fn out_degree(&self) -> usize {
        self.outbound.len()
    }

    /// Number of inbound edges across all types
    pub fn in_degree(&self) -> usize {
        self.inbound.len()
    }
}
