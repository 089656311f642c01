//! Edge types and adjacency key encoding

use serde::{Deserialize, Serialize};

use crate::limits::MAX_NODE_ID;
use crate::node::NodeId;

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 16-bit edge type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeType(pub u16);

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for EdgeType {
    fn from(ty: u16) -> Self {
        Self(ty)
    }
}

/// A directed, typed, weighted edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub edge_type: EdgeType,
    pub weight: f64,
}

impl Edge {
    /// Key of this edge inside the source's outbound map
    pub fn outbound_key(&self) -> AdjacencyKey {
        AdjacencyKey::new(self.edge_type, self.target)
    }

    /// Key of this edge inside the target's inbound map, `(type, source)`
    pub fn inbound_key(&self) -> AdjacencyKey {
        AdjacencyKey::new(self.edge_type, self.source)
    }
}

/// `(edge type, far endpoint)` packed into one radix key.
///
/// The type occupies the 16 most significant bits and the endpoint id the
/// low 48, so keys of one type are contiguous under a 16-bit prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdjacencyKey(pub u64);

impl AdjacencyKey {
    pub const TYPE_SHIFT: u32 = 48;
    pub const TYPE_BITS: u32 = 16;
    pub const ENDPOINT_MASK: u64 = MAX_NODE_ID;

    pub fn new(edge_type: EdgeType, endpoint: NodeId) -> Self {
        Self((u64::from(edge_type.0) << Self::TYPE_SHIFT) | (endpoint.0 & Self::ENDPOINT_MASK))
    }

    /// Key with the type set and the endpoint zeroed, for prefix queries
    pub fn type_prefix(edge_type: EdgeType) -> Self {
        Self::new(edge_type, NodeId(0))
    }

    pub fn edge_type(self) -> EdgeType {
        EdgeType((self.0 >> Self::TYPE_SHIFT) as u16)
    }

    pub fn endpoint(self) -> NodeId {
        NodeId(self.0 & Self::ENDPOINT_MASK)
    }
}
