//! Graph store: node and edge tables plus id allocation

use crate::alist::AssocList;
use crate::edge::{AdjacencyKey, Edge, EdgeId, EdgeType};
use crate::error::{Error, Result};
use crate::limits::{validate_node_id, validate_property_key, validate_property_value, MAX_NODE_ID};
use crate::node::{Node, NodeId};
use crate::radix::RadixMap;

/// In-memory graph of typed nodes and weighted, typed, directed edges
///
/// The edge table owns every [`Edge`]; adjacency maps on the endpoints hold
/// its id. [`GraphStore::disconnect`] is the only way an edge leaves the
/// store and it clears all three references together.
///
/// The store is not synchronized. Wrap it in a lock to share it.
#[derive(Debug)]
pub struct GraphStore {
    nodes: RadixMap<u64, Node>,
    edges: RadixMap<u64, Edge>,
    next_node_id: u64,
    next_edge_id: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            nodes: RadixMap::new(),
            edges: RadixMap::new(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Node Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a node with the next free id
    pub fn create_node(&mut self) -> Result<NodeId> {
        let id = self.next_node_id;
        if id > MAX_NODE_ID {
            return Err(Error::IdSpaceExhausted("node ids"));
        }

        self.nodes.insert(id, Node::new(NodeId(id)));
        self.next_node_id = id + 1;
        tracing::trace!("Created node {}", id);
        Ok(NodeId(id))
    }

    /// Create a node with a caller-chosen id.
    ///
    /// Later automatic ids continue above the largest id seen.
    pub fn insert_node(&mut self, id: NodeId) -> Result<NodeId> {
        validate_node_id(id.0)?;
        if self.nodes.contains(id.0) {
            return Err(Error::NodeExists(id));
        }

        self.nodes.insert(id.0, Node::new(id));
        if id.0 >= self.next_node_id {
            self.next_node_id = id.0 + 1;
        }
        tracing::trace!("Inserted node {}", id);
        Ok(id)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.fetch(id.0)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains(id.0)
    }

    /// All node ids in ascending order
    pub fn all_nodes(&self) -> Vec<NodeId> {
        self.nodes.keys().into_iter().map(NodeId).collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Property Operations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn get_properties(&self, id: NodeId) -> Option<&AssocList<String>> {
        self.get_node(id).map(Node::properties)
    }

    /// Set or replace a property. `Ok(false)` if the node does not exist.
    pub fn set_property(
        &mut self,
        id: NodeId,
        key: &str,
        value: impl Into<String>,
    ) -> Result<bool> {
        let value = value.into();
        validate_property_key(key)?;
        validate_property_value(&value)?;

        match self.nodes.fetch_mut(id.0) {
            Some(node) => {
                node.properties.insert_or_replace(key, value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a property. `Ok(false)` if the node or the key is missing.
    pub fn remove_property(&mut self, id: NodeId, key: &str) -> Result<bool> {
        validate_property_key(key)?;

        Ok(self
            .nodes
            .fetch_mut(id.0)
            .and_then(|node| node.properties.remove(key))
            .is_some())
    }

    /// Nodes whose property `key` equals `value` exactly, by ascending id
    pub fn find(&self, key: &str, value: &str) -> Vec<NodeId> {
        self.nodes
            .entries()
            .into_iter()
            .filter(|(_, node)| node.property(key) == Some(value))
            .map(|(id, _)| NodeId(id))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edge Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Connect `source` to `target` with a typed, weighted edge.
    ///
    /// `Ok(None)` if either endpoint is missing; nothing is modified.
    /// Connecting an existing `(source, type, target)` again updates that
    /// edge's weight and returns its id.
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: EdgeType,
        weight: f64,
    ) -> Result<Option<EdgeId>> {
        if !self.contains_node(source) || !self.contains_node(target) {
            tracing::debug!(
                "Rejected connect {} -[{}]-> {}: missing endpoint",
                source,
                edge_type,
                target
            );
            return Ok(None);
        }

        let out_key = AdjacencyKey::new(edge_type, target);
        if let Some(existing) = self.outbound_edge_id(source, out_key) {
            if let Some(edge) = self.edges.fetch_mut(existing.0) {
                edge.weight = weight;
            }
            tracing::debug!("Reused edge {} for {} -[{}]-> {}", existing, source, edge_type, target);
            return Ok(Some(existing));
        }

        let id = self.next_edge_id;
        let next = id
            .checked_add(1)
            .ok_or(Error::IdSpaceExhausted("edge ids"))?;

        let edge = Edge {
            id: EdgeId(id),
            source,
            target,
            edge_type,
            weight,
        };

        if let Some(node) = self.nodes.fetch_mut(source.0) {
            node.outbound.insert(edge.outbound_key().0, edge.id);
        }
        if let Some(node) = self.nodes.fetch_mut(target.0) {
            node.inbound.insert(edge.inbound_key().0, edge.id);
        }
        self.edges.insert(id, edge);
        self.next_edge_id = next;

        tracing::trace!("Created edge {}: {} -[{}]-> {}", id, source, edge_type, target);
        Ok(Some(edge.id))
    }

    /// Remove the `(source, type, target)` edge from the edge table and both
    /// adjacency maps. `false` if an endpoint or the edge is missing.
    pub fn disconnect(&mut self, source: NodeId, target: NodeId, edge_type: EdgeType) -> bool {
        if !self.contains_node(target) {
            return false;
        }
        let Some(edge_id) = self.outbound_edge_id(source, AdjacencyKey::new(edge_type, target))
        else {
            return false;
        };
        let Some(edge) = self.edges.remove(edge_id.0) else {
            return false;
        };

        if let Some(node) = self.nodes.fetch_mut(source.0) {
            node.outbound.remove(edge.outbound_key().0);
        }
        if let Some(node) = self.nodes.fetch_mut(target.0) {
            node.inbound.remove(edge.inbound_key().0);
        }

        tracing::trace!("Removed edge {}: {} -[{}]-> {}", edge_id, source, edge_type, target);
        true
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.fetch(id.0)
    }

    /// All edges in ascending id order
    pub fn all_edges(&self) -> Vec<Edge> {
        self.edges.entries().into_iter().map(|(_, edge)| *edge).collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn outbound_edge_id(&self, source: NodeId, key: AdjacencyKey) -> Option<EdgeId> {
        self.get_node(source)?.outbound.fetch(key.0).copied()
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
