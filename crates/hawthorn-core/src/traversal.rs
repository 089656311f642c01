//! Adjacency queries and reachability over a [`GraphStore`]

use serde::Serialize;

use crate::alist::AssocList;
use crate::edge::{AdjacencyKey, Edge, EdgeId, EdgeType};
use crate::error::Result;
use crate::node::NodeId;
use crate::radix::{RadixMap, RadixSet};
use crate::store::GraphStore;

/// Traversal statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraversalStats {
    pub nodes_visited: usize,
    pub edges_traversed: usize,
}

/// Reachable set from one source along one edge type
#[derive(Debug, Clone)]
pub struct TraversalResult {
    pub source: NodeId,
    pub edge_type: EdgeType,

    /// Reachable nodes in discovery order, `source` first
    pub nodes: Vec<NodeId>,

    pub stats: TraversalStats,
}

/// Graph traversal engine
///
/// Stateless; every walk allocates its own stack and visited set.
pub struct TraversalEngine;

impl TraversalEngine {
    /// Outbound edges of `source` whose type is exactly `edge_type`.
    ///
    /// A missing source has no edges.
    pub fn get_outbound(store: &GraphStore, source: NodeId, edge_type: EdgeType) -> Vec<Edge> {
        match store.get_node(source) {
            Some(node) => Self::typed_edges(store, &node.outbound, edge_type),
            None => Vec::new(),
        }
    }

    /// Inbound edges of `node` whose type is exactly `edge_type`
    pub fn get_inbound(store: &GraphStore, node: NodeId, edge_type: EdgeType) -> Vec<Edge> {
        match store.get_node(node) {
            Some(node) => Self::typed_edges(store, &node.inbound, edge_type),
            None => Vec::new(),
        }
    }

    /// Adjacency entries under the type's 16-bit prefix, resolved against
    /// the edge table. Ordered by far-endpoint id.
    fn typed_edges(
        store: &GraphStore,
        adjacency: &RadixMap<u64, EdgeId>,
        edge_type: EdgeType,
    ) -> Vec<Edge> {
        adjacency
            .scan_prefix(AdjacencyKey::type_prefix(edge_type).0, AdjacencyKey::TYPE_BITS)
            .into_iter()
            .filter_map(|(_, id)| store.get_edge(*id).copied())
            .collect()
    }

    /// Every node reachable from `source` over `edge_type` edges, `source`
    /// included. Empty if `source` does not exist.
    pub fn get_connected(
        store: &GraphStore,
        source: NodeId,
        edge_type: EdgeType,
    ) -> Result<Vec<NodeId>> {
        Ok(Self::explore(store, source, edge_type)?.nodes)
    }

    /// Stack walk behind [`get_connected`](Self::get_connected).
    ///
    /// The work stack is an [`AssocList`] keyed by node id: nodes are popped
    /// from the end and marked visited when popped. Pushing a node that is
    /// already waiting keeps its current slot, so each node is on the stack
    /// at most once and expanded at most once. A node joins the result the
    /// first time it is discovered.
    ///
    /// Growing the stack or the result list is fallible and surfaces as
    /// [`Error::ResourceExhausted`](crate::Error::ResourceExhausted).
    pub fn explore(
        store: &GraphStore,
        source: NodeId,
        edge_type: EdgeType,
    ) -> Result<TraversalResult> {
        tracing::debug!("Exploring from {} over type {}", source, edge_type);

        let mut result = TraversalResult {
            source,
            edge_type,
            nodes: Vec::new(),
            stats: TraversalStats::default(),
        };
        if !store.contains_node(source) {
            return Ok(result);
        }

        let mut visited = RadixSet::new();
        let mut discovered = RadixSet::new();
        let mut stack = AssocList::with_entry(source.to_hex(), source);
        discovered.insert(source.0);
        result.nodes.push(source);

        while let Some(current) = stack.pop_last() {
            if !visited.insert(current.0) {
                continue;
            }
            result.stats.nodes_visited += 1;

            let edges = Self::get_outbound(store, current, edge_type);
            stack.try_reserve(edges.len())?;
            for edge in edges {
                result.stats.edges_traversed += 1;
                if visited.contains(edge.target.0) {
                    continue;
                }
                stack.insert_or_replace(edge.target.to_hex(), edge.target);
                if discovered.insert(edge.target.0) {
                    result.nodes.try_reserve(1)?;
                    result.nodes.push(edge.target);
                }
            }
        }

        tracing::debug!(
            "Explore visited {} nodes, traversed {} edges",
            result.stats.nodes_visited,
            result.stats.edges_traversed
        );
        Ok(result)
    }

    /// Whether `target` is reachable from `source` over one or more
    /// `edge_type` edges. Stops at the first edge into `target`.
    ///
    /// Same stack walk as [`explore`](Self::explore).
    pub fn are_connected(
        store: &GraphStore,
        source: NodeId,
        target: NodeId,
        edge_type: EdgeType,
    ) -> Result<bool> {
        if !store.contains_node(source) {
            return Ok(false);
        }

        let mut visited = RadixSet::new();
        let mut stack = AssocList::with_entry(source.to_hex(), source);

        while let Some(current) = stack.pop_last() {
            if !visited.insert(current.0) {
                continue;
            }

            let edges = Self::get_outbound(store, current, edge_type);
            stack.try_reserve(edges.len())?;
            for edge in edges {
                if edge.target == target {
                    tracing::debug!(
                        "Found {} -> {} after visiting {} nodes",
                        source,
                        target,
                        visited.len()
                    );
                    return Ok(true);
                }
                if !visited.contains(edge.target.0) {
                    stack.insert_or_replace(edge.target.to_hex(), edge.target);
                }
            }
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    const LINK: EdgeType = EdgeType(5);
    const OTHER: EdgeType = EdgeType(9);

    fn create_test_graph() -> (GraphStore, Vec<NodeId>) {
        let mut store = GraphStore::new();
        let nodes: Vec<NodeId> = (0..6).map(|_| store.create_node().unwrap()).collect();

        // 1 --> 2 --> 4
        // |
        // v
        // 3 --> 5     6 (isolated)
        store.connect(nodes[0], nodes[1], LINK, 1.0).unwrap();
        store.connect(nodes[0], nodes[2], LINK, 2.0).unwrap();
        store.connect(nodes[1], nodes[3], LINK, 1.0).unwrap();
        store.connect(nodes[2], nodes[4], LINK, 1.0).unwrap();
        store.connect(nodes[0], nodes[5], OTHER, 1.0).unwrap();

        (store, nodes)
    }

    fn as_set(nodes: &[NodeId]) -> BTreeSet<u64> {
        nodes.iter().map(|n| n.0).collect()
    }

    #[test]
    fn test_get_outbound() {
        let (store, nodes) = create_test_graph();

        let edges = TraversalEngine::get_outbound(&store, nodes[0], LINK);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].target, nodes[1]);
        assert_eq!(edges[1].target, nodes[2]);
        assert_eq!(edges[1].weight, 2.0);

        let other = TraversalEngine::get_outbound(&store, nodes[0], OTHER);
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].target, nodes[5]);
    }

    #[test]
    fn test_get_inbound() {
        let (store, nodes) = create_test_graph();

        let edges = TraversalEngine::get_inbound(&store, nodes[1], LINK);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, nodes[0]);
        assert_eq!(edges[0].target, nodes[1]);

        assert!(TraversalEngine::get_inbound(&store, nodes[0], LINK).is_empty());
    }

    #[test]
    fn test_missing_source_is_empty() {
        let (store, _) = create_test_graph();

        assert!(TraversalEngine::get_outbound(&store, NodeId(77), LINK).is_empty());
        assert!(TraversalEngine::get_inbound(&store, NodeId(77), LINK).is_empty());
        assert!(TraversalEngine::get_connected(&store, NodeId(77), LINK)
            .unwrap()
            .is_empty());
        assert!(!TraversalEngine::are_connected(&store, NodeId(77), NodeId(1), LINK).unwrap());
    }

    #[test]
    fn test_type_match_is_exact() {
        let mut store = GraphStore::new();
        let a = store.create_node().unwrap();
        let b = store.create_node().unwrap();
        let c = store.create_node().unwrap();

        // 0b11 contains every bit of 0b01, a subset mask would return both
        store.connect(a, b, EdgeType(0b01), 1.0).unwrap();
        store.connect(a, c, EdgeType(0b11), 1.0).unwrap();

        let edges = TraversalEngine::get_outbound(&store, a, EdgeType(0b01));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target, b);
    }

    #[test]
    fn test_get_connected_reachable_set() {
        let (store, nodes) = create_test_graph();

        let reached = TraversalEngine::get_connected(&store, nodes[0], LINK).unwrap();
        assert_eq!(reached[0], nodes[0]);
        assert_eq!(as_set(&reached), as_set(&nodes[..5]));

        let from_leaf = TraversalEngine::get_connected(&store, nodes[3], LINK).unwrap();
        assert_eq!(from_leaf, vec![nodes[3]]);
    }

    #[test]
    fn test_get_connected_uses_stack_order() {
        let (store, nodes) = create_test_graph();

        // Pop 1 discovers 2 and 3; 3 is popped first and discovers 5
        // before 2 is expanded and discovers 4.
        let reached = TraversalEngine::get_connected(&store, nodes[0], LINK).unwrap();
        assert_eq!(
            reached,
            vec![nodes[0], nodes[1], nodes[2], nodes[4], nodes[3]]
        );
    }

    #[test]
    fn test_repushed_node_keeps_stack_slot() {
        let mut store = GraphStore::new();
        let n: Vec<NodeId> = (0..6).map(|_| store.create_node().unwrap()).collect();

        store.connect(n[0], n[1], LINK, 1.0).unwrap();
        store.connect(n[0], n[2], LINK, 1.0).unwrap();
        store.connect(n[0], n[3], LINK, 1.0).unwrap();
        store.connect(n[3], n[1], LINK, 1.0).unwrap();
        store.connect(n[1], n[4], LINK, 1.0).unwrap();
        store.connect(n[2], n[5], LINK, 1.0).unwrap();

        // Popping n[3] pushes n[1] again, which stays below n[2], so n[2]
        // and its target n[5] come before n[1] is expanded.
        let result = TraversalEngine::explore(&store, n[0], LINK).unwrap();
        assert_eq!(result.nodes, vec![n[0], n[1], n[2], n[3], n[5], n[4]]);
        assert_eq!(result.stats.nodes_visited, 6);
        assert_eq!(result.stats.edges_traversed, 6);
    }

    #[test]
    fn test_get_connected_handles_cycles_and_diamonds() {
        let mut store = GraphStore::new();
        let n: Vec<NodeId> = (0..4).map(|_| store.create_node().unwrap()).collect();

        // Diamond 0 -> {1, 2} -> 3 with a back edge 3 -> 0
        store.connect(n[0], n[1], LINK, 1.0).unwrap();
        store.connect(n[0], n[2], LINK, 1.0).unwrap();
        store.connect(n[1], n[3], LINK, 1.0).unwrap();
        store.connect(n[2], n[3], LINK, 1.0).unwrap();
        store.connect(n[3], n[0], LINK, 1.0).unwrap();

        let result = TraversalEngine::explore(&store, n[0], LINK).unwrap();
        assert_eq!(result.nodes.len(), 4);
        assert_eq!(as_set(&result.nodes), as_set(&n));
        assert_eq!(result.stats.nodes_visited, 4);
        assert_eq!(result.stats.edges_traversed, 5);
    }

    #[test]
    fn test_chain_reachability() {
        let mut store = GraphStore::new();
        let a = store.create_node().unwrap();
        let b = store.create_node().unwrap();
        let c = store.create_node().unwrap();
        store.connect(a, b, LINK, 1.0).unwrap();
        store.connect(b, c, LINK, 1.0).unwrap();

        let reached = TraversalEngine::get_connected(&store, a, LINK).unwrap();
        assert_eq!(as_set(&reached), as_set(&[a, b, c]));
        assert!(TraversalEngine::are_connected(&store, a, c, LINK).unwrap());
        assert!(!TraversalEngine::are_connected(&store, a, c, OTHER).unwrap());
        assert!(!TraversalEngine::are_connected(&store, c, a, LINK).unwrap());
    }

    #[test]
    fn test_are_connected_has_no_implicit_self_loop() {
        let mut store = GraphStore::new();
        let a = store.create_node().unwrap();
        let b = store.create_node().unwrap();
        store.connect(a, b, LINK, 1.0).unwrap();

        assert!(!TraversalEngine::are_connected(&store, a, a, LINK).unwrap());

        store.connect(b, a, LINK, 1.0).unwrap();
        assert!(TraversalEngine::are_connected(&store, a, a, LINK).unwrap());
    }

    #[test]
    fn test_disconnect_breaks_reachability() {
        let (mut store, nodes) = create_test_graph();
        assert!(TraversalEngine::are_connected(&store, nodes[0], nodes[3], LINK).unwrap());

        assert!(store.disconnect(nodes[1], nodes[3], LINK));
        assert!(!TraversalEngine::are_connected(&store, nodes[0], nodes[3], LINK).unwrap());
        assert!(TraversalEngine::get_outbound(&store, nodes[1], LINK).is_empty());
        assert!(TraversalEngine::get_inbound(&store, nodes[3], LINK).is_empty());
    }
}
