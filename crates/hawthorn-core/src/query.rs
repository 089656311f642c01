//! Chainable node-set queries
//!
//! A [`Query`] holds an ordered set of node ids and each step replaces it:
//!
//! ```
//! use hawthorn_core::{EdgeType, GraphStore, Query};
//!
//! let mut store = GraphStore::new();
//! let user = store.create_node().unwrap();
//! let group = store.create_node().unwrap();
//! store.set_property(group, "kind", "group").unwrap();
//! store.connect(user, group, EdgeType(1), 1.0).unwrap();
//!
//! let groups = Query::new(&store)
//!     .start_at(user)
//!     .out(EdgeType(1))
//!     .filter(|props| props.fetch("kind").map(String::as_str) == Some("group"));
//! assert!(groups.contains(group));
//! ```

use crate::alist::AssocList;
use crate::edge::EdgeType;
use crate::error::Result;
use crate::node::NodeId;
use crate::radix::RadixSet;
use crate::store::GraphStore;
use crate::traversal::TraversalEngine;

/// Query over a borrowed store
#[derive(Debug, Clone)]
pub struct Query<'g> {
    store: &'g GraphStore,
    results: Vec<NodeId>,
}

impl<'g> Query<'g> {
    /// Create a query with an empty result set
    pub fn new(store: &'g GraphStore) -> Self {
        Self {
            store,
            results: Vec::new(),
        }
    }

    /// Start from a single node (nothing if it does not exist)
    pub fn start_at(mut self, node: NodeId) -> Self {
        self.results = if self.store.contains_node(node) {
            vec![node]
        } else {
            Vec::new()
        };
        self
    }

    /// Start from every node whose `key` equals `value`
    pub fn start_find(mut self, key: &str, value: &str) -> Self {
        self.results = self.store.find(key, value);
        self
    }

    /// Replace the results with the targets of their outbound `edge_type`
    /// edges
    pub fn out(mut self, edge_type: EdgeType) -> Self {
        let mut seen = RadixSet::new();
        let mut next = Vec::new();
        for node in &self.results {
            for edge in TraversalEngine::get_outbound(self.store, *node, edge_type) {
                if seen.insert(edge.target.0) {
                    next.push(edge.target);
                }
            }
        }
        self.results = next;
        self
    }

    /// Replace the results with the sources of their inbound `edge_type`
    /// edges
    pub fn inbound(mut self, edge_type: EdgeType) -> Self {
        let mut seen = RadixSet::new();
        let mut next = Vec::new();
        for node in &self.results {
            for edge in TraversalEngine::get_inbound(self.store, *node, edge_type) {
                if seen.insert(edge.source.0) {
                    next.push(edge.source);
                }
            }
        }
        self.results = next;
        self
    }

    /// Keep only nodes whose properties satisfy `predicate`
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&AssocList<String>) -> bool,
    {
        let store = self.store;
        self.results
            .retain(|node| store.get_properties(*node).is_some_and(&predicate));
        self
    }

    /// Expand over `edge_types` until no new node turns up.
    ///
    /// Each round takes the reachable set of every frontier node for every
    /// type; the result is every node discovered along the way, the start
    /// nodes included.
    pub fn crawl(mut self, edge_types: &[EdgeType]) -> Result<Self> {
        let mut visited = RadixSet::new();
        let mut found = Vec::new();
        let mut frontier = std::mem::take(&mut self.results);
        let mut rounds = 0usize;

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for edge_type in edge_types {
                for node in &frontier {
                    for reached in TraversalEngine::get_connected(self.store, *node, *edge_type)? {
                        if visited.insert(reached.0) {
                            next.push(reached);
                            found.push(reached);
                        }
                    }
                }
            }
            frontier = next;
            rounds += 1;
        }

        tracing::debug!("Crawl found {} nodes in {} rounds", found.len(), rounds);
        self.results = found;
        Ok(self)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.results.contains(&node)
    }

    pub fn results(&self) -> &[NodeId] {
        &self.results
    }

    pub fn into_results(self) -> Vec<NodeId> {
        self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
