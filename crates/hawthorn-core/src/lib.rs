//! Hawthorn Core - Radix-indexed in-memory graph engine
//!
//! This crate provides the graph store, its fixed-depth radix index and the
//! traversal algorithms. It holds no global state: every [`GraphStore`] is
//! an independent value.

pub mod alist;
pub mod edge;
pub mod error;
pub mod limits;
pub mod node;
pub mod query;
pub mod radix;
pub mod store;
pub mod traversal;

pub use alist::AssocList;
pub use edge::{AdjacencyKey, Edge, EdgeId, EdgeType};
pub use error::{Error, Result};
pub use limits::{ValidationError, MAX_NODE_ID, RESERVED_ID_KEY};
pub use node::{Node, NodeId};
pub use query::Query;
pub use radix::{RadixKey, RadixMap, RadixSet};
pub use store::GraphStore;
pub use traversal::{TraversalEngine, TraversalResult, TraversalStats};
