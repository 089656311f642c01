//! Thread-safe database facade over a [`GraphStore`]

use std::sync::{Mutex, MutexGuard};

use hawthorn_core::limits::{validate_property_key, validate_property_value};
use hawthorn_core::{
    Edge, EdgeId, EdgeType, GraphStore, NodeId, Query, TraversalEngine, TraversalResult,
};
use serde::{Deserialize, Serialize};

use crate::edge_types::EdgeTypes;
use crate::error::{DbError, DbResult};
use crate::plan::{QueryPlan, QueryStart, QueryStep};

/// Snapshot of one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    /// Properties in insertion order, `_id` first
    pub properties: Vec<(String, String)>,
}

impl NodeRecord {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Edge with its type resolved to a name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub edge_type: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub nodes: usize,
    pub edges: usize,
    pub edge_types: usize,
}

struct State {
    graph: GraphStore,
    edge_types: EdgeTypes,
}

impl State {
    fn named(&self, edge: Edge) -> NamedEdge {
        NamedEdge {
            id: edge.id,
            source: edge.source,
            target: edge.target,
            edge_type: self
                .edge_types
                .name_of(edge.edge_type)
                .map(str::to_string)
                .unwrap_or_else(|| edge.edge_type.to_string()),
            weight: edge.weight,
        }
    }
}

/// Graph database with edge types addressed by name.
///
/// Every operation takes one exclusive lock for its whole duration, so a
/// `Database` can be shared between threads behind an `Arc`.
pub struct Database {
    state: Mutex<State>,
}

impl Database {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                graph: GraphStore::new(),
                edge_types: EdgeTypes::new(),
            }),
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| DbError::Lock(e.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Nodes
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a node carrying `properties`.
    ///
    /// All properties are validated before the node is created, so a bad
    /// key or value leaves the database untouched.
    pub fn create_node<I, K, V>(&self, properties: I) -> DbResult<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let properties: Vec<(String, String)> = properties
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for (key, value) in &properties {
            validate_property_key(key).map_err(hawthorn_core::Error::from)?;
            validate_property_value(value).map_err(hawthorn_core::Error::from)?;
        }

        let mut state = self.lock()?;
        let id = state.graph.create_node()?;
        for (key, value) in properties {
            state.graph.set_property(id, &key, value)?;
        }

        tracing::debug!("Created node {}", id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> DbResult<Option<NodeRecord>> {
        let state = self.lock()?;
        Ok(state.graph.get_properties(id).map(|props| NodeRecord {
            id,
            properties: props
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }))
    }

    pub fn all_nodes(&self) -> DbResult<Vec<NodeId>> {
        Ok(self.lock()?.graph.all_nodes())
    }

    pub fn set_property(&self, id: NodeId, key: &str, value: &str) -> DbResult<bool> {
        Ok(self.lock()?.graph.set_property(id, key, value)?)
    }

    pub fn remove_property(&self, id: NodeId, key: &str) -> DbResult<bool> {
        Ok(self.lock()?.graph.remove_property(id, key)?)
    }

    pub fn find(&self, key: &str, value: &str) -> DbResult<Vec<NodeId>> {
        Ok(self.lock()?.graph.find(key, value))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edges
    // ─────────────────────────────────────────────────────────────────────────

    /// Connect two nodes, registering `edge_type` on first use.
    ///
    /// `Ok(None)` if either endpoint is missing; the name is not registered
    /// in that case.
    pub fn connect(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: &str,
        weight: f64,
    ) -> DbResult<Option<EdgeId>> {
        let mut state = self.lock()?;
        if !state.graph.contains_node(source) || !state.graph.contains_node(target) {
            tracing::debug!(
                "Cannot connect {} -[{}]-> {}: missing endpoint",
                source,
                edge_type,
                target
            );
            return Ok(None);
        }

        let ty = state.edge_types.intern(edge_type)?;
        Ok(state.graph.connect(source, target, ty, weight)?)
    }

    pub fn disconnect(&self, source: NodeId, target: NodeId, edge_type: &str) -> DbResult<bool> {
        let mut state = self.lock()?;
        let ty = state.edge_types.resolve(edge_type)?;
        Ok(state.graph.disconnect(source, target, ty))
    }

    /// Whether `target` is reachable from `source` over `edge_type` edges
    pub fn are_connected(&self, source: NodeId, target: NodeId, edge_type: &str) -> DbResult<bool> {
        let state = self.lock()?;
        let ty = state.edge_types.resolve(edge_type)?;
        Ok(TraversalEngine::are_connected(&state.graph, source, target, ty)?)
    }

    /// Reachable set from `source`, `source` first
    pub fn connected(&self, source: NodeId, edge_type: &str) -> DbResult<Vec<NodeId>> {
        let state = self.lock()?;
        let ty = state.edge_types.resolve(edge_type)?;
        Ok(TraversalEngine::get_connected(&state.graph, source, ty)?)
    }

    /// Like [`connected`](Self::connected), with walk statistics
    pub fn explore(&self, source: NodeId, edge_type: &str) -> DbResult<TraversalResult> {
        let state = self.lock()?;
        let ty = state.edge_types.resolve(edge_type)?;
        Ok(TraversalEngine::explore(&state.graph, source, ty)?)
    }

    pub fn outbound(&self, source: NodeId, edge_type: &str) -> DbResult<Vec<NamedEdge>> {
        let state = self.lock()?;
        let ty = state.edge_types.resolve(edge_type)?;
        Ok(TraversalEngine::get_outbound(&state.graph, source, ty)
            .into_iter()
            .map(|edge| state.named(edge))
            .collect())
    }

    pub fn inbound(&self, node: NodeId, edge_type: &str) -> DbResult<Vec<NamedEdge>> {
        let state = self.lock()?;
        let ty = state.edge_types.resolve(edge_type)?;
        Ok(TraversalEngine::get_inbound(&state.graph, node, ty)
            .into_iter()
            .map(|edge| state.named(edge))
            .collect())
    }

    /// Every edge in creation order
    pub fn edges(&self) -> DbResult<Vec<NamedEdge>> {
        let state = self.lock()?;
        Ok(state
            .graph
            .all_edges()
            .into_iter()
            .map(|edge| state.named(edge))
            .collect())
    }

    /// Registered edge type names in id order
    pub fn edge_types(&self) -> DbResult<Vec<String>> {
        let state = self.lock()?;
        Ok(state
            .edge_types
            .names()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute `plan` and return the final result set.
    ///
    /// Every edge type name in the plan must be registered; names are
    /// checked before any step runs.
    pub fn run(&self, plan: &QueryPlan) -> DbResult<Vec<NodeId>> {
        let state = self.lock()?;

        let mut resolved: Vec<Vec<EdgeType>> = Vec::with_capacity(plan.steps.len());
        for step in &plan.steps {
            let types = step
                .edge_types()
                .iter()
                .map(|name| state.edge_types.resolve(name))
                .collect::<DbResult<Vec<_>>>()?;
            resolved.push(types);
        }

        let mut query = match &plan.start {
            QueryStart::At(node) => Query::new(&state.graph).start_at(*node),
            QueryStart::Find { key, value } => Query::new(&state.graph).start_find(key, value),
        };

        for (step, types) in plan.steps.iter().zip(&resolved) {
            query = match step {
                QueryStep::Out { .. } => types.iter().fold(query, |q, ty| q.out(*ty)),
                QueryStep::In { .. } => types.iter().fold(query, |q, ty| q.inbound(*ty)),
                QueryStep::Crawl { .. } => query.crawl(types)?,
                QueryStep::Filter { key, value } => query.filter(|props| {
                    props.fetch(key).map(String::as_str) == Some(value.as_str())
                }),
            };
        }

        tracing::debug!(
            "Query with {} steps returned {} nodes",
            plan.steps.len(),
            query.len()
        );
        Ok(query.into_results())
    }

    pub fn contains(&self, plan: &QueryPlan, node: NodeId) -> DbResult<bool> {
        Ok(self.run(plan)?.contains(&node))
    }

    pub fn stats(&self) -> DbResult<DatabaseStats> {
        let state = self.lock()?;
        Ok(DatabaseStats {
            nodes: state.graph.node_count(),
            edges: state.graph.edge_count(),
            edge_types: state.edge_types.len(),
        })
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct AccessDb {
        db: Database,
        otto: NodeId,
        mauno: NodeId,
        admins: NodeId,
        novosibirsk: NodeId,
        krasnojarsk: NodeId,
    }

    fn create_access_db() -> AccessDb {
        let db = Database::new();
        let admins = db.create_node([("name", "admins"), ("type", "group")]).unwrap();
        let visitors = db.create_node([("name", "visitors"), ("type", "group")]).unwrap();
        let mauno = db.create_node([("handle", "mauno"), ("type", "user")]).unwrap();
        let otto = db.create_node([("handle", "otto"), ("type", "user")]).unwrap();
        let novosibirsk = db
            .create_node([("type", "computer"), ("ip", "192.168.0.1")])
            .unwrap();
        let krasnojarsk = db
            .create_node([("type", "computer"), ("ip", "192.168.0.2")])
            .unwrap();

        db.connect(otto, admins, "belongs_to", 1.0).unwrap();
        db.connect(mauno, visitors, "belongs_to", 1.0).unwrap();
        db.connect(admins, novosibirsk, "read", 1.0).unwrap();
        db.connect(admins, novosibirsk, "write", 1.0).unwrap();
        db.connect(admins, krasnojarsk, "read", 1.0).unwrap();
        db.connect(admins, krasnojarsk, "write", 1.0).unwrap();
        db.connect(visitors, novosibirsk, "read", 1.0).unwrap();

        AccessDb {
            db,
            otto,
            mauno,
            admins,
            novosibirsk,
            krasnojarsk,
        }
    }

    fn can(access: &AccessDb, handle: &str, right: &str, computer: NodeId) -> bool {
        let plan = QueryPlan::find("handle", handle)
            .crawl(["belongs_to", right])
            .filter("type", "computer");
        access.db.contains(&plan, computer).unwrap()
    }

    #[test]
    fn test_access_rules() {
        let access = create_access_db();

        assert!(can(&access, "otto", "read", access.novosibirsk));
        assert!(can(&access, "otto", "write", access.krasnojarsk));
        assert!(can(&access, "mauno", "read", access.novosibirsk));
        assert!(!can(&access, "mauno", "read", access.krasnojarsk));
        assert!(!can(&access, "mauno", "write", access.novosibirsk));
    }

    #[test]
    fn test_node_record() {
        let access = create_access_db();
        let record = access.db.node(access.otto).unwrap().unwrap();

        assert_eq!(record.id, access.otto);
        assert_eq!(record.properties[0].0, "_id");
        assert_eq!(record.property("_id"), Some(access.otto.to_hex().as_str()));
        assert_eq!(record.property("handle"), Some("otto"));
        assert!(access.db.node(NodeId(999)).unwrap().is_none());
    }

    #[test]
    fn test_create_node_validates_first() {
        let db = Database::new();
        let result = db.create_node([("name", "ok"), ("_id", "ff")]);

        assert!(matches!(
            result,
            Err(DbError::Graph(hawthorn_core::Error::Validation(_)))
        ));
        assert_eq!(db.stats().unwrap().nodes, 0);
    }

    #[test]
    fn test_unknown_edge_type() {
        let access = create_access_db();

        let err = access.db.connected(access.otto, "owns").unwrap_err();
        assert!(matches!(err, DbError::UnknownEdgeType(name) if name == "owns"));
        assert!(access
            .db
            .run(&QueryPlan::at(access.otto).out("owns"))
            .is_err());
    }

    #[test]
    fn test_connect_missing_endpoint_registers_nothing() {
        let db = Database::new();
        let a = db.create_node(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(db.connect(a, NodeId(42), "link", 1.0).unwrap(), None);
        assert!(db.edge_types().unwrap().is_empty());
        assert!(matches!(
            db.outbound(a, "link"),
            Err(DbError::UnknownEdgeType(_))
        ));
    }

    #[test]
    fn test_explore_reports_stats() {
        let access = create_access_db();

        let result = access.db.explore(access.admins, "read").unwrap();
        assert_eq!(
            result.nodes,
            vec![access.admins, access.novosibirsk, access.krasnojarsk]
        );
        assert_eq!(result.stats.nodes_visited, 3);
        assert_eq!(result.stats.edges_traversed, 2);
        assert_eq!(
            result.nodes,
            access.db.connected(access.admins, "read").unwrap()
        );

        let lonely = access.db.explore(NodeId(999), "read").unwrap();
        assert!(lonely.nodes.is_empty());
        assert_eq!(lonely.stats.nodes_visited, 0);
        assert!(access.db.explore(access.admins, "owns").is_err());
    }

    #[test]
    fn test_debug_format() {
        let access = create_access_db();
        assert_eq!(format!("{:?}", access.db), "Database { .. }");
    }

    #[test]
    fn test_outbound_and_inbound_names() {
        let access = create_access_db();

        let out = access.db.outbound(access.admins, "read").unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|e| e.edge_type == "read" && e.source == access.admins));

        let readers = access.db.inbound(access.novosibirsk, "read").unwrap();
        let sources: Vec<NodeId> = readers.iter().map(|e| e.source).collect();
        assert_eq!(sources.len(), 2);
        assert!(sources.contains(&access.admins));
    }

    #[test]
    fn test_disconnect_and_reachability() {
        let access = create_access_db();
        assert!(access
            .db
            .are_connected(access.admins, access.krasnojarsk, "read")
            .unwrap());

        assert!(access
            .db
            .disconnect(access.admins, access.krasnojarsk, "read")
            .unwrap());
        assert!(!access
            .db
            .are_connected(access.admins, access.krasnojarsk, "read")
            .unwrap());
        assert!(!access
            .db
            .disconnect(access.admins, access.krasnojarsk, "read")
            .unwrap());
    }

    #[test]
    fn test_properties_and_find() {
        let access = create_access_db();

        assert!(access.db.set_property(access.mauno, "type", "admin").unwrap());
        assert_eq!(access.db.find("type", "user").unwrap(), vec![access.otto]);
        assert!(access.db.remove_property(access.mauno, "handle").unwrap());
        assert!(access.db.find("handle", "mauno").unwrap().is_empty());
        assert!(!access.db.set_property(NodeId(999), "k", "v").unwrap());
    }

    #[test]
    fn test_inbound_query_step() {
        let access = create_access_db();

        let writers = access
            .db
            .run(&QueryPlan::at(access.krasnojarsk).inbound("write").inbound("belongs_to"))
            .unwrap();
        assert_eq!(writers, vec![access.otto]);
    }

    #[test]
    fn test_stats_and_edge_listing() {
        let access = create_access_db();
        let stats = access.db.stats().unwrap();

        assert_eq!(
            stats,
            DatabaseStats {
                nodes: 6,
                edges: 7,
                edge_types: 3,
            }
        );
        assert_eq!(
            access.db.edge_types().unwrap(),
            vec!["belongs_to", "read", "write"]
        );
        let edges = access.db.edges().unwrap();
        assert_eq!(edges.len(), 7);
        assert_eq!(edges[0].edge_type, "belongs_to");
    }

    #[test]
    fn test_shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Database>();

        let db = Arc::new(Database::new());
        let hub = db.create_node([("name", "hub")]).unwrap();

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let db = Arc::clone(&db);
                scope.spawn(move || {
                    for i in 0..25 {
                        let label = format!("{}-{}", worker, i);
                        let node = db.create_node([("label", label)]).unwrap();
                        db.connect(hub, node, "spoke", 1.0).unwrap();
                    }
                });
            }
        });

        let stats = db.stats().unwrap();
        assert_eq!(stats.nodes, 101);
        assert_eq!(stats.edges, 100);
        assert_eq!(db.connected(hub, "spoke").unwrap().len(), 101);
    }
}
