//! Serializable query plans
//!
//! A plan is the data form of a [`hawthorn_core::Query`] chain with edge
//! types given by name. Plans are usually read from JSON:
//!
//! ```json
//! {
//!   "start": { "find": { "key": "handle", "value": "otto" } },
//!   "steps": [
//!     { "crawl": { "types": ["belongs_to", "read"] } },
//!     { "filter": { "key": "type", "value": "computer" } }
//!   ]
//! }
//! ```

use hawthorn_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::error::DbResult;

/// Where a query starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStart {
    /// A single node
    At(NodeId),
    /// Every node whose property `key` equals `value`
    Find { key: String, value: String },
}

/// One step applied to the current result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStep {
    Out {
        #[serde(rename = "type")]
        edge_type: String,
    },
    In {
        #[serde(rename = "type")]
        edge_type: String,
    },
    Crawl { types: Vec<String> },
    Filter { key: String, value: String },
}

impl QueryStep {
    /// Edge type names this step refers to
    pub fn edge_types(&self) -> &[String] {
        match self {
            Self::Out { edge_type } | Self::In { edge_type } => std::slice::from_ref(edge_type),
            Self::Crawl { types } => types,
            Self::Filter { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub start: QueryStart,
    #[serde(default)]
    pub steps: Vec<QueryStep>,
}

impl QueryPlan {
    pub fn new(start: QueryStart) -> Self {
        Self {
            start,
            steps: Vec::new(),
        }
    }

    pub fn at(node: NodeId) -> Self {
        Self::new(QueryStart::At(node))
    }

    pub fn find(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(QueryStart::Find {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn out(mut self, edge_type: impl Into<String>) -> Self {
        self.steps.push(QueryStep::Out {
            edge_type: edge_type.into(),
        });
        self
    }

    pub fn inbound(mut self, edge_type: impl Into<String>) -> Self {
        self.steps.push(QueryStep::In {
            edge_type: edge_type.into(),
        });
        self
    }

    pub fn crawl<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.push(QueryStep::Crawl {
            types: types.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.steps.push(QueryStep::Filter {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn from_json(json: &str) -> DbResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> DbResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan() {
        let json = r#"{
            "start": { "find": { "key": "handle", "value": "otto" } },
            "steps": [
                { "crawl": { "types": ["belongs_to", "read"] } },
                { "filter": { "key": "type", "value": "computer" } }
            ]
        }"#;

        let plan = QueryPlan::from_json(json).unwrap();
        assert_eq!(
            plan,
            QueryPlan::find("handle", "otto")
                .crawl(["belongs_to", "read"])
                .filter("type", "computer")
        );
    }

    #[test]
    fn test_parse_start_at_without_steps() {
        let plan = QueryPlan::from_json(r#"{ "start": { "at": 7 } }"#).unwrap();
        assert_eq!(plan.start, QueryStart::At(NodeId(7)));
        assert!(plan.steps.is_empty());
    }

    #[test]
    fn test_out_and_in_use_type_field() {
        let json = r#"{
            "start": { "at": 1 },
            "steps": [{ "out": { "type": "read" } }, { "in": { "type": "write" } }]
        }"#;
        let plan = QueryPlan::from_json(json).unwrap();
        assert_eq!(plan, QueryPlan::at(NodeId(1)).out("read").inbound("write"));
    }

    #[test]
    fn test_reject_unknown_step() {
        let json = r#"{ "start": { "at": 1 }, "steps": [{ "sideways": {} }] }"#;
        assert!(QueryPlan::from_json(json).is_err());
    }

    #[test]
    fn test_step_edge_types() {
        let plan = QueryPlan::at(NodeId(1))
            .out("read")
            .crawl(["a", "b"])
            .filter("k", "v");
        let names: Vec<&[String]> = plan.steps.iter().map(QueryStep::edge_types).collect();
        assert_eq!(names[0], ["read".to_string()]);
        assert_eq!(names[1].len(), 2);
        assert!(names[2].is_empty());
    }
}
