//! Edge type vocabulary: names interned to 16-bit ids

use hawthorn_core::{AssocList, EdgeType, RadixMap};

use crate::error::{DbError, DbResult};

/// Bidirectional mapping between edge type names and [`EdgeType`] ids.
///
/// Ids are handed out from 1 in first-use order and never reused.
#[derive(Debug, Default)]
pub struct EdgeTypes {
    ids: AssocList<EdgeType>,
    names: RadixMap<u16, String>,
}

impl EdgeTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `name`, assigning the next free one on first use
    pub fn intern(&mut self, name: &str) -> DbResult<EdgeType> {
        if let Some(edge_type) = self.ids.fetch(name) {
            return Ok(*edge_type);
        }

        let next = u16::try_from(self.ids.len() + 1)
            .map_err(|_| DbError::EdgeTypesExhausted(self.ids.len()))?;
        let edge_type = EdgeType(next);
        self.ids.insert_or_replace(name, edge_type);
        self.names.insert(next, name.to_string());

        tracing::debug!("Registered edge type '{}' as {}", name, edge_type);
        Ok(edge_type)
    }

    /// Id for a name that has been interned before
    pub fn resolve(&self, name: &str) -> DbResult<EdgeType> {
        self.get(name)
            .ok_or_else(|| DbError::UnknownEdgeType(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<EdgeType> {
        self.ids.fetch(name).copied()
    }

    pub fn name_of(&self, edge_type: EdgeType) -> Option<&str> {
        self.names.fetch(edge_type.0).map(String::as_str)
    }

    /// Names in id order
    pub fn names(&self) -> Vec<&str> {
        self.names
            .entries()
            .into_iter()
            .map(|(_, name)| name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
