//! Ordered, string-keyed association list
//!
//! Used for node property bags, the edge-type vocabulary and traversal work
//! stacks. Every operation
//! is a linear scan; the lists this crate builds are expected to stay small.

use std::collections::TryReserveError;

/// Insertion-ordered key/value list with unique keys
#[derive(Debug, Clone, PartialEq)]
pub struct AssocList<V> {
    entries: Vec<(String, V)>,
}

impl<V> AssocList<V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a list holding a single entry
    pub fn with_entry(key: impl Into<String>, value: V) -> Self {
        Self {
            entries: vec![(key.into(), value)],
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Replace the value under `key`, or append a new entry.
    ///
    /// Returns the replaced value.
    pub fn insert_or_replace(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn fetch(&self, key: &str) -> Option<&V> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    pub fn fetch_mut(&mut self, key: &str) -> Option<&mut V> {
        self.position(key).map(move |idx| &mut self.entries[idx].1)
    }

    /// Remove an entry, keeping the order of the rest
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.position(key).map(|idx| self.entries.remove(idx).1)
    }

    /// Remove and return the most recently appended value.
    ///
    /// `None` only when the list is empty.
    pub fn pop_last(&mut self) -> Option<V> {
        self.entries.pop().map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reserve room for `additional` more entries without aborting on
    /// allocation failure
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.entries.try_reserve(additional)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<V> Default for AssocList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for AssocList<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (key, value) in iter {
            list.insert_or_replace(key, value);
        }
        list
    }
}
