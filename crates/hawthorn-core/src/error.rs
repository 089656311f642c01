//! Error types for Hawthorn Core

use std::collections::TryReserveError;

use thiserror::Error;

use crate::limits::ValidationError;
use crate::node::NodeId;

/// Result type alias using Hawthorn's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Hawthorn error types
///
/// Missing nodes and edges are not errors: lookups return `None`, empty
/// vectors or `false`. Only rejected input, exhausted id space and failed
/// traversal reservations end up here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Node already exists: {0}")]
    NodeExists(NodeId),

    #[error("Id space exhausted: {0}")]
    IdSpaceExhausted(&'static str),

    /// A traversal could not grow its work stack or result list. Other
    /// allocations abort as usual.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(#[from] TryReserveError),
}
