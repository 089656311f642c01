//! Input validation limits for the graph store

/// Largest node id usable as an edge endpoint.
///
/// Adjacency keys pack the edge type into the top 16 bits and the target id
/// into the low 48, so every node id must fit in 48 bits.
pub const MAX_NODE_ID: u64 = (1 << 48) - 1;

/// Property key every node carries: its id in lowercase hex
pub const RESERVED_ID_KEY: &str = "_id";

/// Maximum length for property keys (256 bytes)
pub const MAX_PROPERTY_KEY_LEN: usize = 256;

/// Maximum length for property values (64KB)
pub const MAX_PROPERTY_VALUE_LEN: usize = 64 * 1024;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NodeIdZero,
    NodeIdTooLarge { id: u64, max: u64 },
    EmptyPropertyKey,
    PropertyKeyTooLong { len: usize, max: usize },
    PropertyValueTooLong { len: usize, max: usize },
    ReservedPropertyKey(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeIdZero => write!(f, "Node id 0 is reserved"),
            Self::NodeIdTooLarge { id, max } => {
                write!(f, "Node id too large: {:#x} (max {:#x})", id, max)
            }
            Self::EmptyPropertyKey => write!(f, "Property key cannot be empty"),
            Self::PropertyKeyTooLong { len, max } => {
                write!(f, "Property key too long: {} bytes (max {})", len, max)
            }
            Self::PropertyValueTooLong { len, max } => {
                write!(f, "Property value too long: {} bytes (max {})", len, max)
            }
            Self::ReservedPropertyKey(key) => {
                write!(f, "Property key '{}' is reserved", key)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a node id
pub fn validate_node_id(id: u64) -> Result<(), ValidationError> {
    if id == 0 {
        return Err(ValidationError::NodeIdZero);
    }
    if id > MAX_NODE_ID {
        return Err(ValidationError::NodeIdTooLarge {
            id,
            max: MAX_NODE_ID,
        });
    }
    Ok(())
}

/// Validate a property key for writing
pub fn validate_property_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::EmptyPropertyKey);
    }
    if key.len() > MAX_PROPERTY_KEY_LEN {
        return Err(ValidationError::PropertyKeyTooLong {
            len: key.len(),
            max: MAX_PROPERTY_KEY_LEN,
        });
    }
    if key == RESERVED_ID_KEY {
        return Err(ValidationError::ReservedPropertyKey(key.to_string()));
    }
    Ok(())
}

/// Validate a property value
pub fn validate_property_value(value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_PROPERTY_VALUE_LEN {
        return Err(ValidationError::PropertyValueTooLong {
            len: value.len(),
            max: MAX_PROPERTY_VALUE_LEN,
        });
    }
    Ok(())
}
