//! Error types for entity graph operations.
//!
//! Heuristic failures on a single candidate pair are not errors here; they
//! are recorded as [`SkipReason`](super::inference::SkipReason) diagnostics
//! and the build keeps going. Only failures that leave the graph unusable
//! surface as [`GraphError`].

use std::fmt;

use crate::source::SourceError;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Error type for graph build and traversal.
#[derive(Debug)]
pub enum GraphError {
    /// The source adapter could not list entities or defined edges.
    Source(SourceError),

    /// Referenced an entity that is not a node of the graph.
    UnknownEntity(String),

    /// A traversal was requested before `build()` completed.
    NotBuilt,

    /// Invalid engine or graph configuration.
    InvalidConfig(String),
}

impl GraphError {
    /// Check if this error is an adapter connection failure.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, GraphError::Source(e) if e.is_connection_error())
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::Source(e) => write!(f, "Source error: {}", e),
            GraphError::UnknownEntity(name) => write!(f, "Unknown entity: '{}'", name),
            GraphError::NotBuilt => write!(f, "Entity graph has not been built"),
            GraphError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphError::Source(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SourceError> for GraphError {
    fn from(e: SourceError) -> Self {
        GraphError::Source(e)
    }
}
