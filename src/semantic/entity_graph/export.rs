//! Identifier-only view of a graph for external renderers.

use serde::{Deserialize, Serialize};

use super::EntityGraph;
use crate::source::SourceAdapter;

/// Nodes as identifiers, edges as identifier pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

impl GraphExport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<S: SourceAdapter> EntityGraph<S> {
    /// Reduced view: node identifiers in insertion order, edges in creation
    /// order as `(left, right)`.
    pub fn export(&self) -> GraphExport {
        GraphExport {
            nodes: self
                .entities()
                .map(|e| e.identifier().to_string())
                .collect(),
            edges: self
                .edges()
                .map(|e| (e.left().to_string(), e.right().to_string()))
                .collect(),
        }
    }
}
