//! Semantic layer - relationship inference and the entity graph.
//!
//! The graph is built in four phases:
//!
//! 1. **List** - Pull entities and declared relationships from the source
//! 2. **Ingest** - Add declared relationships as authoritative schema edges
//! 3. **Infer** - Run naming heuristics over every pair of entities
//! 4. **Classify** - Estimate cardinality of resolved edges from samples
//!
//! A built graph answers multi-path traversal queries and exports a reduced
//! identifier-only view.

pub mod entity_graph;
pub mod error;
pub mod inference;

pub use entity_graph::{EntityGraph, GraphExport, PathOutcome, PathRecord, Traversal};
pub use error::{GraphError, GraphResult};
pub use inference::{BuildReport, Diagnostic, InferenceConfig, InferenceEngine, SkipReason};
