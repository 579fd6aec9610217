//! EntityGraph - relationship graph over the entities of one source.
//!
//! The graph owns its source adapter. Nodes are the adapter's entities,
//! stored once each and addressed by identifier; edges are undirected with at
//! most one edge per pair of nodes.
//!
//! The module is organized into submodules:
//! - `build`: schema-edge ingestion, inference, cardinality classification
//! - `path`: multi-path breadth-first traversal
//! - `export`: identifier-only view for external renderers

mod build;
mod export;
mod path;


use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::model::{Edge, EdgeOrigin, Entity};
use crate::semantic::inference::{BuildReport, InferenceConfig, InferenceEngine};
use crate::source::SourceAdapter;

pub use super::error::{GraphError, GraphResult};
pub use export::GraphExport;
pub use path::{PathOutcome, PathRecord, Traversal};

/// Relationship graph bound to exactly one source adapter.
///
/// Construction is lazy: nothing is read from the source until
/// [`build`](EntityGraph::build) is called, and later calls are no-ops.
///
/// # Example
///
/// ```ignore
/// use entitygraph::{EntityGraph, PathOutcome, SqliteSource};
///
/// let mut graph = EntityGraph::new(SqliteSource::open("shop.db"));
/// graph.build()?;
/// if let PathOutcome::Found(record) = graph.find_paths("shop.main.orders", "shop.main.regions")? {
///     println!("{}", record.best_path().join(" -> "));
/// }
/// ```
pub struct EntityGraph<S: SourceAdapter> {
    source: S,
    engine: InferenceEngine,

    /// Nodes are entities, edges are relationships.
    pub(crate) graph: UnGraph<Entity, Edge>,

    /// Mapping from entity identifier to node index.
    pub(crate) node_indices: HashMap<String, NodeIndex>,

    built: bool,
    report: BuildReport,
}

impl<S: SourceAdapter> EntityGraph<S> {
    /// Create an unbuilt graph with the default inference engine.
    pub fn new(source: S) -> Self {
        Self::with_engine(source, InferenceEngine::default())
    }

    /// Create an unbuilt graph with a configured engine.
    pub fn with_config(source: S, config: InferenceConfig) -> Self {
        Self::with_engine(source, InferenceEngine::new(config))
    }

    pub fn with_engine(source: S, engine: InferenceEngine) -> Self {
        Self {
            source,
            engine,
            graph: UnGraph::default(),
            node_indices: HashMap::new(),
            built: false,
            report: BuildReport::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Give the adapter back, discarding the graph.
    pub fn into_source(self) -> S {
        self.source
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Diagnostics and counts of the last successful build.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if an entity is a node of the graph.
    pub fn has_entity(&self, identifier: &str) -> bool {
        self.node_indices.contains_key(identifier)
    }

    pub fn entity(&self, identifier: &str) -> Option<&Entity> {
        self.node_indices.get(identifier).map(|&idx| &self.graph[idx])
    }

    /// Nodes in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.graph.node_weights()
    }

    /// The edge between two entities, in either orientation.
    pub fn edge(&self, a: &str, b: &str) -> Option<&Edge> {
        let a = *self.node_indices.get(a)?;
        let b = *self.node_indices.get(b)?;
        self.graph.find_edge(a, b).map(|idx| &self.graph[idx])
    }

    /// Edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    /// Edges touching one entity.
    pub fn edges_of(&self, identifier: &str) -> GraphResult<Vec<&Edge>> {
        let idx = self.index_of(identifier)?;
        let mut edges: Vec<(EdgeIndex, &Edge)> = self
            .graph
            .edges(idx)
            .map(|e| (e.id(), e.weight()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        Ok(edges.into_iter().map(|(_, edge)| edge).collect())
    }

    pub(crate) fn index_of(&self, identifier: &str) -> GraphResult<NodeIndex> {
        self.node_indices
            .get(identifier)
            .copied()
            .ok_or_else(|| GraphError::UnknownEntity(identifier.to_string()))
    }

    /// Add an entity unless one with the same identifier is already a node.
    fn add_node(&mut self, entity: Entity) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(entity.identifier()) {
            return idx;
        }
        let identifier = entity.identifier().to_string();
        let idx = self.graph.add_node(entity);
        self.node_indices.insert(identifier, idx);
        idx
    }

    /// The edge for an unordered pair, created with `origin` if missing.
    fn upsert_edge(&mut self, a: NodeIndex, b: NodeIndex, origin: EdgeOrigin) -> EdgeIndex {
        if let Some(idx) = self.graph.find_edge(a, b) {
            return idx;
        }
        let edge = Edge::new(
            self.graph[a].identifier(),
            self.graph[b].identifier(),
            origin,
        );
        self.graph.add_edge(a, b, edge)
    }
}

impl<S: SourceAdapter> std::fmt::Debug for EntityGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityGraph")
            .field("source", &self.source.name())
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .field("built", &self.built)
            .finish()
    }
}
