//! # entitygraph
//!
//! Discovers relationships among the entities of a data source (tables of
//! a relational catalog, files or partition groups of a storage location)
//! and models them as an undirected graph that can be traversed.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Source Adapters                       │
//! │        (SQLite catalog, local/object-store files)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [list entities, declared edges]
//! ┌─────────────────────────────────────────────────────────┐
//! │                   Inference Engine                       │
//! │     (naming heuristics per shape, sampled cardinality)   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [build]
//! ┌─────────────────────────────────────────────────────────┐
//! │                     EntityGraph                          │
//! │     (path finding, reachability, reduced export)         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use entitygraph::{EntityGraph, SqliteSource};
//!
//! let mut graph = EntityGraph::new(SqliteSource::open("./shop.db"));
//! graph.build()?;
//! if let Some(path) = graph.shortest_path("shop.main.order_lines", "shop.main.customers")? {
//!     println!("{}", path.join(" -> "));
//! }
//! ```

pub mod config;
pub mod model;
pub mod semantic;
pub mod source;

pub use model::{Cardinality, Edge, EdgeOrigin, Entity, Sample};
pub use semantic::{
    BuildReport, EntityGraph, GraphError, GraphExport, GraphResult, InferenceConfig, PathOutcome,
    PathRecord, Traversal,
};
pub use source::{
    FileSource, FileSourceConfig, MemorySource, SourceAdapter, SourceError, SourceShape,
    SqliteSource,
};
