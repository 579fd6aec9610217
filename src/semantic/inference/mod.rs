//! Relationship inference for entity graphs.
//!
//! Inference is best-effort. Each pass looks at one ordered pair of entities
//! at a time; a pair it cannot evaluate is skipped with a recorded
//! [`SkipReason`] instead of aborting the build.
//!
//! # Architecture
//!
//! The engine works in two phases:
//!
//! 1. **Naming heuristics** - propose join keys from table, column, and path
//!    names ([`RelationalNamingPass`], [`FileNamingPass`], plus any custom
//!    [`InferencePass`])
//! 2. **Cardinality classification** - profile both join columns in bounded
//!    samples and classify the edge (see [`cardinality`])
//!
//! # Example
//!
//! ```ignore
//! use entitygraph::semantic::inference::{InferenceConfig, InferenceEngine};
//!
//! let engine = InferenceEngine::new(InferenceConfig::default().with_sample_size(500));
//! let graph = EntityGraph::with_engine(source, engine);
//! ```

pub mod cardinality;
mod diagnostics;
mod engine;
mod extension;
pub mod inflection;
mod naming;

pub use cardinality::{classify, profile, ColumnProfile, DEFAULT_SAMPLE_SIZE};
pub use diagnostics::{BuildReport, Diagnostic, SkipReason};
pub use engine::{EdgeProposal, InferenceConfig, InferenceEngine, InferencePass, CARDINALITY_PASS};
pub use extension::{DistributionPass, SemanticSimilarityPass};
pub use naming::{candidate_fk_columns, FileNamingPass, RelationalNamingPass};
