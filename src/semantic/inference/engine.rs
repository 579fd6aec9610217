//! Edge inference engine.
//!
//! The engine runs a list of [`InferencePass`]es over every ordered pair of
//! entities and collects their proposals, then classifies the cardinality of
//! resolved edges from bounded samples. Passes are selected by the source's
//! [`SourceShape`], never by the adapter type.

use crate::model::{Cardinality, Edge, Entity, KeyMap};
use crate::source::{SourceAdapter, SourceShape};

use super::cardinality::{classify, profile, DEFAULT_SAMPLE_SIZE};
use super::extension::{DistributionPass, SemanticSimilarityPass};
use super::naming::{FileNamingPass, RelationalNamingPass};
use super::{BuildReport, SkipReason};

/// Name under which cardinality skips are reported.
pub const CARDINALITY_PASS: &str = "cardinality";

/// A relationship proposed by one pass for one pair of entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeProposal {
    pub left: String,
    pub right: String,
    /// Join columns to merge into the edge, keyed by entity identifier.
    pub keys: KeyMap,
    /// Name of the proposing pass.
    pub rule: &'static str,
}

impl EdgeProposal {
    pub fn new(left: &Entity, right: &Entity, rule: &'static str) -> Self {
        Self {
            left: left.identifier().to_string(),
            right: right.identifier().to_string(),
            keys: KeyMap::new(),
            rule,
        }
    }

    /// Builder: set the join column for one side.
    pub fn with_key(mut self, entity: &Entity, column: impl Into<String>) -> Self {
        self.keys.insert(entity.identifier().to_string(), column.into());
        self
    }
}

/// One heuristic evaluated over ordered entity pairs.
///
/// Implementations are pure over the two entities. A pass that cannot
/// evaluate a pair returns a [`SkipReason`]; the engine records it and
/// continues with the next pair.
pub trait InferencePass {
    /// Stable name, used for edge rules and diagnostics.
    fn name(&self) -> &'static str;

    /// Whether the pass runs for sources of this shape.
    fn applies_to(&self, shape: SourceShape) -> bool;

    /// Evaluate `left` against `right`.
    fn propose(&self, left: &Entity, right: &Entity) -> Result<Option<EdgeProposal>, SkipReason>;
}

/// Configuration for the inference engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    /// Rows sampled per side for cardinality classification.
    pub sample_size: usize,
    /// Run the `<table>_id` naming heuristic on relational sources.
    pub relational_naming: bool,
    /// Run the column-root containment heuristic on file sources.
    pub file_naming: bool,
    /// Also try the dictionary singular of table names.
    pub use_inflection: bool,
    /// Classify cardinality of resolved edges.
    pub cardinality: bool,
    /// Enable the value-distribution extension point.
    pub distribution: bool,
    /// Enable the column-name similarity extension point.
    pub semantic_similarity: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            relational_naming: true,
            file_naming: true,
            use_inflection: true,
            cardinality: true,
            distribution: false,
            semantic_similarity: false,
        }
    }
}

impl InferenceConfig {
    /// Only ingest declared relationships; no heuristics, no sampling.
    pub fn schema_only() -> Self {
        Self {
            relational_naming: false,
            file_naming: false,
            cardinality: false,
            ..Default::default()
        }
    }

    /// Builder: set the per-side sample size.
    pub fn with_sample_size(mut self, rows: usize) -> Self {
        self.sample_size = rows.max(1);
        self
    }

    /// Builder: toggle inflection-aware key candidates.
    pub fn with_inflection(mut self, enabled: bool) -> Self {
        self.use_inflection = enabled;
        self
    }

    /// Builder: toggle cardinality classification.
    pub fn with_cardinality(mut self, enabled: bool) -> Self {
        self.cardinality = enabled;
        self
    }
}

/// Runs inference passes and cardinality classification.
pub struct InferenceEngine {
    config: InferenceConfig,
    passes: Vec<Box<dyn InferencePass>>,
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new(InferenceConfig::default())
    }
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("config", &self.config)
            .field("passes", &self.pass_names())
            .finish()
    }
}

impl InferenceEngine {
    /// Create an engine with the built-in passes enabled by `config`.
    pub fn new(config: InferenceConfig) -> Self {
        let mut passes: Vec<Box<dyn InferencePass>> = Vec::new();
        if config.relational_naming {
            passes.push(Box::new(RelationalNamingPass::new(config.use_inflection)));
        }
        if config.file_naming {
            passes.push(Box::new(FileNamingPass));
        }
        if config.distribution {
            passes.push(Box::new(DistributionPass));
        }
        if config.semantic_similarity {
            passes.push(Box::new(SemanticSimilarityPass));
        }
        Self { config, passes }
    }

    /// Builder: append a custom pass. It runs after the built-in ones.
    pub fn with_pass(mut self, pass: impl InferencePass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Names of the registered passes, in run order.
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Evaluate every applicable pass over every ordered pair of distinct
    /// entities.
    ///
    /// Proposals are returned grouped by pass, in pass order. Skipped pairs
    /// are recorded in `report`.
    pub fn propose_edges(
        &self,
        shape: SourceShape,
        entities: &[&Entity],
        report: &mut BuildReport,
    ) -> Vec<EdgeProposal> {
        let mut proposals = Vec::new();
        for pass in self.passes.iter().filter(|p| p.applies_to(shape)) {
            let before = proposals.len();
            for (i, left) in entities.iter().enumerate() {
                for (j, right) in entities.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    match pass.propose(left, right) {
                        Ok(Some(proposal)) => {
                            tracing::debug!(
                                pass = pass.name(),
                                left = %proposal.left,
                                right = %proposal.right,
                                keys = ?proposal.keys,
                                "proposed edge"
                            );
                            proposals.push(proposal);
                        }
                        Ok(None) => {}
                        Err(reason) => report.skip(
                            pass.name(),
                            left.identifier(),
                            Some(right.identifier()),
                            reason,
                        ),
                    }
                }
            }
            tracing::debug!(
                pass = pass.name(),
                proposals = proposals.len() - before,
                "pass finished"
            );
        }
        proposals
    }

    /// Classify the cardinality of `edge`, reading it from `left` to `right`.
    ///
    /// Returns `Ok(None)` when classification is disabled or the edge does
    /// not know both join columns yet. Samples are fetched once per entity
    /// and cached on it.
    pub fn classify_edge<S>(
        &self,
        source: &S,
        left: &Entity,
        right: &Entity,
        edge: &Edge,
    ) -> Result<Option<Cardinality>, SkipReason>
    where
        S: SourceAdapter + ?Sized,
    {
        if !self.config.cardinality {
            return Ok(None);
        }
        let (Some(left_column), Some(right_column)) = (
            edge.key_for(left.identifier()),
            edge.key_for(right.identifier()),
        ) else {
            return Ok(None);
        };

        let left_profile = profile(
            left.identifier(),
            self.sample(source, left)?,
            left_column,
        )?;
        let right_profile = profile(
            right.identifier(),
            self.sample(source, right)?,
            right_column,
        )?;
        Ok(Some(classify(left_profile, right_profile)))
    }

    fn sample<'e, S>(&self, source: &S, entity: &'e Entity) -> Result<&'e crate::model::Sample, SkipReason>
    where
        S: SourceAdapter + ?Sized,
    {
        entity
            .sample(source, self.config.sample_size)
            .map_err(|e| SkipReason::SampleFailed {
                identifier: entity.identifier().to_string(),
                message: e.to_string(),
            })
    }
}
