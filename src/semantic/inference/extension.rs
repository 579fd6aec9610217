//! Reserved inference passes.
//!
//! These passes are registered by name so configurations can enable them
//! ahead of time. Neither proposes edges yet.

use super::{EdgeProposal, InferencePass, SkipReason};
use crate::model::Entity;
use crate::source::SourceShape;

/// Match join columns by type and value distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistributionPass;

impl InferencePass for DistributionPass {
    fn name(&self) -> &'static str {
        "distribution"
    }

    fn applies_to(&self, _shape: SourceShape) -> bool {
        true
    }

    fn propose(&self, _left: &Entity, _right: &Entity) -> Result<Option<EdgeProposal>, SkipReason> {
        Ok(None)
    }
}

/// Match join columns by natural-language similarity of their names.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticSimilarityPass;

impl InferencePass for SemanticSimilarityPass {
    fn name(&self) -> &'static str {
        "semantic_similarity"
    }

    fn applies_to(&self, _shape: SourceShape) -> bool {
        true
    }

    fn propose(&self, _left: &Entity, _right: &Entity) -> Result<Option<EdgeProposal>, SkipReason> {
        Ok(None)
    }
}
