//! Build diagnostics.
//!
//! A heuristic that cannot evaluate a candidate pair returns a
//! [`SkipReason`]; the build records it as a [`Diagnostic`] and moves on to
//! the next pair.

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::model::MalformedIdentifier;

/// Why a candidate pair or edge was skipped by an inference pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The relational heuristic needs `database.schema.table`.
    #[error(transparent)]
    MalformedIdentifier(#[from] MalformedIdentifier),

    #[error("entity '{identifier}' has no columns")]
    NoColumns { identifier: String },

    #[error("sample of '{identifier}' has no rows")]
    EmptySample { identifier: String },

    #[error("join column '{column}' is not in the sample of '{identifier}'")]
    MissingJoinColumn { identifier: String, column: String },

    #[error("sampling '{identifier}' failed: {message}")]
    SampleFailed { identifier: String, message: String },

    #[error("entity '{identifier}' is not a node of the graph")]
    UnknownEntity { identifier: String },
}

/// One skipped evaluation, attributed to the pass that skipped it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Name of the pass (`relational_naming`, `cardinality`, ...).
    pub pass: String,
    pub left: String,
    pub right: Option<String>,
    #[serde(serialize_with = "serialize_display")]
    pub reason: SkipReason,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.right {
            Some(right) => write!(f, "[{}] {} <-> {}: {}", self.pass, self.left, right, self.reason),
            None => write!(f, "[{}] {}: {}", self.pass, self.left, self.reason),
        }
    }
}

fn serialize_display<S: Serializer>(reason: &SkipReason, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

/// Summary of one `build()` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub nodes: usize,
    pub schema_edges: usize,
    pub inferred_edges: usize,
    /// Edges that received a cardinality.
    pub classified_edges: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    /// Record a skipped evaluation.
    ///
    /// A reason already recorded for the same pass is not repeated, so an
    /// entity with a bad identifier yields one diagnostic per pass instead of
    /// one per partner.
    pub fn skip(&mut self, pass: &str, left: &str, right: Option<&str>, reason: SkipReason) {
        if self
            .diagnostics
            .iter()
            .any(|d| d.pass == pass && d.reason == reason)
        {
            return;
        }
        tracing::warn!(
            pass = %pass,
            left = %left,
            right = right.unwrap_or("-"),
            reason = %reason,
            "skipped candidate"
        );
        self.diagnostics.push(Diagnostic {
            pass: pass.to_string(),
            left: left.to_string(),
            right: right.map(str::to_string),
            reason,
        });
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Diagnostics recorded by one pass.
    pub fn diagnostics_for<'a>(&'a self, pass: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.pass == pass)
    }

    /// Total edges in the graph after the build.
    pub fn edges(&self) -> usize {
        self.schema_edges + self.inferred_edges
    }
}
