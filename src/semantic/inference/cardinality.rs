//! Sample-based cardinality classification.
//!
//! The classification is an estimate drawn from bounded samples, not a
//! guarantee: a join column that is unique within the first
//! [`DEFAULT_SAMPLE_SIZE`] rows may still repeat in the full dataset. Treat
//! the result as "consistent with the sample".

use super::SkipReason;
use crate::model::{Cardinality, Sample};

/// Rows fetched from each side of an edge.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Distinct and total counts of a join column within a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnProfile {
    /// Distinct non-null values.
    pub distinct: usize,
    /// Sampled rows.
    pub rows: usize,
}

impl ColumnProfile {
    pub fn new(distinct: usize, rows: usize) -> Self {
        Self { distinct, rows }
    }

    /// Every sampled row carries a different non-null value.
    pub fn is_unique(&self) -> bool {
        self.distinct == self.rows
    }
}

/// Profile `column` within `sample`.
///
/// An empty sample or a missing column cannot be classified.
pub fn profile(identifier: &str, sample: &Sample, column: &str) -> Result<ColumnProfile, SkipReason> {
    if sample.is_empty() {
        return Err(SkipReason::EmptySample {
            identifier: identifier.to_string(),
        });
    }
    let distinct = sample
        .distinct_count(column)
        .ok_or_else(|| SkipReason::MissingJoinColumn {
            identifier: identifier.to_string(),
            column: column.to_string(),
        })?;
    Ok(ColumnProfile::new(distinct, sample.len()))
}

/// Classify an edge from the profiles of its two join columns, read left to
/// right.
pub fn classify(left: ColumnProfile, right: ColumnProfile) -> Cardinality {
    Cardinality::from_uniqueness(left.is_unique(), right.is_unique())
}
