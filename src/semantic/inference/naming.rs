//! Naming heuristics.
//!
//! Two passes, one per source shape:
//!
//! | Pass | Shape | Rule |
//! |---|---|---|
//! | `relational_naming` | relational | `<table minus trailing s>_id` appears in the other table |
//! | `file_naming` | file collection | a column's root (before the last `_`) occurs in the other identifier |
//!
//! Both compare names case-insensitively.

use super::inflection::{singularize, strip_trailing_s};
use super::{EdgeProposal, InferencePass, SkipReason};
use crate::model::{Entity, QualifiedName};
use crate::source::SourceShape;

/// Foreign-key column names that would reference `table`, most specific
/// first.
///
/// The literal rule drops exactly one trailing `s` (`customers` ->
/// `customer_id`, `data` -> `data_id`). With `use_inflection`, the dictionary
/// singular is tried next when it differs (`categories` -> `category_id`).
pub fn candidate_fk_columns(table: &str, use_inflection: bool) -> Vec<String> {
    let table = table.to_lowercase();
    let mut candidates = vec![format!("{}_id", strip_trailing_s(&table))];
    if use_inflection {
        let inflected = format!("{}_id", singularize(&table));
        if !candidates.contains(&inflected) {
            candidates.push(inflected);
        }
    }
    candidates
}

/// `<table>_id` matching for `database.schema.table` entities.
///
/// For a pair (left, right), proposes `{left: left's identity column,
/// right: matched column}` when right has a column named after left.
#[derive(Debug, Clone, Copy)]
pub struct RelationalNamingPass {
    use_inflection: bool,
}

impl RelationalNamingPass {
    pub const NAME: &'static str = "relational_naming";

    pub fn new(use_inflection: bool) -> Self {
        Self { use_inflection }
    }
}

impl Default for RelationalNamingPass {
    fn default() -> Self {
        Self::new(true)
    }
}

impl InferencePass for RelationalNamingPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn applies_to(&self, shape: SourceShape) -> bool {
        shape == SourceShape::Relational
    }

    fn propose(&self, left: &Entity, right: &Entity) -> Result<Option<EdgeProposal>, SkipReason> {
        let name = QualifiedName::parse(left.identifier())?;
        QualifiedName::parse(right.identifier())?;
        if right.columns().is_empty() {
            return Err(SkipReason::NoColumns {
                identifier: right.identifier().to_string(),
            });
        }

        for candidate in candidate_fk_columns(name.table, self.use_inflection) {
            if let Some(column) = right
                .columns()
                .iter()
                .find(|c| c.eq_ignore_ascii_case(&candidate))
            {
                return Ok(Some(
                    EdgeProposal::new(left, right, Self::NAME)
                        .with_key(left, left.identity_column())
                        .with_key(right, column.as_str()),
                ));
            }
        }
        Ok(None)
    }
}

/// Column-root containment for file collections.
///
/// For each column of left, the part before the last underscore is looked
/// up in right's identifier; the first hit proposes `{left: column, right:
/// right's identity column}`. Columns without an underscore have no root and
/// are ignored. Expected to over-match.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNamingPass;

impl FileNamingPass {
    pub const NAME: &'static str = "file_naming";
}

impl InferencePass for FileNamingPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn applies_to(&self, shape: SourceShape) -> bool {
        shape == SourceShape::FileCollection
    }

    fn propose(&self, left: &Entity, right: &Entity) -> Result<Option<EdgeProposal>, SkipReason> {
        if left.columns().is_empty() {
            return Err(SkipReason::NoColumns {
                identifier: left.identifier().to_string(),
            });
        }

        let target = right.identifier().to_lowercase();
        let matched = left.columns().iter().find(|column| {
            column
                .rsplit_once('_')
                .map(|(root, _)| root.to_lowercase())
                .is_some_and(|root| !root.is_empty() && target.contains(&root))
        });

        Ok(matched.map(|column| {
            EdgeProposal::new(left, right, Self::NAME)
                .with_key(left, column.as_str())
                .with_key(right, right.identity_column())
        }))
    }
}
