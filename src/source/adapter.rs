//! SourceAdapter trait definition.
//!
//! The SourceAdapter trait abstracts over the kinds of data sources an
//! entity graph can be built from. Implementations own their connection and
//! memoize listings, so repeated calls hand out the same entities.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use super::SourceResult;
use crate::model::{Entity, Sample};

/// Structural shape of a source.
///
/// The inference engine picks its naming heuristics from the shape, never
/// from the concrete adapter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceShape {
    /// Catalog of `database.schema.table` entities.
    Relational,
    /// Collection of files or partition groups addressed by path.
    FileCollection,
}

/// A relationship declared by the source itself (e.g. a foreign key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefinedEdge {
    /// Identifier of the referencing entity.
    pub referencing: String,
    /// Identifier of the referenced entity.
    pub referenced: String,
    /// Referencing column.
    pub column: String,
    /// Referenced column, when the catalog reports one.
    pub referenced_column: Option<String>,
}

impl DefinedEdge {
    pub fn new(
        referencing: impl Into<String>,
        referenced: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            referencing: referencing.into(),
            referenced: referenced.into(),
            column: column.into(),
            referenced_column: None,
        }
    }

    /// Builder: set the referenced column.
    pub fn with_referenced_column(mut self, column: impl Into<String>) -> Self {
        self.referenced_column = Some(column.into());
        self
    }
}

/// Capability interface implemented per source kind.
///
/// All methods take `&self`; implementations cache their connection,
/// entity listing, and defined edges internally for their whole lifetime.
///
/// # Example
///
/// ```ignore
/// use entitygraph::source::{SourceAdapter, SqliteSource};
///
/// let source = SqliteSource::open("./shop.db");
/// for entity in source.list_entities()? {
///     println!("{} {:?}", entity.identifier(), entity.columns());
/// }
/// ```
pub trait SourceAdapter {
    /// Opaque connection or session handle.
    type Connection;

    /// Name of this source instance; stamped on every entity it lists.
    fn name(&self) -> &str;

    /// Structural shape used to select inference heuristics.
    fn shape(&self) -> SourceShape;

    /// Obtain the connection, opening it on first use.
    fn connection(&self) -> SourceResult<&Self::Connection>;

    /// List the entities of this source (memoized, stable identifiers).
    fn list_entities(&self) -> SourceResult<&[Entity]>;

    /// Relationships declared by the source. Empty for schemaless sources.
    fn defined_edges(&self) -> SourceResult<&[DefinedEdge]>;

    /// Fetch up to `limit` rows of `entity`.
    fn sample(&self, entity: &Entity, limit: usize) -> SourceResult<Sample>;

    /// Look up a listed entity by identifier.
    fn entity(&self, identifier: &str) -> SourceResult<Option<&Entity>> {
        Ok(self
            .list_entities()?
            .iter()
            .find(|e| e.identifier() == identifier))
    }
}

/// Initialize `cell` with a fallible computation on first access.
pub(crate) fn memoize<T>(
    cell: &OnceCell<T>,
    init: impl FnOnce() -> SourceResult<T>,
) -> SourceResult<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}
