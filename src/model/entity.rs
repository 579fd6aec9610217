//! Entity descriptors.
//!
//! An [`Entity`] names one table, file, or partition group exposed by a
//! source adapter, together with its column list and lazily cached metadata
//! (primary-key candidates, elected key, and a bounded row sample).

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use super::Sample;
use crate::source::{SourceAdapter, SourceResult};

/// Column assumed to carry identity when an entity has no elected key.
pub const DEFAULT_IDENTITY_COLUMN: &str = "id";

/// Descriptor of one data entity.
///
/// Equality and hashing use the owning source name and the identifier only,
/// so clones handed out by an adapter compare equal to the graph's nodes.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    source: String,
    identifier: String,
    name: String,
    columns: Vec<String>,
    column_types: HashMap<String, String>,
    primary_key_candidates: Vec<String>,
    declared_primary_key: Option<String>,
    elected_primary_key: Option<String>,
    #[serde(skip)]
    sample: OnceCell<Sample>,
}

impl Entity {
    /// Create an entity with no columns yet.
    ///
    /// The local name is derived from the identifier: the table component of
    /// a `database.schema.table` name, otherwise the last path segment with
    /// its extension removed.
    pub fn new(source: impl Into<String>, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let name = derive_name(&identifier);
        Self {
            source: source.into(),
            identifier,
            name,
            columns: Vec::new(),
            column_types: HashMap::new(),
            primary_key_candidates: Vec::new(),
            declared_primary_key: None,
            elected_primary_key: None,
            sample: OnceCell::new(),
        }
    }

    /// Builder: override the local name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.refresh_keys();
        self
    }

    /// Builder: set the column list (source order).
    pub fn with_columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.set_columns(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: record a declared column type.
    pub fn with_column_type(mut self, column: impl Into<String>, data_type: impl Into<String>) -> Self {
        self.column_types.insert(column.into(), data_type.into());
        self
    }

    /// Builder: record a primary key declared by the source catalog.
    ///
    /// A declared key always wins the election over name-based candidates.
    pub fn with_declared_primary_key(mut self, column: impl Into<String>) -> Self {
        self.declared_primary_key = Some(column.into());
        self.refresh_keys();
        self
    }

    /// Materialize the column list and re-run primary key election.
    pub fn set_columns(&mut self, columns: Vec<String>) {
        self.columns = columns;
        self.refresh_keys();
    }

    /// Replace the column type map.
    pub fn set_column_types(&mut self, column_types: HashMap<String, String>) {
        self.column_types = column_types;
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Local name (table name or file stem).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the column list has been populated.
    pub fn is_materialized(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.eq_ignore_ascii_case(column))
    }

    pub fn column_type(&self, column: &str) -> Option<&str> {
        self.column_types.get(column).map(String::as_str)
    }

    pub fn column_types(&self) -> &HashMap<String, String> {
        &self.column_types
    }

    /// Columns suspected to carry identity (`id`, `<name>_id`).
    pub fn primary_key_candidates(&self) -> &[String] {
        &self.primary_key_candidates
    }

    /// Primary key reported by the source catalog, if any.
    pub fn declared_primary_key(&self) -> Option<&str> {
        self.declared_primary_key.as_deref()
    }

    pub fn elected_primary_key(&self) -> Option<&str> {
        self.elected_primary_key.as_deref()
    }

    /// The elected key, or [`DEFAULT_IDENTITY_COLUMN`] when nothing was elected.
    pub fn identity_column(&self) -> &str {
        self.elected_primary_key
            .as_deref()
            .unwrap_or(DEFAULT_IDENTITY_COLUMN)
    }

    /// Fetch (once) and return a bounded sample through the owning adapter.
    ///
    /// The first successful fetch is cached for the lifetime of this value;
    /// later calls return it regardless of `limit`.
    pub fn sample<S>(&self, source: &S, limit: usize) -> SourceResult<&Sample>
    where
        S: SourceAdapter + ?Sized,
    {
        if let Some(sample) = self.sample.get() {
            return Ok(sample);
        }
        let mut fetched = source.sample(self, limit)?;
        fetched.truncate(limit);
        Ok(self.sample.get_or_init(|| fetched))
    }

    /// The cached sample, if one was fetched.
    pub fn cached_sample(&self) -> Option<&Sample> {
        self.sample.get()
    }

    fn refresh_keys(&mut self) {
        let name = self.name.to_lowercase();
        let own = format!("{name}_id");
        let own_singular = name
            .strip_suffix('s')
            .map(|stem| format!("{stem}_id"))
            .unwrap_or_else(|| own.clone());

        self.primary_key_candidates = self
            .columns
            .iter()
            .filter(|c| {
                let c = c.to_lowercase();
                c == DEFAULT_IDENTITY_COLUMN || c == own || c == own_singular
            })
            .cloned()
            .collect();

        // First match wins; no candidate means no election.
        self.elected_primary_key = self
            .declared_primary_key
            .clone()
            .or_else(|| self.primary_key_candidates.first().cloned());
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier && self.source == other.source
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.identifier.hash(state);
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)
    }
}

/// An identifier that does not split into `database.schema.table`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier '{identifier}' has {parts} dot-separated parts, expected database.schema.table")]
pub struct MalformedIdentifier {
    pub identifier: String,
    pub parts: usize,
}

/// A relational identifier split into its three components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedName<'a> {
    pub database: &'a str,
    pub schema: &'a str,
    pub table: &'a str,
}

impl<'a> QualifiedName<'a> {
    /// Split an identifier into exactly three non-empty components.
    pub fn parse(identifier: &'a str) -> Result<Self, MalformedIdentifier> {
        let parts: Vec<&str> = identifier.split('.').collect();
        match parts.as_slice() {
            [database, schema, table]
                if !database.is_empty() && !schema.is_empty() && !table.is_empty() =>
            {
                Ok(Self {
                    database,
                    schema,
                    table,
                })
            }
            _ => Err(MalformedIdentifier {
                identifier: identifier.to_string(),
                parts: parts.len(),
            }),
        }
    }
}

impl fmt::Display for QualifiedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.table)
    }
}

fn derive_name(identifier: &str) -> String {
    if let Ok(name) = QualifiedName::parse(identifier) {
        return name.table.to_string();
    }
    let trimmed = identifier.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    segment.split('.').next().unwrap_or(segment).to_string()
}
