//! In-memory source adapter.
//!
//! Useful for tests and for callers that already hold catalog metadata and
//! want to run inference without a live connection.

use std::collections::HashMap;

use super::{DefinedEdge, SourceAdapter, SourceError, SourceResult, SourceShape};
use crate::model::{Entity, Sample};

/// A source whose entities, declared edges, and samples are supplied by the
/// caller.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    shape: SourceShape,
    entities: Vec<Entity>,
    edges: Vec<DefinedEdge>,
    samples: HashMap<String, Sample>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, shape: SourceShape) -> Self {
        Self {
            name: name.into(),
            shape,
            entities: Vec::new(),
            edges: Vec::new(),
            samples: HashMap::new(),
        }
    }

    /// Shorthand for a relational source.
    pub fn relational(name: impl Into<String>) -> Self {
        Self::new(name, SourceShape::Relational)
    }

    /// Shorthand for a file collection.
    pub fn files(name: impl Into<String>) -> Self {
        Self::new(name, SourceShape::FileCollection)
    }

    /// Builder: add an entity with the given columns.
    pub fn with_table<I, C>(self, identifier: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let entity = Entity::new(self.name.clone(), identifier).with_columns(columns);
        self.with_entity(entity)
    }

    /// Builder: add a prepared entity. Its source name is replaced.
    pub fn with_entity(mut self, entity: Entity) -> Self {
        let mut rebound = Entity::new(self.name.clone(), entity.identifier())
            .with_name(entity.name());
        if let Some(key) = entity.declared_primary_key() {
            rebound = rebound.with_declared_primary_key(key);
        }
        rebound.set_columns(entity.columns().to_vec());
        rebound.set_column_types(entity.column_types().clone());
        self.entities.push(rebound);
        self
    }

    /// Builder: declare a relationship.
    pub fn with_defined_edge(mut self, edge: DefinedEdge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Builder: supply the rows returned when `identifier` is sampled.
    pub fn with_sample(mut self, identifier: impl Into<String>, sample: Sample) -> Self {
        self.samples.insert(identifier.into(), sample);
        self
    }
}

impl SourceAdapter for MemorySource {
    type Connection = ();

    fn name(&self) -> &str {
        &self.name
    }

    fn shape(&self) -> SourceShape {
        self.shape
    }

    fn connection(&self) -> SourceResult<&()> {
        Ok(&())
    }

    fn list_entities(&self) -> SourceResult<&[Entity]> {
        Ok(&self.entities)
    }

    fn defined_edges(&self) -> SourceResult<&[DefinedEdge]> {
        Ok(&self.edges)
    }

    fn sample(&self, entity: &Entity, limit: usize) -> SourceResult<Sample> {
        if !self.entities.iter().any(|e| e.identifier() == entity.identifier()) {
            return Err(SourceError::UnknownEntity(entity.identifier().to_string()));
        }
        let mut sample = self
            .samples
            .get(entity.identifier())
            .cloned()
            .unwrap_or_else(|| Sample::new(entity.columns().iter().cloned()));
        sample.truncate(limit);
        Ok(sample)
    }
}
