//! Core data model: entities, relationship edges, cardinality, and samples.

mod cardinality;
mod edge;
mod entity;
mod sample;

pub use cardinality::Cardinality;
pub use edge::{Edge, EdgeOrigin, KeyMap};
pub use entity::{Entity, MalformedIdentifier, QualifiedName, DEFAULT_IDENTITY_COLUMN};
pub use sample::Sample;
