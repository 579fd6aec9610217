//! Source adapters.
//!
//! A source adapter turns one concrete data store into a uniform list of
//! [`Entity`](crate::model::Entity) descriptors, optional declared
//! relationships, and bounded row samples.
//!
//! # Architecture
//!
//! ```text
//!                    ┌──────────────────────┐
//!                    │  trait SourceAdapter │
//!                    │  name / shape        │
//!                    │  connection          │
//!                    │  list_entities       │
//!                    │  defined_edges       │
//!                    │  sample              │
//!                    └──────────┬───────────┘
//!          ┌────────────────────┼──────────────────────┐
//!          ▼                    ▼                      ▼
//!   ┌──────────────┐   ┌──────────────────┐   ┌────────────────┐
//!   │ SqliteSource │   │ FileSource<F>    │   │ MemorySource   │
//!   │ Relational   │   │ FileCollection   │   │ either shape   │
//!   └──────────────┘   └────────┬─────────┘   └────────────────┘
//!                               ▼
//!                       trait FileSystem
//!                       (LocalFileSystem)
//! ```
//!
//! Adapters memoize their connection, listing, and defined edges, so every
//! call after the first is answered from the cache.

mod adapter;
mod error;
mod filesystem;
mod memory;
mod provider;
mod reader;
mod relational;

pub use adapter::{DefinedEdge, SourceAdapter, SourceShape};
pub use error::{SourceError, SourceResult};
pub use filesystem::{FileInfo, FileSource, FileSourceConfig, FileSystem, LocalFileSystem};
pub use memory::MemorySource;
pub use provider::{FileProvider, StorageFormat};
pub use reader::{read_delimited, read_parquet, ReadResult};
pub use relational::SqliteSource;
