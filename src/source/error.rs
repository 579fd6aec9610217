//! Source adapter error types.

use std::io;
use thiserror::Error;

/// Result type for source adapter operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised by source adapters.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Could not open or reach the underlying source.
    #[error("connection to '{target}' failed: {message}")]
    ConnectionFailed {
        /// Path, URI, or name of the source.
        target: String,
        /// Underlying failure.
        message: String,
    },

    /// Catalog introspection or sampling query failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Reading a file failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A delimited text file could not be parsed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A Parquet file could not be decoded.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// An Arrow batch could not be rendered.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// The configured root already carries a provider prefix.
    #[error("path root '{root}' cannot contain provider prefix '{prefix}'")]
    ProviderPrefixInRoot {
        /// The configured root.
        root: String,
        /// The prefix found in it.
        prefix: String,
    },

    /// The exclusion pattern is not a valid regular expression.
    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The root of a file source is not a directory.
    #[error("file source root must be a directory, got '{0}'")]
    NotADirectory(String),

    /// The entity is not known to this source.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// The storage format cannot be read by this build.
    #[error("unsupported storage format: {0}")]
    UnsupportedFormat(String),
}

impl SourceError {
    /// Create a connection error.
    pub fn connection(target: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::ConnectionFailed {
            target: target.into(),
            message: message.to_string(),
        }
    }

    /// Check if this error means the source itself could not be reached.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::NotADirectory(_))
    }

    /// Check if this error is a configuration mistake caught at construction.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ProviderPrefixInRoot { .. } | Self::InvalidPattern(_)
        )
    }
}
