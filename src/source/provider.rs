//! File providers and storage formats.

use serde::{Deserialize, Serialize};

/// Where a file collection lives. Each provider has a URI prefix that is
/// stripped from stored entity identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileProvider {
    /// Local filesystem (`/`).
    #[default]
    Local,
    /// Amazon S3 (`s3://`).
    S3,
    /// Google Cloud Storage (`gs://`).
    Gcs,
    /// Azure Blob / ADLS (`abfs://`).
    Azure,
}

impl FileProvider {
    pub const ALL: [FileProvider; 4] = [
        FileProvider::Local,
        FileProvider::S3,
        FileProvider::Gcs,
        FileProvider::Azure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileProvider::Local => "local",
            FileProvider::S3 => "s3",
            FileProvider::Gcs => "gcs",
            FileProvider::Azure => "azure",
        }
    }

    /// URI prefix of this provider.
    pub fn prefix(&self) -> &'static str {
        match self {
            FileProvider::Local => "/",
            FileProvider::S3 => "s3://",
            FileProvider::Gcs => "gs://",
            FileProvider::Azure => "abfs://",
        }
    }

    /// Find a provider prefix already present at the start of `root`.
    pub fn prefix_in(root: &str) -> Option<&'static str> {
        Self::ALL
            .iter()
            .map(FileProvider::prefix)
            .find(|prefix| root.starts_with(prefix))
    }

    /// Remove this provider's prefix from a full path.
    pub fn strip<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(self.prefix()).unwrap_or(path)
    }
}

/// On-disk format of the files in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    #[default]
    Parquet,
    Csv,
    Tsv,
    /// Tab-delimited text with a header row.
    Txt,
}

impl StorageFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            StorageFormat::Parquet => "parquet",
            StorageFormat::Csv => "csv",
            StorageFormat::Tsv => "tsv",
            StorageFormat::Txt => "txt",
        }
    }

    /// Whether `path` names a file of this format.
    pub fn matches(&self, path: &str) -> bool {
        path.rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(self.extension()))
    }

    /// Field delimiter for text formats.
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            StorageFormat::Parquet => None,
            StorageFormat::Csv => Some(b','),
            StorageFormat::Tsv | StorageFormat::Txt => Some(b'\t'),
        }
    }
}

impl std::str::FromStr for StorageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parquet" => Ok(StorageFormat::Parquet),
            "csv" => Ok(StorageFormat::Csv),
            "tsv" => Ok(StorageFormat::Tsv),
            "txt" => Ok(StorageFormat::Txt),
            other => Err(other.to_string()),
        }
    }
}
