//! File collection adapter.
//!
//! A [`FileSource`] treats every data file under a root (or every partition
//! directory, when partitioned) as one entity. Columns are discovered by
//! reading the file header or Parquet schema; there are no declared
//! relationships.
//!
//! Paths are provider-relative: the configured root must not carry the
//! provider's URI prefix, and entity identifiers are stored without it.
//!
//! ```text
//! provider prefix   root           prefix       file
//! ───────────────   ────────────   ─────────    ─────────────────────
//! s3://             lake/raw       /sales       /orders/part-0.parquet
//!                   └──────── entity identifier ──────────┘
//! ```

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Read};

use parquet::file::reader::ChunkReader;
use regex::Regex;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::adapter::memoize;
use super::provider::{FileProvider, StorageFormat};
use super::reader::{read_delimited, read_parquet, ReadResult};
use super::{DefinedEdge, SourceAdapter, SourceError, SourceResult, SourceShape};
use crate::model::{Entity, Sample};

/// One entry returned by a [`FileSystem`] listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Full path, including the provider prefix.
    pub path: String,
    pub is_file: bool,
}

/// Storage access used by [`FileSource`].
///
/// Object stores plug in here; the crate ships [`LocalFileSystem`].
///
/// Files are handed out as readers so a sample only pulls the bytes its
/// rows need: a sequential stream for delimited text, a random-access
/// handle for Parquet (footer first, then the first row group).
pub trait FileSystem {
    /// Random-access handle for columnar files.
    type Chunk: ChunkReader + 'static;

    /// List entries under `root`, descending into subdirectories when
    /// `recursive` is set.
    fn list(&self, root: &str, recursive: bool) -> SourceResult<Vec<FileInfo>>;

    /// Open a file as a sequential stream.
    fn open(&self, path: &str) -> SourceResult<Box<dyn Read + '_>>;

    /// Open a file for random access.
    fn open_chunked(&self, path: &str) -> SourceResult<Self::Chunk>;

    /// Whether `path` names an existing directory.
    fn is_dir(&self, path: &str) -> bool;
}

/// Local disk access built on `walkdir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    type Chunk = File;

    fn list(&self, root: &str, recursive: bool) -> SourceResult<Vec<FileInfo>> {
        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut entries = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            entries.push(FileInfo {
                path: entry.path().to_string_lossy().into_owned(),
                is_file: entry.file_type().is_file(),
            });
        }
        Ok(entries)
    }

    fn open(&self, path: &str) -> SourceResult<Box<dyn Read + '_>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn open_chunked(&self, path: &str) -> SourceResult<File> {
        Ok(File::open(path)?)
    }

    fn is_dir(&self, path: &str) -> bool {
        std::path::Path::new(path).is_dir()
    }
}

/// Settings of a file collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSourceConfig {
    /// Provider-relative root directory.
    pub root: String,
    #[serde(default)]
    pub provider: FileProvider,
    #[serde(default)]
    pub format: StorageFormat,
    /// Sub-directory under the root to restrict the listing to.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Regex; files whose identifier matches are skipped.
    #[serde(default)]
    pub exclude: Option<String>,
    /// Group files by their first directory under the root.
    #[serde(default)]
    pub partitioned: bool,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

fn default_recursive() -> bool {
    true
}

impl FileSourceConfig {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            provider: FileProvider::default(),
            format: StorageFormat::default(),
            prefix: None,
            exclude: None,
            partitioned: false,
            recursive: true,
        }
    }

    pub fn with_provider(mut self, provider: FileProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_format(mut self, format: StorageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude = Some(pattern.into());
        self
    }

    pub fn partitioned(mut self, partitioned: bool) -> Self {
        self.partitioned = partitioned;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Memoized listing: entities plus the data files behind each of them.
#[derive(Debug, Default)]
struct Listing {
    entities: Vec<Entity>,
    files: BTreeMap<String, Vec<String>>,
}

/// Schemaless source over a directory of data files.
pub struct FileSource<F: FileSystem = LocalFileSystem> {
    name: String,
    config: FileSourceConfig,
    exclude: Option<Regex>,
    fs: F,
    connected: OnceCell<()>,
    listing: OnceCell<Listing>,
}

impl FileSource<LocalFileSystem> {
    /// Create a source over the local filesystem.
    pub fn new(name: impl Into<String>, config: FileSourceConfig) -> SourceResult<Self> {
        Self::with_filesystem(name, config, LocalFileSystem)
    }
}

impl<F: FileSystem> FileSource<F> {
    /// Create a source over an arbitrary [`FileSystem`].
    ///
    /// Fails when the root already contains a provider prefix or the
    /// exclusion pattern does not compile.
    pub fn with_filesystem(
        name: impl Into<String>,
        config: FileSourceConfig,
        fs: F,
    ) -> SourceResult<Self> {
        if let Some(prefix) = FileProvider::prefix_in(&config.root) {
            return Err(SourceError::ProviderPrefixInRoot {
                root: config.root.clone(),
                prefix: prefix.to_string(),
            });
        }
        let exclude = config.exclude.as_deref().map(Regex::new).transpose()?;
        Ok(Self {
            name: name.into(),
            config,
            exclude,
            fs,
            connected: OnceCell::new(),
            listing: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &FileSourceConfig {
        &self.config
    }

    /// Provider prefix + root + optional prefix, without a trailing slash.
    pub fn full_path(&self) -> String {
        let mut path = format!(
            "{}{}",
            self.config.provider.prefix(),
            self.config.root.trim_end_matches('/')
        );
        if let Some(prefix) = self.config.prefix.as_deref() {
            let prefix = prefix.trim_matches('/');
            if !prefix.is_empty() {
                path.push('/');
                path.push_str(prefix);
            }
        }
        path
    }

    fn is_excluded(&self, identifier: &str) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(identifier))
    }

    fn read_file(&self, path: &str, limit: usize) -> SourceResult<ReadResult> {
        match self.config.format {
            StorageFormat::Parquet => read_parquet(self.fs.open_chunked(path)?, limit),
            format => {
                let delimiter = format
                    .delimiter()
                    .ok_or_else(|| SourceError::UnsupportedFormat(format.extension().to_string()))?;
                read_delimited(self.fs.open(path)?, delimiter, limit)
            }
        }
    }

    /// Group data files into entity identifiers.
    fn group_files(&self, root: &str, files: Vec<String>) -> BTreeMap<String, Vec<String>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for path in files {
            let relative = path
                .strip_prefix(root)
                .map(|rest| rest.trim_start_matches('/'))
                .unwrap_or(&path);
            let key = match relative.split_once('/') {
                Some((partition, _)) if self.config.partitioned => format!("{root}/{partition}"),
                _ => path.clone(),
            };
            let identifier = self.config.provider.strip(&key).to_string();
            groups.entry(identifier).or_default().push(path);
        }
        groups
    }

    fn load_listing(&self) -> SourceResult<Listing> {
        self.connection()?;
        let root = self.full_path();

        let mut files: Vec<String> = self
            .fs
            .list(&root, self.config.recursive)?
            .into_iter()
            .filter(|info| info.is_file && self.config.format.matches(&info.path))
            .map(|info| info.path)
            .filter(|path| !self.is_excluded(self.config.provider.strip(path)))
            .collect();
        files.sort();

        let groups = self.group_files(&root, files);
        let mut entities = Vec::with_capacity(groups.len());
        for (identifier, paths) in &groups {
            let mut entity = Entity::new(&self.name, identifier.as_str());
            // Column discovery reads only the header or schema of the first file.
            match paths.first().map(|path| self.read_file(path, 0)) {
                Some(Ok(read)) => {
                    entity.set_columns(read.sample.columns().to_vec());
                    entity.set_column_types(read.column_types);
                }
                Some(Err(e)) => {
                    tracing::warn!(
                        entity = %identifier,
                        error = %e,
                        "could not read columns, entity will have none"
                    );
                }
                None => {}
            }
            entities.push(entity);
        }

        tracing::debug!(
            source = %self.name,
            root = %root,
            count = entities.len(),
            "listed file entities"
        );
        Ok(Listing {
            entities,
            files: groups,
        })
    }

    fn listing(&self) -> SourceResult<&Listing> {
        memoize(&self.listing, || self.load_listing())
    }
}

impl<F: FileSystem> SourceAdapter for FileSource<F> {
    type Connection = F;

    fn name(&self) -> &str {
        &self.name
    }

    fn shape(&self) -> SourceShape {
        SourceShape::FileCollection
    }

    fn connection(&self) -> SourceResult<&F> {
        memoize(&self.connected, || {
            let root = self.full_path();
            if self.fs.is_dir(&root) {
                Ok(())
            } else {
                Err(SourceError::NotADirectory(root))
            }
        })?;
        Ok(&self.fs)
    }

    fn list_entities(&self) -> SourceResult<&[Entity]> {
        Ok(&self.listing()?.entities)
    }

    fn defined_edges(&self) -> SourceResult<&[DefinedEdge]> {
        Ok(&[])
    }

    /// Reads the entity's files in path order until `limit` rows are
    /// collected. Later files are aligned to the first file's header by
    /// column name.
    fn sample(&self, entity: &Entity, limit: usize) -> SourceResult<Sample> {
        let paths = self
            .listing()?
            .files
            .get(entity.identifier())
            .ok_or_else(|| SourceError::UnknownEntity(entity.identifier().to_string()))?;

        let mut sample: Option<Sample> = None;
        for path in paths {
            let collected = sample.as_ref().map_or(0, Sample::len);
            if sample.is_some() && collected >= limit {
                break;
            }
            let read = self.read_file(path, limit - collected)?.sample;
            match sample.as_mut() {
                None => sample = Some(read),
                Some(acc) => {
                    let positions: Vec<Option<usize>> =
                        acc.columns().iter().map(|c| read.column_index(c)).collect();
                    for row in read.rows() {
                        acc.push_row(
                            positions
                                .iter()
                                .map(|pos| pos.and_then(|i| row[i].clone()))
                                .collect(),
                        );
                    }
                }
            }
        }
        Ok(sample.unwrap_or_else(|| Sample::new(entity.columns().iter().cloned())))
    }
}
