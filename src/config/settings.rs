//! TOML-based configuration for entitygraph.
//!
//! Supports a config file (entitygraph.toml) with environment variable
//! expansion in paths.
//!
//! Example configuration:
//! ```toml
//! [sources.shop]
//! kind = "sqlite"
//! path = "${DATA_DIR}/shop.db"
//! database = "shop"
//!
//! [sources.lake]
//! kind = "files"
//! root = "data/lake"
//! provider = "local"
//! format = "parquet"
//! exclude = "_tmp|\\.crc$"
//! partitioned = true
//!
//! [inference]
//! sample_size = 100
//! use_inflection = true
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::semantic::inference::{InferenceConfig, DEFAULT_SAMPLE_SIZE};
use crate::source::{FileProvider, FileSource, FileSourceConfig, SourceError, SqliteSource};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "ENTITYGRAPH_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid source configuration: {0}")]
    InvalidSource(#[from] SourceError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named sources.
    pub sources: HashMap<String, SourceSettings>,

    /// Inference settings shared by every source.
    pub inference: InferenceSettings,
}

/// One configured source, selected by `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceSettings {
    /// SQLite database file.
    Sqlite(SqliteSettings),
    /// Directory of data files.
    Files(FileSourceConfig),
}

impl SourceSettings {
    /// The `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceSettings::Sqlite(_) => "sqlite",
            SourceSettings::Files(_) => "files",
        }
    }
}

/// SQLite source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SqliteSettings {
    /// Database file (supports ${ENV_VAR} expansion).
    pub path: String,

    /// First identifier component. Defaults to the file stem.
    #[serde(default)]
    pub database: Option<String>,
}

impl SqliteSettings {
    /// Build the adapter. Nothing is opened until first use.
    pub fn to_source(&self, name: &str) -> Result<SqliteSource, SettingsError> {
        let path = expand_env_vars(&self.path)?;
        let mut source = SqliteSource::open(path).with_name(name);
        if let Some(database) = &self.database {
            source = source.with_database(database.clone());
        }
        Ok(source)
    }
}

/// Build a local file source from its settings, expanding the root and
/// prefix.
///
/// Remote providers have no built-in filesystem; pass one to
/// [`FileSource::with_filesystem`] instead.
pub fn file_source(name: &str, config: &FileSourceConfig) -> Result<FileSource, SettingsError> {
    check_local(name, config)?;
    let mut config = config.clone();
    config.root = expand_env_vars(&config.root)?;
    config.prefix = config.prefix.as_deref().map(expand_env_vars).transpose()?;
    Ok(FileSource::new(name, config)?)
}

fn check_local(name: &str, config: &FileSourceConfig) -> Result<(), SettingsError> {
    if config.provider != FileProvider::Local {
        return Err(SettingsError::InvalidConfig(format!(
            "source '{}' uses provider '{}'; only local file sources can be built from configuration",
            name,
            config.provider.as_str()
        )));
    }
    Ok(())
}

/// Inference settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Rows sampled per side for cardinality classification.
    pub sample_size: usize,

    /// Run the `<table>_id` heuristic on relational sources.
    pub relational_naming: bool,

    /// Run the column-root heuristic on file sources.
    pub file_naming: bool,

    /// Also try dictionary singulars of table names.
    pub use_inflection: bool,

    /// Classify cardinality from samples.
    pub cardinality: bool,

    /// Reserved value-distribution pass.
    pub distribution: bool,

    /// Reserved column-name similarity pass.
    pub semantic_similarity: bool,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            relational_naming: true,
            file_naming: true,
            use_inflection: true,
            cardinality: true,
            distribution: false,
            semantic_similarity: false,
        }
    }
}

impl From<&InferenceSettings> for InferenceConfig {
    fn from(settings: &InferenceSettings) -> Self {
        InferenceConfig {
            sample_size: settings.sample_size,
            relational_naming: settings.relational_naming,
            file_naming: settings.file_naming,
            use_inflection: settings.use_inflection,
            cardinality: settings.cardinality,
            distribution: settings.distribution,
            semantic_similarity: settings.semantic_similarity,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `ENTITYGRAPH_CONFIG`
    /// 2. `./entitygraph.toml`
    /// 3. `~/.config/entitygraph/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("entitygraph.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("entitygraph").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.inference.sample_size == 0 {
            return Err(SettingsError::InvalidConfig(
                "inference.sample_size must be at least 1".to_string(),
            ));
        }
        for (name, source) in &self.sources {
            if let SourceSettings::Files(config) = source {
                if config.root.trim().is_empty() {
                    return Err(SettingsError::InvalidConfig(format!(
                        "source '{}' has an empty root",
                        name
                    )));
                }
                check_local(name, config)?;
            }
        }
        Ok(())
    }

    /// Get a source by name.
    pub fn get_source(&self, name: &str) -> Result<&SourceSettings, SettingsError> {
        self.sources
            .get(name)
            .ok_or_else(|| SettingsError::SourceNotFound(name.to_string()))
    }

    /// Source names, sorted.
    pub fn source_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Engine configuration derived from `[inference]`.
    pub fn inference_config(&self) -> InferenceConfig {
        InferenceConfig::from(&self.inference)
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        if chars.next_if_eq(&'{').is_some() {
            let mut var_name = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                var_name.push(ch);
            }
            if !closed {
                return Err(SettingsError::InvalidConfig(format!(
                    "unterminated variable reference '${{{}'",
                    var_name
                )));
            }
            let value =
                env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
            result.push_str(&value);
        } else {
            // $VAR ends at the first non-alphanumeric, non-underscore character
            let mut var_name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
            } else {
                let value = env::var(&var_name)
                    .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                result.push_str(&value);
            }
        }
    }

    Ok(result)
}
