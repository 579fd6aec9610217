//! Configuration module for entitygraph.
//!
//! Handles named source definitions, inference settings, and environment
//! variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, file_source, InferenceSettings, Settings, SettingsError, SourceSettings,
    SqliteSettings, CONFIG_ENV_VAR,
};
