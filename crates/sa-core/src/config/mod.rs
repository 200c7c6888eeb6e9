//! Configuration loading for sa-core.
//!
//! Resolves config.json through the standard order, parses and validates it,
//! and records a snapshot for the report metadata.

pub use sa_config::{AnalysisConfig, ConfigPaths, ConfigSnapshot, ConfigSource, ValidationError};

use sa_config::{resolve_config, validate_config};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl From<ConfigError> for sa_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ValidationError(_) => sa_common::Error::InvalidConfig(err.to_string()),
            other => sa_common::Error::Config(other.to_string()),
        }
    }
}

/// Configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: AnalysisConfig,
    pub paths: ConfigPaths,
    pub snapshot: ConfigSnapshot,
}

impl ResolvedConfig {
    /// Built-in defaults, used when no file resolves.
    pub fn defaults() -> Self {
        ResolvedConfig {
            config: AnalysisConfig::default(),
            paths: ConfigPaths::default(),
            snapshot: ConfigSnapshot::defaults_only(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.paths.config.is_none()
    }
}

/// Load and validate configuration.
///
/// An explicit `cli_path` that does not exist is an error; a missing file
/// anywhere else in the resolution order falls back to defaults.
pub fn load_config(cli_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    let paths = resolve_config(cli_path);
    let Some(path) = paths.config.clone() else {
        return Ok(ResolvedConfig::defaults());
    };
    if !path.exists() {
        return Err(ConfigError::NotFound { path });
    }

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::IoError {
        path: path.clone(),
        source,
    })?;
    let config = AnalysisConfig::from_json(&raw).map_err(|source| ConfigError::ParseError {
        path: path.clone(),
        source,
    })?;
    validate_config(&config)?;

    let snapshot = ConfigSnapshot::new(&config, &paths, Some(&raw));
    Ok(ResolvedConfig {
        config,
        paths,
        snapshot,
    })
}
