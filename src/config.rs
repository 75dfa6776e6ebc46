//! Configuration for check runs, loaded from `armory.toml`

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::provider::{FixtureSource, DEFAULT_LANGUAGE};

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse armory.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// No config file found and none was given
    #[error("no armory.toml found")]
    Missing,
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// A single field-level validation failure
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Top-level `armory.toml` structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// What to check
    pub target: TargetConfig,
    /// Where records come from
    #[serde(default)]
    pub source: SourceConfig,
}

/// The account and catalog a check run is aimed at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Title whose catalog and schema to fetch
    pub app_id: u32,
    /// Catalog language
    #[serde(default = "default_language")]
    pub language: String,
    /// Account whose inventory to cross-check
    pub account_id64: u64,
    /// Community inventory context
    #[serde(default = "default_context_id")]
    pub context_id: u32,
    /// Page size for the reference listing
    #[serde(default = "default_count")]
    pub count: usize,
}

/// Record source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Root directory of the record fixture tree
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Treat recoverable parse warnings as errors
    #[serde(default)]
    pub strict: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { root: default_root(), strict: false }
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_context_id() -> u32 {
    2
}

fn default_count() -> usize {
    2000
}

fn default_root() -> PathBuf {
    PathBuf::from("fixtures")
}

impl CheckConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.target.app_id == 0 {
            errors.push(ConfigValidationError {
                field: "target.app_id".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if self.target.account_id64 == 0 {
            errors.push(ConfigValidationError {
                field: "target.account_id64".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if self.target.language.is_empty() {
            errors.push(ConfigValidationError {
                field: "target.language".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        if self.target.count == 0 {
            errors.push(ConfigValidationError {
                field: "target.count".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        errors
    }

    /// Build the configured record source.
    pub fn fixture_source(&self) -> FixtureSource {
        let source = FixtureSource::new(&self.source.root);
        if self.source.strict {
            source.strict()
        } else {
            source
        }
    }
}

/// Find armory.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find armory.toml by walking up from the given directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut dir = start.as_path();
    loop {
        let candidate = dir.join("armory.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Load configuration, either from the given path or by discovery.
pub fn load_config(path: Option<&Path>) -> Result<CheckConfig, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => find_config().ok_or(ConfigError::Missing)?,
    };
    load_config_file(&config_path)
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<CheckConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: CheckConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}
