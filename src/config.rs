use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{EtlError, Result};
use crate::pipeline::loader::LoadOptions;

/// Where the persist stage writes: a SQLite database file and a table name
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Destination {
    pub database: PathBuf,
    pub table: String,
}

impl Default for Destination {
    fn default() -> Self {
        Self {
            database: PathBuf::from(constants::DEFAULT_DATABASE_PATH),
            table: constants::DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

/// Where a [`PipelineConfig`] came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Defaults => f.write_str("built-in defaults"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Settings for one pipeline run. Every field has a hardcoded default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub destination: Destination,
    pub delimiter: char,
    pub na_values: Vec<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(constants::DEFAULT_INPUT_PATH),
            destination: Destination::default(),
            delimiter: constants::DEFAULT_DELIMITER,
            na_values: constants::default_na_values(),
            log_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document; keys that are absent keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from `path` if it exists, otherwise use the defaults.
    /// Nothing is logged here: this runs before logging is set up.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, ConfigSource)> {
        let path = path.as_ref();
        if path.exists() {
            let config = Self::load(path)?;
            Ok((config, ConfigSource::File(path.to_path_buf())))
        } else {
            Ok((Self::default(), ConfigSource::Defaults))
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter,
            na_values: self.na_values.clone(),
        }
    }

    fn check(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(EtlError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if self.destination.table.trim().is_empty() {
            return Err(EtlError::Config("destination.table must not be empty".to_string()));
        }
        Ok(())
    }
}
