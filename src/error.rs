use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a table from columns
#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),
}

/// Errors raised by the loader stage
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("CSV parse failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),

    #[error("Input has no header row")]
    MissingHeader,

    #[error("Invalid table: {0}")]
    Table(#[from] TableError),
}

/// Errors raised by the persist stage
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Destination table name is empty")]
    EmptyTableName,

    #[error("Table has no columns to persist")]
    NoColumns,
}

/// Crate-level error. Only `DataNotLoaded` ever stops a pipeline run.
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Data not loaded. Please check the data source: {0}")]
    DataNotLoaded(#[source] LoadError),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;
