use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoadError>;

/// Every way an upload can fail.
///
/// Only `FileNotFound` gets its own user-facing message; everything else is
/// reported with its description.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Missing one or more required environment variables: {}", .keys.join(", "))]
    ConfigMissing { keys: Vec<&'static str> },

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Could not read env file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: duckdb::Error,
    },

    #[error("Could not open the in-memory DuckDB staging database: {0}")]
    Engine(#[source] duckdb::Error),

    #[error("Could not connect to the destination database: {0}")]
    Connection(#[source] duckdb::Error),

    #[error("Could not write table {table}: {source}")]
    Write {
        table: String,
        #[source]
        source: duckdb::Error,
    },

    #[error("Table {table} holds {actual} rows after upload, expected {expected}")]
    RowCountMismatch {
        table: String,
        expected: u64,
        actual: u64,
    },
}

impl LoadError {
    pub fn is_file_not_found(&self) -> bool {
        matches!(self, LoadError::FileNotFound(_))
    }

    /// True for failures raised before any database connection is attempted.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            LoadError::ConfigMissing { .. } | LoadError::ConfigInvalid(_) | LoadError::EnvFile { .. }
        )
    }
}
