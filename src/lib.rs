//! Load the housing CSV into a Postgres table, replacing the table each run.
//!
//! The CSV is staged in an in-memory DuckDB database and written to Postgres
//! through DuckDB's postgres extension.

pub mod config;
pub mod csv_load;
pub mod error;
pub mod paths;

#[cfg(feature = "python")]
mod python;

pub use config::{ConnectionParams, DatabaseConfig};
pub use csv_load::{status_line, upload_csv, UploadOptions, UploadReport};
pub use error::{LoadError, Result};
pub use paths::ProjectPaths;
