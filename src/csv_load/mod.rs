pub mod core_processor;
pub mod replace_strategy;
pub mod table_writer;

use std::path::Path;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{LoadError, Result};
use core_processor::CoreProcessor;
use replace_strategy::ReplaceStrategy;
use table_writer::TableWriter;

pub const DEFAULT_TABLE_NAME: &str = "housing";
pub const DEFAULT_SCHEMA_NAME: &str = "public";

pub const FILE_NOT_FOUND_MESSAGE: &str =
    "❌ File not found. Please upload 'housing.csv' to the data folder.";

/// Where the staged data ends up.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOptions {
    pub table_name: String,
    pub schema_name: String,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            schema_name: DEFAULT_SCHEMA_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    pub table: String,
    pub rows: u64,
}

/// Upload `data_file` into the destination table, replacing whatever was
/// there. Configuration is only validated once the file has been read, and
/// no connection is opened unless it is complete.
pub fn upload_csv(data_file: &Path, config: &DatabaseConfig, options: &UploadOptions) -> Result<UploadReport> {
    let processor = CoreProcessor::create_core_processor(data_file, options)?;

    let staged_rows = processor.create_duckdb_table()?;
    info!("Columns: {}", processor.column_names()?.join(", "));

    let params = config.require()?;
    processor.attach_postgres_db(&params)?;

    let strategy: Box<dyn TableWriter> = Box::new(ReplaceStrategy);
    let rows = strategy.write_table(&processor, staged_rows)?;

    info!("Successfully loaded '{}'", data_file.display());
    Ok(UploadReport {
        table: processor.get_schema_qualified_table(),
        rows,
    })
}

/// The single line printed for an upload outcome.
pub fn status_line(outcome: &Result<UploadReport>) -> String {
    match outcome {
        Ok(report) => format!("✅ Upload complete. Rows inserted: {}", report.rows),
        Err(LoadError::FileNotFound(_)) => FILE_NOT_FOUND_MESSAGE.to_string(),
        Err(e) => format!("❌ Error: {}", e),
    }
}
