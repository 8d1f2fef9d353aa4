use tracing::{debug, info, warn};

use crate::csv_load::core_processor::{quote_ident, CoreProcessor, ATTACHED_DB, STAGING_TABLE};
use crate::csv_load::table_writer::TableWriter;
use crate::error::{LoadError, Result};

/// Drops the destination table if present and recreates it from the staged
/// data. The previous contents and column layout are discarded. Drop and
/// create run in one transaction, a failed run leaves the old table in place.
pub struct ReplaceStrategy;

impl ReplaceStrategy {
    // Create the destination schema, public always exists
    fn create_schema(&self, core_processor: &CoreProcessor) -> duckdb::Result<()> {
        if core_processor.schema_name() == "public" {
            return Ok(());
        }
        let query = format!(
            "CREATE SCHEMA IF NOT EXISTS {}.{};",
            ATTACHED_DB,
            quote_ident(core_processor.schema_name())
        );
        debug!("{}", query);
        core_processor.conn().execute(&query, [])?;
        Ok(())
    }

    // Drop the existing table
    fn drop_existing_table(&self, core_processor: &CoreProcessor, qualified_table: &str) -> duckdb::Result<()> {
        let query = format!("DROP TABLE IF EXISTS {};", qualified_table);
        debug!("{}", query);
        core_processor.conn().execute(&query, [])?;
        Ok(())
    }

    fn create_table(&self, core_processor: &CoreProcessor, qualified_table: &str) -> duckdb::Result<()> {
        let query = format!(
            "CREATE TABLE {} AS SELECT * FROM {};",
            qualified_table, STAGING_TABLE
        );
        debug!("{}", query);
        core_processor.conn().execute(&query, [])?;
        Ok(())
    }

    fn replace_table(&self, core_processor: &CoreProcessor, qualified_table: &str, staged_rows: u64) -> Result<u64> {
        let write_error = |source| LoadError::Write {
            table: qualified_table.to_string(),
            source,
        };

        self.create_schema(core_processor).map_err(write_error)?;
        self.drop_existing_table(core_processor, qualified_table)
            .map_err(write_error)?;
        self.create_table(core_processor, qualified_table)
            .map_err(write_error)?;

        let written = core_processor
            .count_rows(qualified_table)
            .map_err(write_error)?;
        if written != staged_rows {
            return Err(LoadError::RowCountMismatch {
                table: qualified_table.to_string(),
                expected: staged_rows,
                actual: written,
            });
        }
        Ok(written)
    }
}

impl TableWriter for ReplaceStrategy {
    fn write_table(&self, core_processor: &CoreProcessor, staged_rows: u64) -> Result<u64> {
        let qualified_table = core_processor.get_schema_qualified_table();
        let conn = core_processor.conn();
        let write_error = |source| LoadError::Write {
            table: qualified_table.clone(),
            source,
        };

        conn.execute_batch("BEGIN TRANSACTION;").map_err(write_error)?;
        let written = match self.replace_table(core_processor, &qualified_table, staged_rows) {
            Ok(written) => written,
            Err(e) => {
                if let Err(rollback) = conn.execute_batch("ROLLBACK;") {
                    warn!("Rollback of {} failed: {}", qualified_table, rollback);
                }
                return Err(e);
            }
        };
        conn.execute_batch("COMMIT;").map_err(write_error)?;

        info!(
            "Table {} replaced and {} rows inserted successfully",
            core_processor.table_name(),
            written
        );
        Ok(written)
    }
}
