use duckdb::arrow::datatypes::Schema;
use duckdb::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ConnectionParams;
use crate::csv_load::UploadOptions;
use crate::error::{LoadError, Result};

/// Alias the destination Postgres database is attached under.
pub const ATTACHED_DB: &str = "housing_pg";

/// In-memory DuckDB table the CSV is staged into.
pub const STAGING_TABLE: &str = "data";

// Main processor struct, owns the DuckDB connection for the whole run.
// Reads the CSV into the staging table and attaches the destination database.
// Writing the staged rows out is left to a TableWriter strategy.
pub struct CoreProcessor {
    file_path: PathBuf,
    table_name: String,
    schema_name: String,
    conn: Connection,
}

impl CoreProcessor {
    // Create new CoreProcessor, failing early if the input file is absent
    pub fn create_core_processor(file_path: &Path, options: &UploadOptions) -> Result<Self> {
        if !file_path.is_file() {
            return Err(LoadError::FileNotFound(file_path.to_path_buf()));
        }

        let conn = Connection::open_in_memory().map_err(LoadError::Engine)?;

        Ok(Self {
            file_path: file_path.to_path_buf(),
            table_name: options.table_name.clone(),
            schema_name: options.schema_name.clone(),
            conn,
        })
    }

    // Read the CSV into the staging table. Header row gives the column names,
    // column types are left to DuckDB's sniffer.
    pub fn create_duckdb_table(&self) -> Result<u64> {
        let query = format!(
            "CREATE TABLE {} AS SELECT * FROM read_csv({}, header = true);",
            STAGING_TABLE,
            quote_literal(&self.file_path.to_string_lossy())
        );
        debug!("{}", query);

        self.conn.execute(&query, []).map_err(|source| self.parse_error(source))?;

        let rows = self
            .count_rows(STAGING_TABLE)
            .map_err(|source| self.parse_error(source))?;
        info!("Read {} rows from {}", rows, self.file_path.display());
        Ok(rows)
    }

    // Query the staged data and log the schema
    pub fn query_and_log_schema(&self) -> Result<Arc<Schema>> {
        let query = format!("SELECT * FROM {} LIMIT 10", STAGING_TABLE);
        let mut stmt = self.conn.prepare(&query).map_err(|source| self.parse_error(source))?;
        let arrow_result = stmt.query_arrow([]).map_err(|source| self.parse_error(source))?;
        let schema = arrow_result.get_schema();
        debug!("The data schema is: {:?}", schema);
        Ok(schema)
    }

    /// Column names of the staged table, in file order.
    pub fn column_names(&self) -> Result<Vec<String>> {
        let schema = self.query_and_log_schema()?;
        Ok(schema.fields().iter().map(|f| f.name().to_string()).collect())
    }

    // Install the postgres extension and attach the destination database
    pub fn attach_postgres_db(&self, params: &ConnectionParams) -> Result<()> {
        let conn_str = params.connection_string()?;
        info!("Connecting to {}", params.redacted());

        self.conn
            .execute("INSTALL postgres;", [])
            .map_err(LoadError::Connection)?;
        self.conn
            .execute("LOAD postgres;", [])
            .map_err(LoadError::Connection)?;
        self.conn
            .execute(
                &format!(
                    "ATTACH {} AS {} (TYPE POSTGRES)",
                    quote_literal(&conn_str),
                    ATTACHED_DB
                ),
                [],
            )
            .map_err(LoadError::Connection)?;
        Ok(())
    }

    // Get the schema qualified destination table inside the attached database
    pub fn get_schema_qualified_table(&self) -> String {
        format!(
            "{}.{}.{}",
            ATTACHED_DB,
            quote_ident(&self.schema_name),
            quote_ident(&self.table_name)
        )
    }

    pub fn count_rows(&self, table: &str) -> duckdb::Result<u64> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT count(*) FROM {};", table), [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn parse_error(&self, source: duckdb::Error) -> LoadError {
        LoadError::Parse {
            path: self.file_path.clone(),
            source,
        }
    }

    // Getter methods for attributes that need to be accessed by strategies
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // Attach a DuckDB file under the destination alias in place of Postgres
    #[cfg(test)]
    pub(crate) fn attach_duckdb_file(&self, path: &Path) -> duckdb::Result<()> {
        self.conn.execute(
            &format!(
                "ATTACH {} AS {}",
                quote_literal(&path.to_string_lossy()),
                ATTACHED_DB
            ),
            [],
        )?;
        Ok(())
    }
}

/// Double-quoted SQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Single-quoted SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
