use pyo3::prelude::*;
use std::path::Path;

use crate::config::DatabaseConfig;
use crate::csv_load::{upload_csv, UploadOptions, DEFAULT_SCHEMA_NAME, DEFAULT_TABLE_NAME};

/// Upload a CSV into Postgres, returning the number of rows inserted.
#[pyfunction]
#[pyo3(signature = (data_path, env_path, table_name = DEFAULT_TABLE_NAME, schema_name = DEFAULT_SCHEMA_NAME))]
fn upload_file(data_path: &str, env_path: &str, table_name: &str, schema_name: &str) -> PyResult<u64> {
    let to_py = |e: crate::error::LoadError| {
        if e.is_file_not_found() {
            PyErr::new::<pyo3::exceptions::PyFileNotFoundError, _>(e.to_string())
        } else if e.is_config_error() {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
        } else {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string())
        }
    };

    let config = DatabaseConfig::load(Path::new(env_path)).map_err(to_py)?;
    let options = UploadOptions {
        table_name: table_name.to_string(),
        schema_name: schema_name.to_string(),
    };
    let report = upload_csv(Path::new(data_path), &config, &options).map_err(to_py)?;
    Ok(report.rows)
}

#[pymodule]
#[pyo3(name = "housing_loader")]
fn housing_loader(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(upload_file, m)?)?;
    Ok(())
}
