use housing_loader::csv_load::core_processor::CoreProcessor;
use housing_loader::{status_line, upload_csv, DatabaseConfig, LoadError, UploadOptions};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::with_suffix(".csv").unwrap();
    for line in lines {
        writeln!(temp_file, "{}", line).unwrap();
    }
    temp_file.flush().unwrap();
    temp_file
}

fn housing_csv() -> NamedTempFile {
    write_csv(&[
        "longitude,latitude,housing_median_age,total_rooms,median_house_value,ocean_proximity",
        "-122.23,37.88,41.0,880.0,452600.0,NEAR BAY",
        "-122.22,37.86,21.0,7099.0,358500.0,NEAR BAY",
        "-122.24,37.85,52.0,1467.0,352100.0,NEAR BAY",
    ])
}

// Points at a port nothing listens on, so a connection attempt would fail loudly.
fn unreachable_config() -> DatabaseConfig {
    DatabaseConfig {
        user: Some("loader".into()),
        password: Some("secret".into()),
        host: Some("127.0.0.1".into()),
        port: Some("1".into()),
        database: Some("housing_db".into()),
    }
}

#[cfg(test)]
mod staging_tests {
    use super::*;

    #[test]
    fn test_row_count_excludes_header() {
        let csv = housing_csv();
        let processor = CoreProcessor::create_core_processor(csv.path(), &UploadOptions::default()).unwrap();

        assert_eq!(processor.create_duckdb_table().unwrap(), 3);
    }

    #[test]
    fn test_columns_come_from_header() {
        let csv = housing_csv();
        let processor = CoreProcessor::create_core_processor(csv.path(), &UploadOptions::default()).unwrap();
        processor.create_duckdb_table().unwrap();

        assert_eq!(
            processor.column_names().unwrap(),
            vec![
                "longitude",
                "latitude",
                "housing_median_age",
                "total_rooms",
                "median_house_value",
                "ocean_proximity"
            ]
        );
    }

    #[test]
    fn test_header_only_file_has_zero_rows() {
        let csv = write_csv(&["id,name,value"]);
        let processor = CoreProcessor::create_core_processor(csv.path(), &UploadOptions::default()).unwrap();

        assert_eq!(processor.create_duckdb_table().unwrap(), 0);
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[test]
    fn test_missing_file_reports_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let data_file = dir.path().join("data").join("housing.csv");

        let outcome = upload_csv(&data_file, &unreachable_config(), &UploadOptions::default());

        assert!(matches!(&outcome, Err(LoadError::FileNotFound(p)) if p == &data_file));
        assert_eq!(
            status_line(&outcome),
            "❌ File not found. Please upload 'housing.csv' to the data folder."
        );
    }

    #[test]
    fn test_missing_file_wins_over_missing_config() {
        let outcome = upload_csv(
            Path::new("/nonexistent/data/housing.csv"),
            &DatabaseConfig::default(),
            &UploadOptions::default(),
        );
        assert!(outcome.unwrap_err().is_file_not_found());
    }

    #[test]
    fn test_bad_env_line_does_not_hide_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        std::fs::write(
            &env_file,
            "POSTGRE_USER=u\nTHIS LINE IS NOT KEY VALUE\nPOSTGRE_HOST=h\n",
        )
        .unwrap();
        let data_file = dir.path().join("data").join("housing.csv");

        let outcome = DatabaseConfig::load(&env_file)
            .and_then(|config| upload_csv(&data_file, &config, &UploadOptions::default()));

        assert!(outcome.as_ref().unwrap_err().is_file_not_found(), "{:?}", outcome);
        assert_eq!(
            status_line(&outcome),
            "❌ File not found. Please upload 'housing.csv' to the data folder."
        );
    }

    #[test]
    fn test_each_missing_setting_stops_before_connecting() {
        let csv = housing_csv();
        let blank: [fn(&mut DatabaseConfig); 5] = [
            |c: &mut DatabaseConfig| c.user = None,
            |c: &mut DatabaseConfig| c.password = Some(String::new()),
            |c: &mut DatabaseConfig| c.host = None,
            |c: &mut DatabaseConfig| c.port = Some(String::new()),
            |c: &mut DatabaseConfig| c.database = None,
        ];

        for clear in blank {
            let mut config = unreachable_config();
            clear(&mut config);

            let outcome = upload_csv(csv.path(), &config, &UploadOptions::default());
            let err = outcome.as_ref().unwrap_err();
            assert!(matches!(err, LoadError::ConfigMissing { keys } if keys.len() == 1), "{:?}", err);
            assert!(status_line(&outcome).starts_with("❌ Error: Missing one or more required environment variables"));
        }
    }

    // Needs the DuckDB postgres extension, which is downloaded on first use.
    #[test]
    #[ignore]
    fn test_unreachable_database_is_a_reported_failure() {
        let csv = housing_csv();

        let outcome = upload_csv(csv.path(), &unreachable_config(), &UploadOptions::default());

        let err = outcome.as_ref().unwrap_err();
        assert!(matches!(err, LoadError::Connection(_)), "{:?}", err);
        assert!(status_line(&outcome).starts_with("❌ Error: "));
    }
}

// Run against a real database with
// HOUSING_TEST_POSTGRE_{USER,PASSWORD,HOST,PORT,DB_NAME} set and `--ignored`.
#[cfg(test)]
mod live_database_tests {
    use super::*;

    fn live_config() -> DatabaseConfig {
        let dir = tempfile::tempdir().unwrap();
        DatabaseConfig::from_lookup(&dir.path().join(".env"), |key| {
            std::env::var(format!("HOUSING_TEST_{}", key)).ok()
        })
        .unwrap()
    }

    fn options() -> UploadOptions {
        UploadOptions {
            table_name: "housing_loader_test".into(),
            ..UploadOptions::default()
        }
    }

    #[test]
    #[ignore]
    fn test_upload_reports_data_row_count() {
        let csv = housing_csv();
        let report = upload_csv(csv.path(), &live_config(), &options()).unwrap();
        assert_eq!(report.rows, 3);
    }

    #[test]
    #[ignore]
    fn test_second_run_replaces_instead_of_appending() {
        let config = live_config();

        upload_csv(housing_csv().path(), &config, &options()).unwrap();
        let smaller = write_csv(&[
            "longitude,latitude,housing_median_age,total_rooms,median_house_value,ocean_proximity",
            "-121.00,38.00,10.0,100.0,100000.0,INLAND",
        ]);
        let report = upload_csv(smaller.path(), &config, &options()).unwrap();

        assert_eq!(report.rows, 1);
    }

    #[test]
    #[ignore]
    fn test_header_only_upload_creates_empty_table() {
        let csv = write_csv(&["id,name,value"]);
        let report = upload_csv(csv.path(), &live_config(), &options()).unwrap();
        assert_eq!(report.rows, 0);
    }
}
