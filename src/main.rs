use housing_loader::{status_line, upload_csv, DatabaseConfig, ProjectPaths, UploadOptions};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let paths = ProjectPaths::locate();
    info!("Starting housing upload from {}", paths.data_file.display());

    let outcome = DatabaseConfig::load(&paths.env_file)
        .and_then(|config| upload_csv(&paths.data_file, &config, &UploadOptions::default()));

    println!("{}", status_line(&outcome));
}
