use std::path::{Path, PathBuf};

pub const DATA_FILE_NAME: &str = "housing.csv";

/// Where the input CSV and the env file live.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPaths {
    pub data_file: PathBuf,
    pub env_file: PathBuf,
}

impl ProjectPaths {
    /// `<base>/data/housing.csv` and `<base>/.env`.
    pub fn from_base(base: &Path) -> Self {
        Self {
            data_file: base.join("data").join(DATA_FILE_NAME),
            env_file: base.join(".env"),
        }
    }

    /// Resolve against the project directory this tool was built from, so the
    /// working directory at invocation time does not matter.
    pub fn locate() -> Self {
        Self::from_base(Path::new(env!("CARGO_MANIFEST_DIR")))
    }
}
