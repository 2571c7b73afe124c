// src/config.rs

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the dataset location.
pub const DATASET_PATH_ENV: &str = "DIGIT_PCA_DATASET";

/// Dataset file used when no override is given, relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str = "mnist.npy";

/// Where the pipeline reads its dataset from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Path to a `.npy` file holding an (n_samples, n_features) array.
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATASET_PATH),
        }
    }
}

impl DatasetConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Reads `DIGIT_PCA_DATASET`, falling back to [`DEFAULT_DATASET_PATH`].
    /// An empty value counts as unset.
    pub fn from_env() -> Self {
        match env::var_os(DATASET_PATH_ENV) {
            Some(value) if !value.is_empty() => Self {
                path: PathBuf::from(value),
            },
            _ => Self::default(),
        }
    }

    /// True when the configured file exists. Used by the reference tests to skip cleanly.
    pub fn dataset_available(&self) -> bool {
        self.path.is_file()
    }
}
