//! StorageConfig and data file resolution.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_data_file() -> PathBuf {
    PathBuf::from("data/users.json")
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the user collection (relative paths resolve against the working directory)
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl StorageConfig {
    pub fn resolve_path(&self, working_dir: &Path) -> PathBuf {
        if self.data_file.is_absolute() {
            self.data_file.clone()
        } else {
            working_dir.join(&self.data_file)
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}
