//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::RosterConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment.
    pub fn load(working_dir: &Path) -> Result<RosterConfig, ConfigError> {
        MergeService::load(working_dir)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<RosterConfig, ConfigError> {
        MergeService::load_from_file(path)
    }
}
