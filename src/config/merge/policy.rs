//! Merge policy: the defaults every layer overrides.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with built-in defaults (lowest precedence).
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("storage.data_file", "data/users.json")?
        .set_default("router.failure_reporting", "flagged")?
        .set_default("logging.level", "info")?
        .set_default("logging.output", "stderr")
}
