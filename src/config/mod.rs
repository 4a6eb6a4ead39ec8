use std::path::PathBuf;

pub use fintrack_config::{Config, ConfigError, ConfigKey, ConfigManager, Theme, HOME_ENV_VAR};

/// Manager rooted at `FINTRACK_HOME` or the platform data directory.
pub fn default_manager() -> Result<ConfigManager, ConfigError> {
    ConfigManager::from_env()
}

pub fn manager_with_base(base: PathBuf) -> Result<ConfigManager, ConfigError> {
    ConfigManager::with_base_dir(base)
}
