//! fintrack-config
//!
//! Persistent user preferences: the Config model plus disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{ConfigManager, HOME_ENV_VAR};
pub use model::{Config, ConfigKey, Theme};
