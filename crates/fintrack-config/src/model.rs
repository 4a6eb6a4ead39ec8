use serde::{de::Deserializer, Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::ConfigError;

/// User-configurable presentation and storage preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_precision")]
    pub precision: u8,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_user: Option<String>,

    /// Directory holding one JSON book per user. Defaults to `<base>/books`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-IN".into(),
            currency: "INR".into(),
            currency_symbol: Self::default_currency_symbol(),
            precision: Self::default_precision(),
            theme: Theme::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            active_user: None,
            book_root: None,
            backup_root: None,
        }
    }
}

impl Config {
    pub const MAX_PRECISION: u8 = 4;

    pub fn default_currency_symbol() -> String {
        "₹".into()
    }

    pub fn default_precision() -> u8 {
        2
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_book_root(&self, base: &Path) -> PathBuf {
        self.book_root
            .clone()
            .unwrap_or_else(|| base.join("books"))
    }

    pub fn resolve_backup_root(&self, base: &Path) -> PathBuf {
        self.backup_root
            .clone()
            .unwrap_or_else(|| base.join("backups"))
    }

    /// Current value of a setting as shown by `config show`.
    pub fn get(&self, key: ConfigKey) -> String {
        let path_or_default = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(default)".into())
        };
        match key {
            ConfigKey::Locale => self.locale.clone(),
            ConfigKey::Currency => self.currency.clone(),
            ConfigKey::CurrencySymbol => self.currency_symbol.clone(),
            ConfigKey::Precision => self.precision.to_string(),
            ConfigKey::Theme => self.theme.to_string(),
            ConfigKey::Color => self.ui_color_enabled.to_string(),
            ConfigKey::ActiveUser => self.active_user.clone().unwrap_or_else(|| "-".into()),
            ConfigKey::BookRoot => path_or_default(&self.book_root),
            ConfigKey::BackupRoot => path_or_default(&self.backup_root),
        }
    }

    /// Validates and applies a textual value.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.as_str().into(),
            value: value.into(),
            reason: reason.into(),
        };
        match key {
            ConfigKey::Locale => {
                if value.is_empty() {
                    return Err(invalid("locale cannot be empty"));
                }
                self.locale = value.into();
            }
            ConfigKey::Currency => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(invalid("expected a three-letter currency code"));
                }
                self.currency = value.to_ascii_uppercase();
            }
            ConfigKey::CurrencySymbol => {
                if value.is_empty() {
                    return Err(invalid("symbol cannot be empty"));
                }
                self.currency_symbol = value.into();
            }
            ConfigKey::Precision => {
                let precision: u8 = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number"))?;
                if precision > Self::MAX_PRECISION {
                    return Err(invalid("precision must be between 0 and 4"));
                }
                self.precision = precision;
            }
            ConfigKey::Theme => {
                self.theme = Theme::parse(value).ok_or_else(|| invalid("use `light` or `dark`"))?;
            }
            ConfigKey::Color => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => return Err(invalid("use `on` or `off`")),
                };
            }
            ConfigKey::ActiveUser => {
                self.active_user = (!value.is_empty() && value != "-").then(|| value.to_string());
            }
            ConfigKey::BookRoot => self.book_root = optional_path(value),
            ConfigKey::BackupRoot => self.backup_root = optional_path(value),
        }
        Ok(())
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    match value {
        "" | "default" => None,
        other => Some(PathBuf::from(other)),
    }
}

/// Settings addressable through `config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Locale,
    Currency,
    CurrencySymbol,
    Precision,
    Theme,
    Color,
    ActiveUser,
    BookRoot,
    BackupRoot,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 9] = [
        ConfigKey::Locale,
        ConfigKey::Currency,
        ConfigKey::CurrencySymbol,
        ConfigKey::Precision,
        ConfigKey::Theme,
        ConfigKey::Color,
        ConfigKey::ActiveUser,
        ConfigKey::BookRoot,
        ConfigKey::BackupRoot,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Locale => "locale",
            ConfigKey::Currency => "currency",
            ConfigKey::CurrencySymbol => "symbol",
            ConfigKey::Precision => "precision",
            ConfigKey::Theme => "theme",
            ConfigKey::Color => "color",
            ConfigKey::ActiveUser => "user",
            ConfigKey::BookRoot => "book_root",
            ConfigKey::BackupRoot => "backup_root",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let needle = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == needle)
            .ok_or_else(|| ConfigError::UnknownKey(input.trim().to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        };
        f.write_str(label)
    }
}

/// Unknown or missing theme names fall back to the default.
impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or_default())
    }
}
