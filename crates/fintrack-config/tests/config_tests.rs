use fintrack_config::{Config, ConfigError, ConfigKey, ConfigManager, Theme};
use tempfile::tempdir;

#[test]
fn defaults_match_the_rupee_dashboard() {
    let cfg = Config::default();
    assert_eq!(cfg.locale, "en-IN");
    assert_eq!(cfg.currency, "INR");
    assert_eq!(cfg.currency_symbol, "₹");
    assert_eq!(cfg.precision, 2);
    assert_eq!(cfg.theme, Theme::Light);
    assert!(cfg.active_user.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert_eq!(manager.load().expect("load defaults"), Config::default());

    let mut cfg = Config::default();
    cfg.set(ConfigKey::Currency, "usd").expect("currency");
    cfg.set(ConfigKey::CurrencySymbol, "$").expect("symbol");
    cfg.set(ConfigKey::Theme, "Dark").expect("theme");
    cfg.set(ConfigKey::ActiveUser, "asha").expect("user");
    manager.save(&cfg).expect("save config");

    assert!(manager.config_path().ends_with("config/config.json"));
    let loaded = manager.load().expect("load config");
    assert_eq!(loaded.currency, "USD");
    assert_eq!(loaded.currency_symbol, "$");
    assert_eq!(loaded.theme, Theme::Dark);
    assert_eq!(loaded.active_user.as_deref(), Some("asha"));
}

#[test]
fn invalid_values_are_rejected() {
    let mut cfg = Config::default();
    assert!(matches!(
        cfg.set(ConfigKey::Precision, "9"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(cfg.set(ConfigKey::Theme, "neon").is_err());
    assert!(cfg.set(ConfigKey::Currency, "rupees").is_err());
    assert!(matches!(
        ConfigKey::parse("volume"),
        Err(ConfigError::UnknownKey(key)) if key == "volume"
    ));
    assert_eq!(cfg, Config::default());
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    std::fs::write(
        manager.config_path(),
        r#"{ "locale": "en-GB", "currency": "GBP", "theme": "sepia" }"#,
    )
    .expect("write config");

    let loaded = manager.load().expect("load");
    assert_eq!(loaded.locale, "en-GB");
    assert_eq!(loaded.precision, 2);
    assert_eq!(loaded.theme, Theme::Light);
    assert!(loaded.ui_color_enabled);
}

#[test]
fn storage_roots_default_under_base() {
    let dir = tempdir().expect("tempdir");
    let mut cfg = Config::default();
    assert_eq!(cfg.resolve_book_root(dir.path()), dir.path().join("books"));

    cfg.set(ConfigKey::BackupRoot, "/srv/fintrack/backups").expect("backup root");
    assert_eq!(
        cfg.resolve_backup_root(dir.path()),
        std::path::PathBuf::from("/srv/fintrack/backups")
    );
    cfg.set(ConfigKey::BackupRoot, "default").expect("reset");
    assert!(cfg.backup_root.is_none());
}
