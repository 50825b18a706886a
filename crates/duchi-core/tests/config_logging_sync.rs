//! The global configuration manager drives the logger's level filter
//!
//! Kept as a single test: it mutates process-wide logger state.

use duchi_core::config::{get_config_manager, init_config_with, ConfigManager};
use duchi_core::logging::{self, LogLevel};
use duchi_core::DuchiConfig;

#[test]
fn test_global_manager_changes_reach_the_logger() {
    let config = DuchiConfig::default();
    duchi_core::init(&config).unwrap();
    let manager = init_config_with(config);
    assert!(std::ptr::eq(manager, get_config_manager().unwrap()));

    assert!(!logging::is_enabled("store", LogLevel::Debug));

    manager.set_category_level("store", "trace");
    assert!(logging::is_enabled("store", LogLevel::Trace));

    manager.set_category_level("store", "error");
    assert!(!logging::is_enabled("store", LogLevel::Warn));
    assert!(logging::is_enabled("store", LogLevel::Error));

    manager.update_config(|config| {
        config.logging.category_levels.remove("store");
    });
    assert!(!logging::is_enabled("store", LogLevel::Debug));
    assert!(logging::is_enabled("store", LogLevel::Info));

    // A standalone manager leaves the logger alone
    let local = ConfigManager::new();
    local.set_category_level("store", "trace");
    assert!(!logging::is_enabled("store", LogLevel::Trace));

    // Reinstalling replaces the levels wholesale
    let mut quiet = DuchiConfig::default();
    quiet
        .logging
        .category_levels
        .insert("editor".to_string(), "error".to_string());
    let manager = init_config_with(quiet);

    assert_eq!(manager.get_category_level("editor"), Some("error".to_string()));
    assert!(!logging::is_enabled("editor", LogLevel::Info));
}
