//! Configuration system for duchi

use crate::error::{DuchiError, ErrorContext, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Global configuration for duchi
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DuchiConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Persistence slot names
    pub storage: StorageConfig,
    /// Theme selection settings
    pub theme: ThemeConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Category-specific log levels (category name -> level string)
    pub category_levels: HashMap<String, String>,
    /// Rate limiting duration in seconds
    pub rate_limit_seconds: u64,
    /// Maximum number of messages before rate limiting kicks in
    pub max_rate_limit_count: u32,
}

/// Names of the two key-value slots the theme store owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Slot holding the JSON list of user themes
    pub user_themes_key: String,
    /// Slot holding the current theme selector
    pub selector_key: String,
}

/// Theme selection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Selector used when nothing has been persisted yet
    pub default_selector: String,
    /// Site origin serving `/giscus/<theme>.css` companion stylesheets.
    ///
    /// When unset, built-in presets resolve to the bare companion theme id.
    pub companion_stylesheet_origin: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut category_levels = HashMap::new();

        category_levels.insert("core".to_string(), "info".to_string());
        category_levels.insert("store".to_string(), "info".to_string());
        category_levels.insert("storage".to_string(), "warn".to_string());
        category_levels.insert("applier".to_string(), "info".to_string());
        category_levels.insert("editor".to_string(), "info".to_string());

        Self {
            category_levels,
            rate_limit_seconds: 5,
            max_rate_limit_count: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            user_themes_key: "duchi-user-themes".to_string(),
            selector_key: "duchi-theme".to_string(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default_selector: "light".to_string(),
            companion_stylesheet_origin: None,
        }
    }
}

impl DuchiConfig {
    /// Parse a configuration from JSON. Missing sections fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            DuchiError::configuration_with_context(
                format!("invalid configuration: {}", e),
                ErrorContext::new("parse", "config"),
            )
        })
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text).map_err(|e| match e {
            DuchiError::Configuration { message, .. } => DuchiError::configuration_with_context(
                message,
                ErrorContext::new("load", "config")
                    .with_metadata("path", path.display().to_string()),
            ),
            other => other,
        })
    }
}

/// Global configuration manager
pub struct ConfigManager {
    config: Arc<RwLock<DuchiConfig>>,
}

impl ConfigManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(DuchiConfig::default())),
        }
    }

    /// Create a configuration manager with custom config
    pub fn with_config(config: DuchiConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Get the global configuration manager instance
    pub fn instance() -> Option<&'static ConfigManager> {
        CONFIG_MANAGER.get()
    }

    /// Get a copy of the current configuration
    pub fn get_config(&self) -> DuchiConfig {
        self.config.read().clone()
    }

    /// Update the configuration
    ///
    /// On the global manager the logging section is pushed to the logger.
    pub fn update_config<F>(&self, updater: F)
    where
        F: FnOnce(&mut DuchiConfig),
    {
        let logging = {
            let mut config = self.config.write();
            updater(&mut config);
            config.logging.clone()
        };

        if self.is_global() {
            crate::logging::update_config(logging);
        }
    }

    fn is_global(&self) -> bool {
        CONFIG_MANAGER
            .get()
            .is_some_and(|global| std::ptr::eq(global, self))
    }

    /// Get the current logging configuration
    pub fn get_logging_config(&self) -> LoggingConfig {
        self.config.read().logging.clone()
    }

    /// Set log level for a specific category
    pub fn set_category_level(&self, category: &str, level: &str) {
        self.update_config(|config| {
            config
                .logging
                .category_levels
                .insert(category.to_string(), level.to_string());
        });
    }

    /// Get log level for a specific category
    pub fn get_category_level(&self, category: &str) -> Option<String> {
        self.config
            .read()
            .logging
            .category_levels
            .get(category)
            .cloned()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

static CONFIG_MANAGER: OnceLock<ConfigManager> = OnceLock::new();

/// Initialize the global configuration manager
pub fn init_config() -> &'static ConfigManager {
    CONFIG_MANAGER.get_or_init(ConfigManager::new)
}

/// Install `config` as the global configuration, replacing any previous one
pub fn init_config_with(config: DuchiConfig) -> &'static ConfigManager {
    let manager = init_config();
    manager.update_config(|current| *current = config);
    manager
}

/// Get the global configuration manager
pub fn get_config_manager() -> Option<&'static ConfigManager> {
    CONFIG_MANAGER.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = DuchiConfig::default();

        assert_eq!(config.storage.user_themes_key, "duchi-user-themes");
        assert_eq!(config.storage.selector_key, "duchi-theme");
        assert_eq!(config.theme.default_selector, "light");
        assert_eq!(config.theme.companion_stylesheet_origin, None);
        assert_eq!(
            config.logging.category_levels.get("storage"),
            Some(&"warn".to_string())
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DuchiConfig::from_json_str(
            r#"{ "theme": { "companion_stylesheet_origin": "https://duchi.blog" } }"#,
        )
        .unwrap();

        assert_eq!(
            config.theme.companion_stylesheet_origin.as_deref(),
            Some("https://duchi.blog")
        );
        assert_eq!(config.theme.default_selector, "light");
        assert_eq!(config.storage, StorageConfig::default());
        assert_eq!(config.logging.rate_limit_seconds, 5);
    }

    #[test]
    fn test_invalid_json_is_configuration_error() {
        let err = DuchiConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DuchiError::Configuration { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duchi.json");
        std::fs::write(&path, r#"{ "storage": { "selector_key": "site-theme" } }"#).unwrap();

        let config = DuchiConfig::from_file(&path).unwrap();
        assert_eq!(config.storage.selector_key, "site-theme");
        assert_eq!(config.storage.user_themes_key, "duchi-user-themes");

        let missing = DuchiConfig::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, DuchiError::Io(_)));
    }

    #[test]
    fn test_config_manager() {
        let manager = ConfigManager::new();

        manager.set_category_level("store", "trace");
        assert_eq!(manager.get_category_level("store"), Some("trace".to_string()));

        manager.update_config(|config| config.theme.default_selector = "dark".to_string());
        assert_eq!(manager.get_config().theme.default_selector, "dark");
        assert_eq!(
            manager.get_logging_config().category_levels.get("store"),
            Some(&"trace".to_string())
        );
    }
}
