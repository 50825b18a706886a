//! Logging system for duchi
//!
//! Messages are filtered per category and optionally rate limited before
//! being forwarded to `tracing`. `init` installs a `tracing-subscriber`
//! formatter; embedders that already run their own subscriber keep it.

use crate::config::LoggingConfig;
use crate::error::{DuchiError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Log levels supported by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Log categories for organizing log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    Core,
    Store,
    Storage,
    Applier,
    Editor,
}

impl LogCategory {
    /// Convert LogCategory to string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Core => "core",
            LogCategory::Store => "store",
            LogCategory::Storage => "storage",
            LogCategory::Applier => "applier",
            LogCategory::Editor => "editor",
        }
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl LogLevel {
    /// Convert string to LogLevel
    pub fn parse(s: &str) -> Option<LogLevel> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Convert LogLevel to string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rate limiting state for a specific category
#[derive(Debug)]
struct RateLimitState {
    last_reset: Instant,
    count: u32,
    max_count: u32,
    duration: Duration,
}

impl RateLimitState {
    fn new(max_count: u32, duration: Duration) -> Self {
        Self {
            last_reset: Instant::now(),
            count: 0,
            max_count,
            duration,
        }
    }

    fn should_allow(&mut self) -> bool {
        let now = Instant::now();

        if now.duration_since(self.last_reset) >= self.duration {
            self.last_reset = now;
            self.count = 0;
        }

        if self.count < self.max_count {
            self.count += 1;
            true
        } else {
            false
        }
    }
}

/// Logger configuration and state
#[derive(Debug)]
pub struct LoggerConfig {
    rate_limiters: RwLock<HashMap<String, RateLimitState>>,
    config: LoggingConfig,
}

impl LoggerConfig {
    /// Create a new logger configuration
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            rate_limiters: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Check if a log message should be allowed based on rate limiting
    pub fn should_allow_log(&self, category: &str) -> bool {
        let mut limiters = self.rate_limiters.write();

        let limiter = limiters.entry(category.to_string()).or_insert_with(|| {
            RateLimitState::new(
                self.config.max_rate_limit_count,
                Duration::from_secs(self.config.rate_limit_seconds),
            )
        });

        limiter.should_allow()
    }

    /// Check if a log level is enabled for a category
    pub fn is_level_enabled(&self, category: &str, level: LogLevel) -> bool {
        if let Some(category_level) = self
            .config
            .category_levels
            .get(category)
            .and_then(|s| LogLevel::parse(s))
        {
            return level >= category_level;
        }

        // Unlisted categories log at info and above
        level >= LogLevel::Info
    }

    /// Update the configuration
    pub fn update_config(&mut self, config: LoggingConfig) {
        self.config = config;
        self.rate_limiters.write().clear();
    }
}

static LOGGER: OnceLock<Arc<RwLock<LoggerConfig>>> = OnceLock::new();

/// Initialize the logging system.
///
/// Calling this again replaces the category configuration. The `tracing`
/// subscriber is installed once; `RUST_LOG` overrides the default filter.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if LOGGER
        .set(Arc::new(RwLock::new(LoggerConfig::new(config.clone()))))
        .is_err()
    {
        update_config(config.clone());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new("info,duchi_core=trace,duchi_theme=trace,duchi=trace")
            .map_err(|e| DuchiError::initialization(format!("invalid log filter: {}", e)))?,
    };

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed, keeping it");
    }

    Ok(())
}

fn get_logger() -> Option<Arc<RwLock<LoggerConfig>>> {
    LOGGER.get().cloned()
}

/// Whether a message at `level` in `category` passes the level filter.
///
/// Before `init`, only info and above pass.
pub fn is_enabled(category: &str, level: LogLevel) -> bool {
    match get_logger() {
        Some(logger) => logger.read().is_level_enabled(category, level),
        None => level >= LogLevel::Info,
    }
}

/// Internal logging function
pub fn log_internal(level: LogLevel, category: &str, message: &str, rate_limited: bool) {
    if !is_enabled(category, level) {
        return;
    }

    if rate_limited {
        if let Some(logger) = get_logger() {
            if !logger.read().should_allow_log(category) {
                return;
            }
        }
    }

    match level {
        LogLevel::Trace => tracing::trace!(category = %category, "{}", message),
        LogLevel::Debug => tracing::debug!(category = %category, "{}", message),
        LogLevel::Info => tracing::info!(category = %category, "{}", message),
        LogLevel::Warn => tracing::warn!(category = %category, "{}", message),
        LogLevel::Error => tracing::error!(category = %category, "{}", message),
    }
}

/// Update logger configuration
pub fn update_config(config: LoggingConfig) {
    if let Some(logger) = get_logger() {
        logger.write().update_config(config);
    }
}

#[macro_export]
macro_rules! duchi_debug {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal(
            $crate::logging::LogLevel::Debug,
            &$category.to_string(),
            &format!($($arg)*),
            false,
        );
    };
}

#[macro_export]
macro_rules! duchi_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal(
            $crate::logging::LogLevel::Info,
            &$category.to_string(),
            &format!($($arg)*),
            false,
        );
    };
}

#[macro_export]
macro_rules! duchi_warn {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal(
            $crate::logging::LogLevel::Warn,
            &$category.to_string(),
            &format!($($arg)*),
            false,
        );
    };
}

#[macro_export]
macro_rules! duchi_warn_rate_limited {
    ($category:expr, $($arg:tt)*) => {
        $crate::logging::log_internal(
            $crate::logging::LogLevel::Warn,
            &$category.to_string(),
            &format!($($arg)*),
            true,
        );
    };
}

pub use duchi_debug;
pub use duchi_info;
pub use duchi_warn;
pub use duchi_warn_rate_limited;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("WARN"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("invalid"), None);

        assert_eq!(LogLevel::Debug.as_str(), "debug");
        assert_eq!(LogCategory::Storage.to_string(), "storage");
    }

    #[test]
    fn test_categories_match_the_emitting_modules() {
        let names: Vec<&str> = [
            LogCategory::Core,
            LogCategory::Store,
            LogCategory::Storage,
            LogCategory::Applier,
            LogCategory::Editor,
        ]
        .iter()
        .map(LogCategory::as_str)
        .collect();
        assert_eq!(names, vec!["core", "store", "storage", "applier", "editor"]);

        let defaults = LoggingConfig::default();
        for category in defaults.category_levels.keys() {
            assert!(names.contains(&category.as_str()), "stray category {}", category);
        }
    }

    #[test]
    fn test_rate_limiting() {
        let mut state = RateLimitState::new(2, Duration::from_millis(100));

        assert!(state.should_allow());
        assert!(state.should_allow());
        assert!(!state.should_allow());

        std::thread::sleep(Duration::from_millis(150));
        assert!(state.should_allow());
    }

    #[test]
    fn test_logger_config() {
        let mut category_levels = HashMap::new();
        category_levels.insert("store".to_string(), "debug".to_string());

        let config = LoggingConfig {
            category_levels,
            rate_limit_seconds: 60,
            max_rate_limit_count: 1,
        };

        let logger_config = LoggerConfig::new(config);

        assert!(logger_config.is_level_enabled("store", LogLevel::Debug));
        assert!(logger_config.is_level_enabled("store", LogLevel::Error));
        assert!(!logger_config.is_level_enabled("store", LogLevel::Trace));
        assert!(!logger_config.is_level_enabled("applier", LogLevel::Debug));
        assert!(logger_config.is_level_enabled("applier", LogLevel::Info));

        assert!(logger_config.should_allow_log("store"));
        assert!(!logger_config.should_allow_log("store"));
        assert!(logger_config.should_allow_log("storage"));
    }

    #[test]
    fn test_init_is_repeatable() {
        let config = LoggingConfig::default();
        assert!(init(&config).is_ok());
        assert!(init(&config).is_ok());
        duchi_info!(LogCategory::Core, "logging initialized twice");
    }
}
