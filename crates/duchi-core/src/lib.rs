//! Core functionality for duchi
//!
//! This crate provides the OKLCH color codec used by the theme editor,
//! together with the error, configuration and logging layers shared by
//! the rest of the workspace.

pub mod color;
pub mod config;
pub mod error;
pub mod logging;

pub use color::{
    format_oklch, hex_to_oklch, oklch_to_hex, parse_color_value, parse_oklch, ColorParseError,
    Oklch, Srgb, DEFAULT_PICKER_COLOR,
};
pub use config::{ConfigManager, DuchiConfig, LoggingConfig, StorageConfig, ThemeConfig};
pub use error::{DuchiError, ErrorContext, Result};
pub use logging::{LogCategory, LogLevel};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        color::{format_oklch, hex_to_oklch, oklch_to_hex, parse_oklch, Oklch, Srgb},
        config::DuchiConfig,
        error::{DuchiError, Result},
        logging::LogLevel,
    };
}

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the given configuration
pub fn init(config: &DuchiConfig) -> Result<()> {
    if let Err(e) = logging::init(&config.logging) {
        return Err(DuchiError::initialization_with_context(
            format!("Failed to initialize logging: {}", e),
            ErrorContext::new("init", "core"),
        ));
    }

    crate::duchi_info!(LogCategory::Core, "duchi core v{} initialized", VERSION);
    Ok(())
}
