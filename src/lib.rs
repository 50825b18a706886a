//! duchi - OKLCH theme toolkit for the duchi blog
//!
//! duchi converts theme colors between OKLCH and sRGB hex, persists
//! user-authored themes and resolves theme selectors to the colors a page
//! should render with.
//!
//! ```rust
//! use duchi::prelude::*;
//! use std::sync::Arc;
//!
//! let store = ThemeStore::with_defaults(Arc::new(MemoryStorage::new()));
//! let mut editor = ThemeEditor::new();
//! editor.set_name("Sunset");
//! let theme = editor.save(&store);
//!
//! let mut applier = ThemeApplier::new(store, StyleOverrides::new());
//! applier.select(&theme.selector());
//! assert_eq!(applier.presentation().preset(), Some("light"));
//! ```

pub use duchi_core;
pub use duchi_theme;

pub use duchi_core::config::{get_config_manager, init_config_with};
use duchi_core::{DuchiConfig, Result};

/// Unified prelude module that exports all commonly used types
pub mod prelude {
    pub use duchi_core::prelude::*;
    pub use duchi_theme::prelude::*;
}

/// Initialize logging and the theme module with default configuration
pub fn init() -> Result<()> {
    init_with_config(DuchiConfig::default())
}

/// Initialize with an explicit configuration.
///
/// The configuration replaces the process-wide configuration; later changes
/// made through [`get_config_manager`] reach the logger.
pub fn init_with_config(config: DuchiConfig) -> Result<()> {
    duchi_core::init(&config)?;
    init_config_with(config);
    duchi_theme::init()?;
    tracing::debug!("duchi v{} ready", VERSION);
    Ok(())
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
