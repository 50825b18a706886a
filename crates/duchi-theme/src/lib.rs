//! duchi themes - preset palettes, user theme persistence and theme selection
//!
//! User themes live in a [`ThemeStore`] over any [`KeyValueStorage`]. A
//! [`ThemeApplier`] turns a selector (`"forest"`, `"user-<id>"`) into preset
//! and per-role overrides on a [`Presentation`], and a [`ThemeEditor`] holds
//! the working copy of a theme being authored.

pub mod applier;
pub mod colors;
pub mod editor;
pub mod presets;
pub mod storage;
pub mod store;

pub use applier::{
    companion_theme_id, Presentation, StyleOverrides, ThemeApplier, ThemeChoice, ThemeSelector,
    USER_THEME_PREFIX,
};
pub use colors::{default_colors, ColorGroup, ColorRole, ThemeColorSet};
pub use editor::{export_file_name, OklchComponent, ThemeEditor, ThemeExport};
pub use presets::{PresetTheme, BASE_PRESET};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{
    create_user_theme, export_user_theme, generate_theme_id, import_user_theme, ThemeStore,
    UserTheme,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        applier::{Presentation, StyleOverrides, ThemeApplier, ThemeSelector},
        colors::{ColorRole, ThemeColorSet},
        editor::ThemeEditor,
        presets::PresetTheme,
        storage::{KeyValueStorage, MemoryStorage},
        store::{ThemeStore, UserTheme},
    };
}

/// Initialize the theme module
pub fn init() -> duchi_core::Result<()> {
    tracing::info!(
        "duchi themes initialized with {} presets",
        presets::PresetTheme::ALL.len()
    );
    Ok(())
}
