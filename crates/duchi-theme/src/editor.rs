//! Theme editor session state

use crate::colors::{default_colors, ColorRole, ThemeColorSet};
use crate::presets::PresetTheme;
use crate::store::{create_user_theme, export_user_theme, now_millis, ThemeStore, UserTheme};
use duchi_core::color::{format_oklch, parse_color_value, Oklch, DEFAULT_PICKER_COLOR};
use duchi_core::duchi_info;
use duchi_core::error::Result;
use duchi_core::logging::LogCategory;

/// Name given to a fresh theme
pub const DEFAULT_THEME_NAME: &str = "My Theme";

/// A slider of the color picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OklchComponent {
    Lightness,
    Chroma,
    Hue,
}

impl OklchComponent {
    /// Slider range
    pub fn range(&self) -> (f64, f64) {
        match self {
            OklchComponent::Lightness => (0.0, 1.0),
            OklchComponent::Chroma => (0.0, 0.4),
            OklchComponent::Hue => (0.0, 360.0),
        }
    }
}

/// A theme ready to be offered as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeExport {
    pub file_name: String,
    pub json: String,
}

/// Download name for a theme: lowercased, whitespace runs as `-`
pub fn export_file_name(name: &str) -> String {
    let mut file_name = String::with_capacity(name.len() + 5);
    let mut in_whitespace = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                file_name.push('-');
            }
            in_whitespace = true;
        } else {
            file_name.extend(ch.to_lowercase());
            in_whitespace = false;
        }
    }
    file_name.push_str(".json");
    file_name
}

/// Working copy of a theme being created or edited
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeEditor {
    colors: ThemeColorSet,
    name: String,
    active_role: Option<ColorRole>,
    editing_id: Option<String>,
    pending: Option<Oklch>,
}

impl Default for ThemeEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeEditor {
    pub fn new() -> Self {
        Self {
            colors: default_colors(),
            name: DEFAULT_THEME_NAME.to_string(),
            active_role: Some(ColorRole::Primary),
            editing_id: None,
            pending: None,
        }
    }

    pub fn colors(&self) -> &ThemeColorSet {
        &self.colors
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn active_role(&self) -> Option<ColorRole> {
        self.active_role
    }

    /// Id of the stored theme being edited, if any
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_color(&mut self, role: ColorRole, value: impl Into<String>) {
        if self.active_role == Some(role) {
            self.pending = None;
        }
        self.colors.set(role, value);
    }

    pub fn select_role(&mut self, role: ColorRole) {
        self.pending = None;
        self.active_role = Some(role);
    }

    /// Color shown on the sliders
    pub fn active_oklch(&self) -> Oklch {
        if let Some(pending) = self.pending {
            return pending;
        }
        self.active_role
            .and_then(|role| self.colors.get(role))
            .and_then(parse_color_value)
            .unwrap_or(DEFAULT_PICKER_COLOR)
    }

    /// Move one slider; the active role receives the formatted result
    pub fn adjust(&mut self, component: OklchComponent, value: f64) {
        let (min, max) = component.range();
        let value = value.clamp(min, max);

        let mut color = self.active_oklch();
        match component {
            OklchComponent::Lightness => color.l = value,
            OklchComponent::Chroma => color.c = value,
            OklchComponent::Hue => color.h = value,
        }
        self.pending = Some(color);

        if let Some(role) = self.active_role {
            self.colors.set(role, format_oklch(&color));
        }
    }

    /// Start from a preset's palette under the preset's name
    pub fn load_preset(&mut self, preset: PresetTheme) {
        self.colors = preset.colors().merged_over(&default_colors());
        self.name = preset.display_name();
        self.editing_id = None;
        self.pending = None;
    }

    pub fn edit_user_theme(&mut self, theme: &UserTheme) {
        self.colors = theme.colors.clone();
        self.name = theme.name.clone();
        self.editing_id = Some(theme.id.clone());
        self.pending = None;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn to_theme(&self) -> UserTheme {
        match &self.editing_id {
            Some(id) => UserTheme {
                id: id.clone(),
                name: self.name.clone(),
                colors: self.colors.clone(),
                created_at: now_millis(),
            },
            None => create_user_theme(self.name.clone(), self.colors.clone()),
        }
    }

    /// Store the working copy and keep editing the stored theme
    pub fn save(&mut self, store: &ThemeStore) -> UserTheme {
        let theme = self.to_theme();
        store.save_user_theme(theme.clone());
        duchi_info!(LogCategory::Editor, "saved theme {} ({})", theme.name, theme.id);
        self.editing_id = Some(theme.id.clone());
        theme
    }

    pub fn export(&self) -> Result<ThemeExport> {
        let theme = self.to_theme();
        Ok(ThemeExport {
            file_name: export_file_name(&self.name),
            json: export_user_theme(&theme)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::import_user_theme;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_new_editor_state() {
        let editor = ThemeEditor::new();
        assert_eq!(editor.name(), "My Theme");
        assert_eq!(editor.active_role(), Some(ColorRole::Primary));
        assert_eq!(editor.editing_id(), None);
        assert_eq!(editor.colors(), &default_colors());

        let primary = editor.active_oklch();
        assert!((primary.l - 0.65).abs() < 1e-12);
        assert!((primary.h - 250.0).abs() < 1e-12);
    }

    #[test]
    fn test_adjust_writes_formatted_color() {
        let mut editor = ThemeEditor::new();
        editor.adjust(OklchComponent::Hue, 30.0);
        editor.adjust(OklchComponent::Lightness, 0.6);

        assert_eq!(editor.colors().get(ColorRole::Primary), Some("oklch(0.600 0.200 30.0)"));

        editor.adjust(OklchComponent::Chroma, 2.0);
        assert!((editor.active_oklch().c - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_select_role_drops_slider_state() {
        let mut editor = ThemeEditor::new();
        editor.adjust(OklchComponent::Hue, 10.0);
        editor.select_role(ColorRole::Base100);

        assert!((editor.active_oklch().l - 1.0).abs() < 1e-12);
        editor.set_color(ColorRole::Base100, "garbage");
        assert_eq!(editor.active_oklch(), DEFAULT_PICKER_COLOR);
    }

    #[test]
    fn test_load_preset_names_and_detaches() {
        let mut editor = ThemeEditor::new();
        editor.edit_user_theme(&create_user_theme("Old", ThemeColorSet::new()));
        editor.load_preset(PresetTheme::Forest);

        assert_eq!(editor.name(), "Forest");
        assert_eq!(editor.editing_id(), None);
        assert_eq!(editor.colors(), &PresetTheme::Forest.colors());
    }

    #[test]
    fn test_save_creates_then_updates() {
        let store = ThemeStore::with_defaults(Arc::new(MemoryStorage::new()));
        let mut editor = ThemeEditor::new();
        editor.set_name("Sunset");

        let first = editor.save(&store);
        assert_eq!(editor.editing_id(), Some(first.id.as_str()));

        editor.set_name("Sunset II");
        let second = editor.save(&store);
        assert_eq!(second.id, first.id);

        let themes = store.get_user_themes();
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].name, "Sunset II");

        editor.reset();
        assert_eq!(editor, ThemeEditor::new());
    }

    #[test]
    fn test_export_file_name_and_payload() {
        assert_eq!(export_file_name("Warm  Evening Glow"), "warm-evening-glow.json");
        assert_eq!(export_file_name(" Padded "), "-padded-.json");

        let mut editor = ThemeEditor::new();
        editor.set_name("Deep Sea");
        let export = editor.export().unwrap();
        assert_eq!(export.file_name, "deep-sea.json");

        let imported = import_user_theme(&export.json).unwrap();
        assert_eq!(imported.name, "Deep Sea");
        assert_eq!(imported.colors, default_colors());
    }
}
