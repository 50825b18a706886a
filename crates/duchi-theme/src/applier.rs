//! Theme selection: resolving selectors and pushing colors to the page

use crate::colors::{ColorRole, ThemeColorSet};
use crate::presets::{PresetTheme, BASE_PRESET};
use crate::store::ThemeStore;
use duchi_core::config::DuchiConfig;
use duchi_core::logging::LogCategory;
use duchi_core::{duchi_debug, duchi_info};
use std::collections::BTreeMap;
use std::fmt;

/// Prefix marking a selector as a user theme id
pub const USER_THEME_PREFIX: &str = "user-";

/// Companion theme for light user themes and unknown selectors
pub const COMPANION_LIGHT: &str = "light";
/// Companion theme for dark user themes
pub const COMPANION_DARK: &str = "dark";

/// `base-100` lightness above which a user theme counts as light
const LIGHT_BACKGROUND_THRESHOLD: f64 = 0.6;

/// A parsed theme selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSelector {
    BuiltIn(PresetTheme),
    User(String),
    Unknown(String),
}

impl ThemeSelector {
    pub fn parse(selector: &str) -> Self {
        if let Some(preset) = PresetTheme::from_name(selector) {
            ThemeSelector::BuiltIn(preset)
        } else if let Some(id) = selector.strip_prefix(USER_THEME_PREFIX) {
            ThemeSelector::User(id.to_string())
        } else {
            ThemeSelector::Unknown(selector.to_string())
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        ThemeSelector::User(id.into())
    }
}

impl fmt::Display for ThemeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeSelector::BuiltIn(preset) => f.write_str(preset.as_str()),
            ThemeSelector::User(id) => write!(f, "{}{}", USER_THEME_PREFIX, id),
            ThemeSelector::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl From<PresetTheme> for ThemeSelector {
    fn from(preset: PresetTheme) -> Self {
        ThemeSelector::BuiltIn(preset)
    }
}

/// The page surface a theme is applied to
pub trait Presentation {
    /// Switch the active built-in palette (`data-theme`)
    fn set_preset(&mut self, preset: &str);

    fn set_color_override(&mut self, role: ColorRole, value: &str);

    fn clear_color_override(&mut self, role: ColorRole);
}

/// In-memory presentation state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleOverrides {
    preset: Option<String>,
    overrides: BTreeMap<ColorRole, String>,
}

impl StyleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }

    pub fn get(&self, role: ColorRole) -> Option<&str> {
        self.overrides.get(&role).map(String::as_str)
    }

    pub fn overrides(&self) -> &BTreeMap<ColorRole, String> {
        &self.overrides
    }

    /// Overrides as a CSS declaration list, in canonical role order
    pub fn to_inline_style(&self) -> String {
        self.overrides
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(role, value)| format!("{}: {};", role.css_variable(), value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Presentation for StyleOverrides {
    fn set_preset(&mut self, preset: &str) {
        self.preset = Some(preset.to_string());
    }

    fn set_color_override(&mut self, role: ColorRole, value: &str) {
        self.overrides.insert(role, value.to_string());
    }

    fn clear_color_override(&mut self, role: ColorRole) {
        self.overrides.remove(&role);
    }
}

/// Companion stylesheet id for a preset
pub fn companion_theme_id(preset: PresetTheme) -> &'static str {
    match preset {
        PresetTheme::Light => "light",
        PresetTheme::Dark => "dark",
        PresetTheme::Retro => "retro",
        PresetTheme::Emerald => "emerald",
        PresetTheme::Valentine => "valentine",
        PresetTheme::Forest => "forest",
    }
}

/// An entry of the theme menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeChoice {
    pub selector: String,
    pub label: String,
}

/// Applies selectors to a [`Presentation`], resolving user themes via the store
pub struct ThemeApplier<P: Presentation> {
    store: ThemeStore,
    presentation: P,
    current: Option<String>,
    companion_origin: Option<String>,
}

impl<P: Presentation> ThemeApplier<P> {
    pub fn new(store: ThemeStore, presentation: P) -> Self {
        Self {
            store,
            presentation,
            current: None,
            companion_origin: None,
        }
    }

    pub fn with_config(store: ThemeStore, presentation: P, config: &DuchiConfig) -> Self {
        let mut applier = Self::new(store, presentation);
        applier.companion_origin = config
            .theme
            .companion_stylesheet_origin
            .as_ref()
            .map(|origin| origin.trim_end_matches('/').to_string());
        applier
    }

    /// Apply a selector without persisting it
    pub fn apply(&mut self, selector: &str) {
        for role in ColorRole::ALL {
            self.presentation.clear_color_override(role);
        }

        match ThemeSelector::parse(selector) {
            ThemeSelector::BuiltIn(preset) => {
                self.presentation.set_preset(preset.as_str());
            }
            ThemeSelector::User(id) => {
                self.presentation.set_preset(BASE_PRESET.as_str());
                match self.store.get_user_theme(&id) {
                    Some(theme) => {
                        for (role, value) in theme.colors.iter() {
                            if !value.is_empty() {
                                self.presentation.set_color_override(role, value);
                            }
                        }
                    }
                    None => {
                        duchi_debug!(
                            LogCategory::Applier,
                            "user theme {} not found, using base",
                            id
                        );
                    }
                }
            }
            ThemeSelector::Unknown(raw) => {
                duchi_debug!(LogCategory::Applier, "unknown selector {:?}, using base", raw);
                self.presentation.set_preset(BASE_PRESET.as_str());
            }
        }

        self.current = Some(selector.to_string());
    }

    /// Persist and apply a selector
    pub fn select(&mut self, selector: &str) {
        duchi_info!(LogCategory::Applier, "theme changed to {}", selector);
        self.store.set_stored_theme(selector);
        self.apply(selector);
    }

    /// Apply the persisted selector; returns it
    pub fn restore(&mut self) -> String {
        let selector = self.store.get_stored_theme();
        self.apply(&selector);
        selector
    }

    /// Last applied selector
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn into_presentation(self) -> P {
        self.presentation
    }

    pub fn store(&self) -> &ThemeStore {
        &self.store
    }

    /// Colors in effect for a selector; `None` for unknown selectors and
    /// missing user themes
    pub fn resolve_colors(&self, selector: &str) -> Option<ThemeColorSet> {
        match ThemeSelector::parse(selector) {
            ThemeSelector::BuiltIn(preset) => Some(preset.colors()),
            ThemeSelector::User(id) => self
                .store
                .get_user_theme(&id)
                .map(|theme| theme.colors.merged_over(&BASE_PRESET.colors())),
            ThemeSelector::Unknown(_) => None,
        }
    }

    /// Discussion widget theme for a selector
    pub fn companion_theme(&self, selector: &str) -> String {
        match ThemeSelector::parse(selector) {
            ThemeSelector::BuiltIn(preset) => {
                let id = companion_theme_id(preset);
                match &self.companion_origin {
                    Some(origin) => format!("{}/giscus/{}.css", origin, id),
                    None => id.to_string(),
                }
            }
            ThemeSelector::User(id) => match self.store.get_user_theme(&id) {
                Some(theme) => {
                    let light = theme
                        .colors
                        .oklch(ColorRole::Base100)
                        .is_some_and(|color| color.l > LIGHT_BACKGROUND_THRESHOLD);
                    let companion = if light { COMPANION_LIGHT } else { COMPANION_DARK };
                    companion.to_string()
                }
                None => COMPANION_LIGHT.to_string(),
            },
            ThemeSelector::Unknown(_) => COMPANION_LIGHT.to_string(),
        }
    }

    /// Companion theme for the last applied selector
    pub fn current_companion_theme(&self) -> String {
        let selector = self
            .current
            .clone()
            .unwrap_or_else(|| self.store.default_selector().to_string());
        self.companion_theme(&selector)
    }

    /// Presets followed by the stored user themes
    pub fn available_themes(&self) -> Vec<ThemeChoice> {
        let presets = PresetTheme::ALL.into_iter().map(|preset| ThemeChoice {
            selector: preset.as_str().to_string(),
            label: preset.display_name(),
        });
        let users = self
            .store
            .get_user_themes()
            .into_iter()
            .map(|theme| ThemeChoice {
                selector: theme.selector(),
                label: theme.name,
            });
        presets.chain(users).collect()
    }
}
