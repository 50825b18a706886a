//! Semantic color roles and the color set a theme assigns to them

use duchi_core::color::{parse_color_value, Oklch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One of the 20 semantic color slots every theme defines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorRole {
    Primary,
    PrimaryContent,
    Secondary,
    SecondaryContent,
    Accent,
    AccentContent,
    Neutral,
    NeutralContent,
    Base100,
    Base200,
    Base300,
    BaseContent,
    Info,
    InfoContent,
    Success,
    SuccessContent,
    Warning,
    WarningContent,
    Error,
    ErrorContent,
}

impl ColorRole {
    /// All roles in canonical order
    pub const ALL: [ColorRole; 20] = [
        ColorRole::Primary,
        ColorRole::PrimaryContent,
        ColorRole::Secondary,
        ColorRole::SecondaryContent,
        ColorRole::Accent,
        ColorRole::AccentContent,
        ColorRole::Neutral,
        ColorRole::NeutralContent,
        ColorRole::Base100,
        ColorRole::Base200,
        ColorRole::Base300,
        ColorRole::BaseContent,
        ColorRole::Info,
        ColorRole::InfoContent,
        ColorRole::Success,
        ColorRole::SuccessContent,
        ColorRole::Warning,
        ColorRole::WarningContent,
        ColorRole::Error,
        ColorRole::ErrorContent,
    ];

    /// Key used in persisted color sets and export files
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::PrimaryContent => "primary-content",
            ColorRole::Secondary => "secondary",
            ColorRole::SecondaryContent => "secondary-content",
            ColorRole::Accent => "accent",
            ColorRole::AccentContent => "accent-content",
            ColorRole::Neutral => "neutral",
            ColorRole::NeutralContent => "neutral-content",
            ColorRole::Base100 => "base-100",
            ColorRole::Base200 => "base-200",
            ColorRole::Base300 => "base-300",
            ColorRole::BaseContent => "base-content",
            ColorRole::Info => "info",
            ColorRole::InfoContent => "info-content",
            ColorRole::Success => "success",
            ColorRole::SuccessContent => "success-content",
            ColorRole::Warning => "warning",
            ColorRole::WarningContent => "warning-content",
            ColorRole::Error => "error",
            ColorRole::ErrorContent => "error-content",
        }
    }

    /// CSS custom property the role is applied through
    pub fn css_variable(&self) -> String {
        format!("--color-{}", self.as_str())
    }

    /// Group the role is shown under in the editor
    pub fn group(&self) -> ColorGroup {
        ColorGroup::ALL
            .into_iter()
            .find(|group| group.roles().contains(self))
            .unwrap_or(ColorGroup::Base)
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown color role: {}", s))
    }
}

/// Editor grouping of related roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorGroup {
    Primary,
    Secondary,
    Accent,
    Neutral,
    Base,
    Info,
    Success,
    Warning,
    Error,
}

impl ColorGroup {
    pub const ALL: [ColorGroup; 9] = [
        ColorGroup::Primary,
        ColorGroup::Secondary,
        ColorGroup::Accent,
        ColorGroup::Neutral,
        ColorGroup::Base,
        ColorGroup::Info,
        ColorGroup::Success,
        ColorGroup::Warning,
        ColorGroup::Error,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ColorGroup::Primary => "Primary",
            ColorGroup::Secondary => "Secondary",
            ColorGroup::Accent => "Accent",
            ColorGroup::Neutral => "Neutral",
            ColorGroup::Base => "Base",
            ColorGroup::Info => "Info",
            ColorGroup::Success => "Success",
            ColorGroup::Warning => "Warning",
            ColorGroup::Error => "Error",
        }
    }

    pub fn roles(&self) -> &'static [ColorRole] {
        use ColorRole::*;
        match self {
            ColorGroup::Primary => &[Primary, PrimaryContent],
            ColorGroup::Secondary => &[Secondary, SecondaryContent],
            ColorGroup::Accent => &[Accent, AccentContent],
            ColorGroup::Neutral => &[Neutral, NeutralContent],
            ColorGroup::Base => &[Base100, Base200, Base300, BaseContent],
            ColorGroup::Info => &[Info, InfoContent],
            ColorGroup::Success => &[Success, SuccessContent],
            ColorGroup::Warning => &[Warning, WarningContent],
            ColorGroup::Error => &[Error, ErrorContent],
        }
    }
}

/// Color values of a theme, keyed by role name.
///
/// Values are CSS `oklch(...)` strings or, while being edited, hex strings.
/// A set may be partial (imports are not validated) and may carry keys this
/// crate does not know; both survive a save/load cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeColorSet {
    values: BTreeMap<String, String>,
}

impl ThemeColorSet {
    /// Create an empty color set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: ColorRole) -> Option<&str> {
        self.values.get(role.as_str()).map(String::as_str)
    }

    pub fn set(&mut self, role: ColorRole, value: impl Into<String>) {
        self.values.insert(role.as_str().to_string(), value.into());
    }

    pub fn remove(&mut self, role: ColorRole) -> Option<String> {
        self.values.remove(role.as_str())
    }

    /// Builder form of [`ThemeColorSet::set`]
    pub fn with(mut self, role: ColorRole, value: impl Into<String>) -> Self {
        self.set(role, value);
        self
    }

    /// Number of stored entries, unknown keys included
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether every one of the 20 roles has a value
    pub fn is_complete(&self) -> bool {
        self.missing_roles().is_empty()
    }

    pub fn missing_roles(&self) -> Vec<ColorRole> {
        ColorRole::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }

    /// Known roles with a value, in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (ColorRole, &str)> + '_ {
        ColorRole::ALL
            .into_iter()
            .filter_map(move |role| self.get(role).map(|value| (role, value)))
    }

    /// This set's values layered over `base`
    pub fn merged_over(&self, base: &ThemeColorSet) -> ThemeColorSet {
        let mut values = base.values.clone();
        values.extend(self.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        ThemeColorSet { values }
    }

    /// Resolve a role's value to OKLCH, accepting either text form
    pub fn oklch(&self, role: ColorRole) -> Option<Oklch> {
        self.get(role).and_then(parse_color_value)
    }
}

impl<V: Into<String>> FromIterator<(ColorRole, V)> for ThemeColorSet {
    fn from_iter<I: IntoIterator<Item = (ColorRole, V)>>(iter: I) -> Self {
        let mut set = ThemeColorSet::new();
        for (role, value) in iter {
            set.set(role, value);
        }
        set
    }
}

const DEFAULT_VALUES: [&str; 20] = [
    "oklch(0.65 0.2 250)",
    "oklch(0.98 0.01 250)",
    "oklch(0.65 0.2 320)",
    "oklch(0.98 0.01 320)",
    "oklch(0.65 0.15 180)",
    "oklch(0.98 0.01 180)",
    "oklch(0.35 0.02 250)",
    "oklch(0.95 0.01 250)",
    "oklch(1 0 0)",
    "oklch(0.96 0 0)",
    "oklch(0.92 0 0)",
    "oklch(0.2 0 0)",
    "oklch(0.7 0.15 220)",
    "oklch(0.98 0.01 220)",
    "oklch(0.7 0.2 145)",
    "oklch(0.98 0.01 145)",
    "oklch(0.8 0.18 85)",
    "oklch(0.2 0.05 85)",
    "oklch(0.65 0.2 25)",
    "oklch(0.98 0.01 25)",
];

/// Starting palette for a new theme
pub fn default_colors() -> ThemeColorSet {
    ColorRole::ALL.into_iter().zip(DEFAULT_VALUES).collect()
}
