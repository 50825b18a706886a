//! Persisted user themes and the current theme selector

use crate::colors::ThemeColorSet;
use crate::storage::KeyValueStorage;
use duchi_core::config::{DuchiConfig, StorageConfig};
use duchi_core::error::Result;
use duchi_core::logging::LogCategory;
use duchi_core::{duchi_debug, duchi_warn, duchi_warn_rate_limited};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A user-authored palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTheme {
    pub id: String,
    pub name: String,
    pub colors: ThemeColorSet,
    /// Epoch milliseconds
    pub created_at: i64,
}

impl UserTheme {
    /// Selector that applies this theme
    pub fn selector(&self) -> String {
        format!("{}{}", crate::applier::USER_THEME_PREFIX, self.id)
    }
}

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A fresh theme id: creation time plus a random suffix
pub fn generate_theme_id() -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", now_millis(), &random[..9])
}

/// Stamp a new theme with a fresh id and the current time
pub fn create_user_theme(name: impl Into<String>, colors: ThemeColorSet) -> UserTheme {
    UserTheme {
        id: generate_theme_id(),
        name: name.into(),
        colors,
        created_at: now_millis(),
    }
}

#[derive(Deserialize)]
struct ImportPayload {
    name: Option<String>,
    colors: Option<ThemeColorSet>,
}

/// Parse an exported theme.
///
/// Only `name` and `colors` are read; any `id` or `createdAt` in the text is
/// replaced. Returns `None` for anything that is not an object with a
/// non-empty `name` and a `colors` object of strings.
pub fn import_user_theme(json: &str) -> Option<UserTheme> {
    let payload: ImportPayload = serde_json::from_str(json).ok()?;
    let name = payload.name.filter(|name| !name.is_empty())?;
    let colors = payload.colors?;
    Some(create_user_theme(name, colors))
}

/// Pretty-printed JSON of the full record
pub fn export_user_theme(theme: &UserTheme) -> Result<String> {
    Ok(serde_json::to_string_pretty(theme)?)
}

/// User theme list and selector persistence over a key-value backend.
///
/// Each list mutation is a single atomic [`KeyValueStorage::update`] on the
/// backend, so any number of stores over one backend never lose updates.
/// Without a backend every read is empty and every write is dropped.
#[derive(Clone)]
pub struct ThemeStore {
    storage: Option<Arc<dyn KeyValueStorage>>,
    keys: StorageConfig,
    default_selector: String,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("attached", &self.storage.is_some())
            .field("keys", &self.keys)
            .field("default_selector", &self.default_selector)
            .finish()
    }
}

impl ThemeStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, keys: StorageConfig) -> Self {
        Self {
            storage: Some(storage),
            keys,
            default_selector: duchi_core::config::ThemeConfig::default().default_selector,
        }
    }

    /// Store using the standard slot names
    pub fn with_defaults(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::new(storage, StorageConfig::default())
    }

    pub fn from_config(storage: Arc<dyn KeyValueStorage>, config: &DuchiConfig) -> Self {
        let mut store = Self::new(storage, config.storage.clone());
        store.default_selector = config.theme.default_selector.clone();
        store
    }

    /// Store with no persistence backend
    pub fn detached() -> Self {
        Self {
            storage: None,
            keys: StorageConfig::default(),
            default_selector: duchi_core::config::ThemeConfig::default().default_selector,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.storage.is_some()
    }

    pub fn default_selector(&self) -> &str {
        &self.default_selector
    }

    fn read(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get(key)
    }

    fn write(&self, key: &str, value: &str) {
        let Some(storage) = &self.storage else {
            duchi_debug!(LogCategory::Store, "no storage backend, dropping write to {}", key);
            return;
        };
        if let Err(e) = storage.set(key, value) {
            duchi_warn!(LogCategory::Store, "failed to persist {}: {}", key, e.format_for_log());
        }
    }

    /// All user themes in stored order; empty when absent or corrupted
    pub fn get_user_themes(&self) -> Vec<UserTheme> {
        self.decode_themes(self.read(&self.keys.user_themes_key).as_deref())
    }

    fn decode_themes(&self, text: Option<&str>) -> Vec<UserTheme> {
        let Some(text) = text else {
            return Vec::new();
        };
        match serde_json::from_str(text) {
            Ok(themes) => themes,
            Err(e) => {
                duchi_warn_rate_limited!(
                    LogCategory::Store,
                    "ignoring unreadable theme list in {}: {}",
                    self.keys.user_themes_key,
                    e
                );
                Vec::new()
            }
        }
    }

    fn encode_themes(themes: &[UserTheme]) -> Option<String> {
        match serde_json::to_string(themes) {
            Ok(text) => Some(text),
            Err(e) => {
                duchi_warn!(LogCategory::Store, "failed to encode theme list: {}", e);
                None
            }
        }
    }

    /// Replace the whole list
    pub fn set_user_themes(&self, themes: &[UserTheme]) {
        if let Some(text) = Self::encode_themes(themes) {
            self.write(&self.keys.user_themes_key, &text);
        }
    }

    fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut Vec<UserTheme>) -> bool,
    {
        let Some(storage) = &self.storage else {
            duchi_debug!(LogCategory::Store, "no storage backend, dropping theme update");
            return;
        };

        let mut mutate = Some(mutate);
        let result = storage.update(&self.keys.user_themes_key, &mut |current| {
            let mutate = mutate.take()?;
            let mut themes = self.decode_themes(current.as_deref());
            if mutate(&mut themes) {
                Self::encode_themes(&themes)
            } else {
                None
            }
        });

        if let Err(e) = result {
            duchi_warn!(
                LogCategory::Store,
                "failed to persist {}: {}",
                self.keys.user_themes_key,
                e.format_for_log()
            );
        }
    }

    /// Insert, or replace in place the theme with the same id
    pub fn save_user_theme(&self, theme: UserTheme) {
        duchi_debug!(LogCategory::Store, "saving theme {} ({})", theme.id, theme.name);
        self.update(|themes| {
            match themes.iter_mut().find(|existing| existing.id == theme.id) {
                Some(existing) => *existing = theme,
                None => themes.push(theme),
            }
            true
        });
    }

    /// Remove a theme; unknown ids are ignored
    pub fn delete_user_theme(&self, id: &str) {
        self.update(|themes| {
            let before = themes.len();
            themes.retain(|theme| theme.id != id);
            themes.len() != before
        });
    }

    pub fn get_user_theme(&self, id: &str) -> Option<UserTheme> {
        self.get_user_themes().into_iter().find(|theme| theme.id == id)
    }

    /// Persisted selector, or the default selector when none is stored
    pub fn get_stored_theme(&self) -> String {
        self.read(&self.keys.selector_key)
            .filter(|selector| !selector.is_empty())
            .unwrap_or_else(|| self.default_selector.clone())
    }

    pub fn set_stored_theme(&self, selector: &str) {
        self.write(&self.keys.selector_key, selector);
    }
}
