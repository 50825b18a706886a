//! Key-value persistence backends for the theme store
//!
//! A backend holds plain UTF-8 text under string keys. It knows nothing
//! about themes; the store owns all JSON encoding.

use duchi_core::error::{DuchiError, ErrorContext, Result};
use duchi_core::logging::LogCategory;
use duchi_core::duchi_warn_rate_limited;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// String-keyed text storage
pub trait KeyValueStorage: Send + Sync {
    /// Read a slot; `None` when the slot is empty or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a slot
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Atomically rewrite a slot.
    ///
    /// `apply` receives the current value and returns the replacement, or
    /// `None` to leave the slot untouched. No other `set` or `update` on the
    /// same backend may interleave with the cycle.
    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> Result<()>;
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> Result<()> {
        let mut entries = self.entries.write();
        if let Some(value) = apply(entries.get(key).cloned()) {
            entries.insert(key.to_string(), value);
        }
        Ok(())
    }
}

/// Storage backed by a single JSON object file, one member per slot
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Held for every file access so readers never see a half-written file
    io_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn context(&self, operation: &str) -> ErrorContext {
        ErrorContext::new(operation, "file_storage")
            .with_metadata("path", self.path.display().to_string())
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(DuchiError::storage_with_context(
                    format!("cannot read storage file: {}", e),
                    self.context("read"),
                ))
            }
        };

        serde_json::from_str(&text).map_err(|e| {
            DuchiError::storage_with_context(
                format!("storage file is not a JSON object of strings: {}", e),
                self.context("read"),
            )
        })
    }

    fn read_entries_for_write(&self) -> BTreeMap<String, String> {
        self.read_entries().unwrap_or_else(|e| {
            duchi_warn_rate_limited!(
                LogCategory::Storage,
                "replacing unreadable storage file: {}",
                e.format_for_log()
            );
            BTreeMap::new()
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>, key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DuchiError::storage_with_context(
                    format!("cannot create storage directory: {}", e),
                    self.context("write"),
                )
            })?;
        }

        let text = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, text).map_err(|e| {
            DuchiError::storage_with_context(
                format!("cannot write storage file: {}", e),
                self.context("write").with_metadata("key", key),
            )
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.io_lock.lock();
        match self.read_entries() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                duchi_warn_rate_limited!(LogCategory::Storage, "{}", e.format_for_log());
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.io_lock.lock();
        let mut entries = self.read_entries_for_write();
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries, key)
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> Result<()> {
        let _guard = self.io_lock.lock();
        let mut entries = self.read_entries_for_write();
        match apply(entries.get(key).cloned()) {
            Some(value) => {
                entries.insert(key.to_string(), value);
                self.write_entries(&entries, key)
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.get("duchi-theme"), None);

        storage.set("duchi-theme", "dark").unwrap();
        storage.set("duchi-theme", "forest").unwrap();
        assert_eq!(storage.get("duchi-theme").as_deref(), Some("forest"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get("duchi-theme"), None);
        storage.set("duchi-theme", "retro").unwrap();
        storage.set("duchi-user-themes", "[]").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("duchi-theme").as_deref(), Some("retro"));
        assert_eq!(reopened.get("duchi-user-themes").as_deref(), Some("[]"));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn test_corrupted_file_reads_empty_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{ definitely not json").unwrap();

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get("duchi-theme"), None);

        storage.set("duchi-theme", "dark").unwrap();
        assert_eq!(storage.get("duchi-theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_update_sees_current_value_and_can_skip() {
        let storage = MemoryStorage::new();
        storage.set("count", "1").unwrap();

        storage
            .update("count", &mut |current| {
                let n: u32 = current?.parse().ok()?;
                Some((n + 1).to_string())
            })
            .unwrap();
        assert_eq!(storage.get("count").as_deref(), Some("2"));

        storage.update("count", &mut |_| None).unwrap();
        storage.update("absent", &mut |current| current).unwrap();
        assert_eq!(storage.get("count").as_deref(), Some("2"));
        assert_eq!(storage.get("absent"), None);
    }

    #[test]
    fn test_file_updates_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let storage = std::sync::Arc::new(FileStorage::new(dir.path().join("storage.json")));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let storage = storage.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        storage
                            .update("count", &mut |current| {
                                let n: u32 = current.and_then(|v| v.parse().ok()).unwrap_or(0);
                                Some((n + 1).to_string())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(storage.get("count").as_deref(), Some("40"));
    }

    #[test]
    fn test_unwritable_path_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let storage = FileStorage::new(dir.path());

        let err = storage.set("duchi-theme", "dark").unwrap_err();
        assert!(matches!(err, DuchiError::Storage { .. }));
        assert!(err.context().is_some());
    }
}
