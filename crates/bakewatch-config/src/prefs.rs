// ── File-backed preference store ──
//
// A flat TOML table of string values. The whole file is rewritten on every
// `set`; preferences change on user actions only, so writes are rare.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use bakewatch_core::{CoreError, PreferenceStore};

#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "discarding unreadable preferences"
                );
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            values: RwLock::new(values),
        }
    }

    /// Open the store at the platform data directory.
    pub fn open_default() -> Self {
        Self::open(crate::preferences_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), CoreError> {
        let err = |e: String| CoreError::Preferences {
            message: format!("{}: {e}", self.path.display()),
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| err(e.to_string()))?;
        }
        let text = toml::to_string(values).map_err(|e| err(e.to_string()))?;
        std::fs::write(&self.path, text).map_err(|e| err(e.to_string()))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value.to_owned());
        self.flush(&values)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/preferences.toml");

        let store = FilePreferenceStore::open(&path);
        assert_eq!(store.get("show_round1"), None);
        store.set("show_round1", "true").unwrap();
        store
            .set("selected_baker_address", "\"tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx\"")
            .unwrap();

        let reopened = FilePreferenceStore::open(&path);
        assert_eq!(reopened.get("show_round1").as_deref(), Some("true"));
        assert_eq!(
            reopened.get("selected_baker_address").as_deref(),
            Some("\"tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx\"")
        );
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let store = FilePreferenceStore::open(&path);
        assert_eq!(store.get("metrics_expanded"), None);
        store.set("metrics_expanded", "false").unwrap();
        assert_eq!(
            FilePreferenceStore::open(&path).get("metrics_expanded").as_deref(),
            Some("false")
        );
    }

    #[test]
    fn typed_preferences_load_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::open(dir.path().join("p.toml"));
        bakewatch_core::prefs::write(&store, "metrics_expanded", &false).unwrap();

        let prefs = bakewatch_core::Preferences::load(&store);
        assert!(!prefs.metrics_expanded);
        assert!(!prefs.show_round1);
    }

    #[test]
    fn unwritable_path_reports_preferences_error() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the parent directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = FilePreferenceStore::open(blocker.join("preferences.toml"));

        let err = store.set("show_round1", "true").unwrap_err();
        assert!(matches!(err, CoreError::Preferences { .. }));
        // The in-memory value is still updated for this session.
        assert_eq!(store.get("show_round1").as_deref(), Some("true"));
    }
}
