// ── User preferences ──
//
// A small key/value capability injected into the dashboard. Values are
// JSON-encoded strings so any backing store (memory, file) only needs to
// move text around.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::engine::RoundFilter;
use crate::error::CoreError;

pub const KEY_SELECTED_ADDRESS: &str = "selected_baker_address";
pub const KEY_METRICS_EXPANDED: &str = "metrics_expanded";
pub const KEY_SHOW_ROUND1: &str = "show_round1";

/// Persistent string-keyed storage for preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// Read and decode a typed value; undecodable values are treated as absent.
pub fn read<T: DeserializeOwned>(store: &dyn PreferenceStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "ignoring unreadable preference");
            None
        }
    }
}

/// Encode and write a typed value.
pub fn write<T: Serialize + ?Sized>(
    store: &dyn PreferenceStore,
    key: &str,
    value: &T,
) -> Result<(), CoreError> {
    let encoded = serde_json::to_string(value).map_err(|e| CoreError::Preferences {
        message: format!("cannot encode {key}: {e}"),
    })?;
    store.set(key, &encoded)
}

/// Typed view over the preference keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub selected_address: Option<String>,
    pub metrics_expanded: bool,
    pub show_round1: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            selected_address: None,
            metrics_expanded: true,
            show_round1: false,
        }
    }
}

impl Preferences {
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let defaults = Self::default();
        Self {
            selected_address: read(store, KEY_SELECTED_ADDRESS),
            metrics_expanded: read(store, KEY_METRICS_EXPANDED)
                .unwrap_or(defaults.metrics_expanded),
            show_round1: read(store, KEY_SHOW_ROUND1).unwrap_or(defaults.show_round1),
        }
    }

    pub fn round_filter(&self) -> RoundFilter {
        RoundFilter::from_show_round1(self.show_round1)
    }
}

/// In-memory store for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let store = MemoryPreferenceStore::new();
        let prefs = Preferences::load(&store);
        assert_eq!(prefs, Preferences::default());
        assert!(prefs.metrics_expanded);
        assert!(!prefs.show_round1);
        assert_eq!(prefs.round_filter(), RoundFilter::PrimaryOnly);
    }

    #[test]
    fn values_round_trip_as_json() {
        let store = MemoryPreferenceStore::new();
        write(&store, KEY_SELECTED_ADDRESS, "tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx").unwrap();
        write(&store, KEY_SHOW_ROUND1, &true).unwrap();
        write(&store, KEY_METRICS_EXPANDED, &false).unwrap();

        assert_eq!(store.get(KEY_SHOW_ROUND1).as_deref(), Some("true"));

        let prefs = Preferences::load(&store);
        assert_eq!(
            prefs.selected_address.as_deref(),
            Some("tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx")
        );
        assert!(prefs.show_round1);
        assert!(!prefs.metrics_expanded);
    }

    #[test]
    fn unreadable_value_falls_back_to_default() {
        let store = MemoryPreferenceStore::new();
        store.set(KEY_METRICS_EXPANDED, "not json").unwrap();
        assert!(Preferences::load(&store).metrics_expanded);
    }
}
