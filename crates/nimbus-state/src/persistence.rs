//! Persistence Bridge between the store and key-value storage.
//!
//! Every read degrades to a default and every write is best-effort: storage
//! failures are logged here and never reach the store.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use nimbus_core::{KeyValueStorage, StorageError, Unit};
use nimbus_weather::Coordinates;

pub const FAVORITES_KEY: &str = "weather-favorites";
pub const SETTINGS_KEY: &str = "weather-settings";
pub const USER_PREFERENCE_KEY: &str = "weather-user-preference";
pub const CACHE_KEY: &str = "weather-cache";

/// Preference flag set once the user has picked a city themselves
pub const MANUAL_SELECTION_PREF: &str = "manual_city_selected";

/// A city the user saved for quick access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCity {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(rename = "coord")]
    pub coordinates: Coordinates,
    pub added_at: DateTime<Utc>,
}

/// Persisted user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub unit: Unit,
    pub default_city: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit: Unit::Metric,
            default_city: nimbus_core::config::default_city(),
        }
    }
}

/// Typed, failure-tolerant access to the persisted keys
#[derive(Clone)]
pub struct PersistenceBridge {
    storage: Arc<dyn KeyValueStorage>,
}

impl PersistenceBridge {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn load_favorites(&self) -> Vec<FavoriteCity> {
        self.read_or_default(FAVORITES_KEY, Vec::new)
    }

    /// Returns whether the write went through.
    pub fn save_favorites(&self, favorites: &[FavoriteCity]) -> bool {
        self.write(FAVORITES_KEY, &favorites)
    }

    /// Stored settings, or `defaults` when absent or unreadable.
    pub fn load_settings(&self, defaults: &Settings) -> Settings {
        self.read_or_default(SETTINGS_KEY, || defaults.clone())
    }

    pub fn save_settings(&self, settings: &Settings) -> bool {
        self.write(SETTINGS_KEY, settings)
    }

    pub fn get_user_preference(&self, key: &str) -> Option<Value> {
        self.user_preferences().remove(key)
    }

    pub fn set_user_preference(&self, key: &str, value: Value) -> bool {
        let mut preferences = self.user_preferences();
        preferences.insert(key.to_string(), value);
        self.write(USER_PREFERENCE_KEY, &preferences)
    }

    /// Whether the user has picked a city manually in some earlier session.
    pub fn has_manual_selection(&self) -> bool {
        self.get_user_preference(MANUAL_SELECTION_PREF)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    pub fn mark_manual_selection(&self) -> bool {
        self.set_user_preference(MANUAL_SELECTION_PREF, Value::Bool(true))
    }

    /// Remove every key this bridge owns, including the cache key.
    pub fn clear_all(&self) {
        for key in [FAVORITES_KEY, SETTINGS_KEY, USER_PREFERENCE_KEY, CACHE_KEY] {
            self.remove(key);
        }
    }

    pub fn clear_cache(&self) {
        self.remove(CACHE_KEY);
    }

    fn user_preferences(&self) -> Map<String, Value> {
        self.read_or_default(USER_PREFERENCE_KEY, Map::new)
    }

    fn read_or_default<T, F>(&self, key: &str, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.try_read(key) {
            Ok(Some(value)) => value,
            Ok(None) => default(),
            Err(e) => {
                tracing::warn!(key, "Error loading {}: {}", key, e);
                default()
            }
        }
    }

    fn try_read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.storage.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.set(key, &raw));

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, "Error saving {}: {}", key, e);
                false
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            tracing::warn!(key, "Error removing {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nimbus_core::MemoryStorage;

    fn favorite(name: &str) -> FavoriteCity {
        FavoriteCity {
            id: format!("1-{}", name),
            name: name.to_string(),
            country: "NO".to_string(),
            coordinates: Coordinates::new(59.9, 10.7),
            added_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_defaults_on_empty_storage() {
        let bridge = PersistenceBridge::new(Arc::new(MemoryStorage::new()));
        assert!(bridge.load_favorites().is_empty());
        assert_eq!(bridge.load_settings(&Settings::default()), Settings::default());
        assert!(!bridge.has_manual_selection());
    }

    #[test]
    fn test_favorites_keep_added_at() {
        let storage = Arc::new(MemoryStorage::new());
        let bridge = PersistenceBridge::new(storage.clone());
        assert!(bridge.save_favorites(&[favorite("Oslo")]));

        let raw = storage.get(FAVORITES_KEY).unwrap().unwrap();
        assert!(raw.contains("\"addedAt\":\"2024-05-01T12:30:00Z\""));
        assert!(raw.contains("\"coord\""));

        let loaded = bridge.load_favorites();
        assert_eq!(loaded, vec![favorite("Oslo")]);
    }

    #[test]
    fn test_settings_wire_format() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(SETTINGS_KEY, r#"{"unit":"imperial","defaultCity":"Boston"}"#)
            .unwrap();
        let bridge = PersistenceBridge::new(storage);

        let settings = bridge.load_settings(&Settings::default());
        assert_eq!(settings.unit, Unit::Imperial);
        assert_eq!(settings.default_city, "Boston");
    }

    #[test]
    fn test_corrupt_values_fall_back_to_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(FAVORITES_KEY, "not json").unwrap();
        storage.set(USER_PREFERENCE_KEY, "[1,2").unwrap();
        let bridge = PersistenceBridge::new(storage);

        assert!(bridge.load_favorites().is_empty());
        assert!(!bridge.has_manual_selection());
    }

    #[test]
    fn test_disabled_storage_never_fails() {
        let bridge = PersistenceBridge::new(Arc::new(MemoryStorage::disabled()));
        assert!(!bridge.save_favorites(&[favorite("Oslo")]));
        assert!(!bridge.mark_manual_selection());
        assert!(bridge.load_favorites().is_empty());
        bridge.clear_all();
    }

    #[test]
    fn test_user_preferences_merge() {
        let bridge = PersistenceBridge::new(Arc::new(MemoryStorage::new()));
        bridge.set_user_preference("other", Value::from(3));
        bridge.mark_manual_selection();

        assert!(bridge.has_manual_selection());
        assert_eq!(bridge.get_user_preference("other"), Some(Value::from(3)));
    }

    #[test]
    fn test_clear_all_removes_every_key() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(CACHE_KEY, "{}").unwrap();
        let bridge = PersistenceBridge::new(storage.clone());
        bridge.save_favorites(&[favorite("Oslo")]);
        bridge.save_settings(&Settings::default());
        bridge.mark_manual_selection();
        assert_eq!(storage.len(), 4);

        bridge.clear_all();
        assert!(storage.is_empty());
    }
}
