//! Persisted user preferences (last used pair and amount).

use serde::{Deserialize, Serialize};

use crate::store::KvStorage;

pub const SETTINGS_CACHE_KEY: &str = "converter::settings";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            from: "USD".to_string(),
            to: "EUR".to_string(),
            amount: None,
        }
    }
}

impl Preferences {
    /// Read preferences from storage; `None` when absent or malformed.
    pub fn load(storage: &dyn KvStorage) -> Option<Self> {
        let raw = storage.get_item(SETTINGS_CACHE_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// Persist preferences; false when the storage write fails.
    pub fn save(&self, storage: &dyn KvStorage) -> bool {
        match serde_json::to_string(self) {
            Ok(json) => storage.set_item(SETTINGS_CACHE_KEY, &json),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    #[test]
    fn test_preferences_round_trip() {
        let storage = MemoryStorage::new();
        assert!(Preferences::load(&storage).is_none());

        let prefs = Preferences {
            from: "CHF".to_string(),
            to: "JPY".to_string(),
            amount: Some(12.5),
        };
        assert!(prefs.save(&storage));
        assert_eq!(Preferences::load(&storage).unwrap(), prefs);
    }

    #[test]
    fn test_malformed_preferences_read_as_none() {
        let storage = MemoryStorage::new();
        storage.set_item(SETTINGS_CACHE_KEY, "{broken");
        assert!(Preferences::load(&storage).is_none());
    }
}
