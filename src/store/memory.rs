use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::store::KvStorage;

/// In-memory storage, primarily for tests.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let map = self.inner.read().ok()?;
        let value = map.get(key).cloned();
        if value.is_some() {
            debug!("Storage HIT for key: {key}");
        } else {
            debug!("Storage MISS for key: {key}");
        }
        value
    }

    fn set_item(&self, key: &str, value: &str) -> bool {
        match self.inner.write() {
            Ok(mut map) => {
                map.insert(key.to_string(), value.to_string());
                true
            }
            Err(_) => false,
        }
    }

    fn remove_item(&self, key: &str) -> bool {
        match self.inner.write() {
            Ok(mut map) => {
                map.remove(key);
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryStorage::new();

        assert!(storage.get_item("key1").is_none());
        assert!(storage.set_item("key1", "value1"));
        assert_eq!(storage.get_item("key1").as_deref(), Some("value1"));

        assert!(storage.set_item("key1", "value2"));
        assert_eq!(storage.get_item("key1").as_deref(), Some("value2"));

        assert!(storage.remove_item("key1"));
        assert!(storage.get_item("key1").is_none());
    }
}
