//! In-memory key-value storage
//!
//! Thread-safe HashMap behind an RwLock. Contents are lost when the
//! process exits; use it for tests and for deployments that do not want
//! sessions to survive a restart.

use super::store::{KeyValueStore, StorageError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory store
///
/// Clones share the same underlying map.
///
/// # Example
///
/// ```
/// use congreso_core::session::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set("token", "abc").unwrap();
/// assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values may hold credentials; show keys only
        let keys: Vec<String> = self
            .entries
            .read()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("MemoryStore").field("keys", &keys).finish()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic() {
        let store = MemoryStore::new();

        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").unwrap(), Some("abc".to_string()));
        assert!(store.contains("token").unwrap());

        store.set("token", "def").unwrap();
        assert_eq!(store.get("token").unwrap(), Some("def".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_remove_is_idempotent() {
        let store = MemoryStore::new();
        store.set("usuario", "{}").unwrap();

        store.remove("usuario").unwrap();
        store.remove("usuario").unwrap();

        assert!(!store.contains("usuario").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_debug_hides_values() {
        let store = MemoryStore::new();
        store.set("token", "very-secret").unwrap();

        let debug = format!("{:?}", store);
        assert!(debug.contains("token"));
        assert!(!debug.contains("very-secret"));
    }

    #[tokio::test]
    async fn test_memory_store_concurrent() {
        let store = MemoryStore::new();

        let mut handles = vec![];
        for i in 0..10 {
            let store_clone = store.clone();
            handles.push(tokio::spawn(async move {
                store_clone.set(&format!("key-{}", i), "value").unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len(), 10);
    }
}
