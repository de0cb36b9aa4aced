//! In-memory [`KeyValueStore`].
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use crate::KeyValueStore;

/// Shared in-memory store. Clones see the same entries, so a test can keep a
/// handle after moving one into a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.lock().remove(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.set("save:Ash", "{}").unwrap();
        assert_eq!(handle.get("save:Ash").unwrap().as_deref(), Some("{}"));
        assert_eq!(handle.keys(), vec!["save:Ash".to_string()]);
    }

    #[test]
    fn missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("save:nobody").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn set_overwrites_and_remove_deletes() {
        let store = MemoryStore::new();
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove("k").as_deref(), Some("2"));
        assert!(store.get("k").unwrap().is_none());
    }
}
