//! Server-side storage scoped to one browser session.
//!
//! The hosting web framework owns the real storage (a cookie-keyed session
//! table, a cache, ...). The session layer only needs three string
//! operations on it, captured by [`SessionStore`].
//!
//! # Concurrency note
//!
//! Methods take `&self`: the store is responsible for its own locking.
//! Concurrent requests from the same browser session are the only
//! contention case and `UserSession` adds no locking of its own.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::StoreError;

/// String slots belonging to one browser session.
pub trait SessionStore: Send + Sync {
    /// Reads a slot. `Ok(None)` means the slot is empty.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a slot, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Empties a slot. Removing an empty slot is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory [`SessionStore`] for one browser session.
///
/// Clones share the same slots, so a test (or a single-process host) can
/// hand one clone to each request of the same visitor.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.lock().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.slots
            .lock()
            .map_err(|_| StoreError::Unavailable("slot lock poisoned".into()))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_empty_slot_returns_none() {
        let store = MemorySessionStore::new();

        assert_eq!(store.get("missing").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let store = MemorySessionStore::new();

        store.set("k", "v").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let store = MemorySessionStore::new();
        store.set("k", "old").unwrap();

        store.set("k", "new").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_remove_empty_slot_is_ok() {
        let store = MemorySessionStore::new();

        assert!(store.remove("never-set").is_ok());
    }

    #[test]
    fn test_clones_share_slots() {
        // Two requests of the same browser session see the same data.
        let first = MemorySessionStore::new();
        let second = first.clone();

        first.set("k", "v").unwrap();

        assert_eq!(second.get("k").unwrap().as_deref(), Some("v"));
        second.remove("k").unwrap();
        assert_eq!(first.get("k").unwrap(), None);
    }

    #[test]
    fn test_reference_and_arc_delegate() {
        let store = Arc::new(MemorySessionStore::new());
        let by_ref: &MemorySessionStore = &store;

        by_ref.set("a", "1").unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }
}
