//! Per-key compute-once memo used for schemas and lookup tables.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Values loaded at most once per key and kept for the cache's lifetime.
///
/// Each key has its own slot. Concurrent callers asking for the same key
/// wait for the first load instead of issuing their own, while loads of
/// other keys proceed. Failed loads are not cached.
#[derive(Debug)]
pub struct MemoCache<V> {
    slots: Mutex<HashMap<String, Arc<Slot<V>>>>,
}

#[derive(Debug)]
struct Slot<V> {
    value: OnceLock<Arc<V>>,
    loading: Mutex<()>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            value: OnceLock::new(),
            loading: Mutex::new(()),
        }
    }
}

impl<V> Default for MemoCache<V> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> MemoCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.lock_slots().get(key)?.value.get().cloned()
    }

    /// Cached value for `key`, running `load` on first access.
    pub fn get_or_try_insert_with<E, F>(&self, key: &str, load: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let slot = Arc::clone(self.lock_slots().entry(key.to_string()).or_default());
        if let Some(value) = slot.value.get() {
            return Ok(Arc::clone(value));
        }

        let _loading = slot.loading.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = slot.value.get() {
            return Ok(Arc::clone(value));
        }
        let value = Arc::new(load()?);
        Ok(Arc::clone(slot.value.get_or_init(|| value)))
    }

    /// Number of loaded keys.
    pub fn len(&self) -> usize {
        self.lock_slots()
            .values()
            .filter(|slot| slot.value.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Arc<Slot<V>>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
