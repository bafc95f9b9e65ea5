//! # restio-cache
//!
//! A weakly-owned, string-keyed identity cache. [`WeakCache`] guarantees
//! at-most-one live instance per key *while any external owner retains it*:
//! the cache stores only [`Weak`] back-references, so liveness is decided
//! entirely by external ownership. Two `get` calls with the same key can
//! return different instances if the first was fully released in between.
//!
//! Reclamation is reactive: dropping the last `Arc` destroys the instance
//! immediately, and [`WeakCache::flush_unused`] later compacts the index by
//! removing slots whose referent is gone. There is no capacity limit and no
//! age- or LRU-based eviction.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

/// A non-owning registry of shared instances keyed by string.
///
/// # Examples
///
/// ```
/// use restio_cache::WeakCache;
/// use std::sync::Arc;
///
/// let cache: WeakCache<String> = WeakCache::new();
/// let a = cache.get("k", || String::from("value"));
/// let b = cache.get("k", || unreachable!("still alive, factory not called"));
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct WeakCache<T> {
    entries: RwLock<HashMap<String, Weak<T>>>,
}

impl<T> Default for WeakCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for WeakCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakCache")
            .field("slots", &self.len())
            .field("live", &self.live_count())
            .finish()
    }
}

impl<T> WeakCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the live instance for `key`, or constructs one via `factory`.
    ///
    /// The new instance is registered non-owning: the cache will hand it out
    /// for as long as some external owner keeps it alive, and no longer.
    pub fn get(&self, key: &str, factory: impl FnOnce() -> T) -> Arc<T> {
        {
            let entries = self.entries.read().expect("cache lock poisoned");
            if let Some(existing) = entries.get(key).and_then(Weak::upgrade) {
                return existing;
            }
        }

        let mut entries = self.entries.write().expect("cache lock poisoned");
        // Re-check under the write lock: another caller may have raced us in.
        if let Some(existing) = entries.get(key).and_then(Weak::upgrade) {
            return existing;
        }
        let instance = Arc::new(factory());
        entries.insert(key.to_string(), Arc::downgrade(&instance));
        tracing::trace!(key, "cached new instance");
        instance
    }

    /// Returns the live instance for `key` without constructing one.
    pub fn peek(&self, key: &str) -> Option<Arc<T>> {
        let entries = self.entries.read().expect("cache lock poisoned");
        entries.get(key).and_then(Weak::upgrade)
    }

    /// Removes index slots whose referent no longer exists.
    ///
    /// Pure bookkeeping compaction: instances were already destroyed when
    /// their last external owner released them. Returns the number of slots
    /// removed.
    pub fn flush_unused(&self) -> usize {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, weak| weak.strong_count() > 0);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "flushed dead cache slots");
        }
        removed
    }

    /// Returns a snapshot of all currently live instances.
    ///
    /// Order is unspecified; callers must not assume any.
    pub fn values(&self) -> Vec<Arc<T>> {
        let entries = self.entries.read().expect("cache lock poisoned");
        entries.values().filter_map(Weak::upgrade).collect()
    }

    /// Returns the number of index slots, dead ones included until a flush.
    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    /// Returns `true` if the index has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("cache lock poisoned").is_empty()
    }

    /// Returns the number of slots whose referent is still alive.
    pub fn live_count(&self) -> usize {
        let entries = self.entries.read().expect("cache lock poisoned");
        entries.values().filter(|w| w.strong_count() > 0).count()
    }
}
