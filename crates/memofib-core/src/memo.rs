//! Compute-once memoization shared across threads.
//!
//! `Memoizer<K, V>` keeps one lazily initialized slot per key. The key index
//! is guarded by an `RwLock` that is only held while a slot is looked up or
//! created; the value itself is produced inside the slot's `OnceCell`, so
//! misses on distinct keys proceed in parallel while concurrent misses on the
//! same key block until the single computation finishes.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::Serialize;

/// Snapshot of memoizer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoStats {
    /// Lookups that found an initialized value.
    pub hits: u64,
    /// Computations actually executed.
    pub misses: u64,
}

/// A thread-safe, grow-only cache with atomic compute-if-absent.
pub struct Memoizer<K, V> {
    slots: RwLock<HashMap<K, Arc<OnceCell<V>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> Memoizer<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty memoizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached value for `key`, if one has been stored.
    pub fn get(&self, key: &K) -> Option<V> {
        let value = self
            .slots
            .read()
            .get(key)
            .and_then(|slot| slot.get().cloned());
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        value
    }

    /// Whether a value is stored for `key`. Does not count as a hit.
    pub fn contains(&self, key: &K) -> bool {
        self.slots
            .read()
            .get(key)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the value for `key`, computing and storing it with `f` if absent.
    ///
    /// `f` runs at most once per key across all threads for as long as it
    /// succeeds. Callers racing on the same key wait for the running
    /// computation instead of repeating it. If `f` fails the error is
    /// returned, nothing is stored, and another caller may retry.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        f: impl FnOnce(&K) -> Result<V, E>,
    ) -> Result<V, E> {
        let slot = self.slot(&key);
        if let Some(value) = slot.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value.clone());
        }

        // A failed init leaves the slot empty but in place: callers already
        // blocked on it retry against the same cell the index points to.
        slot.get_or_try_init(|| {
            self.misses.fetch_add(1, Ordering::Relaxed);
            f(&key)
        })
        .cloned()
    }

    /// Infallible variant of [`Memoizer::get_or_try_insert_with`].
    pub fn get_or_insert_with(&self, key: K, f: impl FnOnce(&K) -> V) -> V {
        match self.get_or_try_insert_with::<std::convert::Infallible>(key, |k| Ok(f(k))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Current hit/miss counters.
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Find the slot for `key`, creating an empty one if needed.
    fn slot(&self, key: &K) -> Arc<OnceCell<V>> {
        if let Some(slot) = self.slots.read().get(key) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write();
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}

impl<K, V> Default for Memoizer<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
