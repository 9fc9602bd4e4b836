//! Single-Flight Cache
//!
//! Key/value store shared by the repositories of one scan. Each key carries
//! its own async lock so that an expensive listing runs once per key no
//! matter how many enumerators ask for it concurrently:
//!
//! ```ignore
//! let entry = cache.get_and_lock("search_all_resources").await;
//! if let Some(hit) = entry.value::<Vec<Asset>>() {
//!     return Ok(hit);
//! }
//! let fresh = Arc::new(fetch().await?); // lock released on `?`
//! entry.put(Arc::clone(&fresh));
//! ```
//!
//! Entries never expire. Values stored through a [`LockedEntry`] are pinned:
//! they hold a scan's snapshot and are never evicted. The capacity bounds the
//! remaining entries, evicting the least recently used key; a capacity of
//! zero stores none of them.

use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as KeyLock, OwnedMutexGuard};

type Erased = Arc<dyn Any + Send + Sync>;

struct Slot {
    value: Erased,
    last_used: u64,
    pinned: bool,
}

#[derive(Default)]
struct Store {
    slots: HashMap<String, Slot>,
    clock: u64,
}

impl Store {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn unpinned(&self) -> usize {
        self.slots.values().filter(|slot| !slot.pinned).count()
    }

    fn evict_least_recently_used(&mut self) {
        let oldest = self
            .slots
            .iter()
            .filter(|(_, slot)| !slot.pinned)
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            tracing::trace!("cache: evicting {}", key);
            self.slots.remove(&key);
        }
    }
}

/// Per-scan cache with per-key exclusive locking
pub struct Cache {
    capacity: usize,
    store: Mutex<Store>,
    /// Removed once no caller holds or awaits them
    locks: Mutex<HashMap<String, Arc<KeyLock<()>>>>,
}

impl Cache {
    /// Create a cache holding at most `capacity` keys
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            store: Mutex::new(Store::default()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.store.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read a value without waiting on the key's lock.
    ///
    /// A value stored under a different type reads as a miss.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let mut store = self.store.lock();
        let now = store.tick();
        let slot = store.slots.get_mut(key)?;
        slot.last_used = now;
        Arc::clone(&slot.value).downcast::<T>().ok()
    }

    /// Store a value, returning `true` when an existing value was replaced
    pub fn put<T: Any + Send + Sync>(&self, key: &str, value: Arc<T>) -> bool {
        self.store(key, value, false)
    }

    fn store(&self, key: &str, value: Erased, pinned: bool) -> bool {
        let mut store = self.store.lock();
        let now = store.tick();

        if let Some(slot) = store.slots.get_mut(key) {
            slot.value = value;
            slot.last_used = now;
            slot.pinned |= pinned;
            return true;
        }

        if !pinned {
            if self.capacity == 0 {
                return false;
            }
            if store.unpinned() >= self.capacity {
                store.evict_least_recently_used();
            }
        }
        store.slots.insert(
            key.to_string(),
            Slot {
                value,
                last_used: now,
                pinned,
            },
        );
        false
    }

    /// Drop the lock of `key` unless another caller holds or awaits it
    fn release(&self, key: &str) {
        let mut locks = self.locks.lock();
        if locks.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(key);
        }
    }

    /// Acquire the exclusive lock for `key`.
    ///
    /// Other callers for the same key wait until the returned entry is
    /// dropped or [`LockedEntry::unlock`]ed; distinct keys never contend.
    pub async fn get_and_lock(&self, key: &str) -> LockedEntry<'_> {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(key.to_string()).or_default())
        };

        let guard = lock.lock_owned().await;

        LockedEntry {
            cache: self,
            key: key.to_string(),
            guard: Some(guard),
        }
    }
}

/// Exclusive hold on one cache key, released on drop
pub struct LockedEntry<'a> {
    cache: &'a Cache,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl LockedEntry<'_> {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Cached value for the held key, `None` on miss
    pub fn value<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.cache.get(&self.key)
    }

    /// Populate the held key; the value is pinned
    pub fn put<T: Any + Send + Sync>(&self, value: Arc<T>) -> bool {
        self.cache.store(&self.key, value, true)
    }

    /// Release the key explicitly
    pub fn unlock(self) {}
}

impl Drop for LockedEntry<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.cache.release(&self.key);
    }
}
