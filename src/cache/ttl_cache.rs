//! Bounded key/value cache with TTL expiry and batched oldest-first eviction.
//!
//! Entries expire `ttl` after insertion and are dropped lazily on read or by
//! [`TtlCache::cleanup`]. When a new key arrives at capacity, the oldest
//! `max(1, capacity / 10)` entries by insertion time are evicted in one sweep.
//! An ordered index on `(inserted_at, seq)` keeps that sweep from sorting.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// A cached value and its creation instant. Never leaves the cache.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    inserted_at: Instant,
    seq: u64,
}

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Insertion order index: `(inserted_at, seq)` → key.
    by_age: BTreeMap<(Instant, u64), String>,
    next_seq: u64,
}

impl<V> Default for CacheState<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            by_age: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<V> CacheState<V> {
    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.by_age.remove(&(entry.inserted_at, entry.seq));
        Some(entry)
    }
}

/// Thread-safe TTL cache. Values are cloned out on read, so store `Arc`s
/// for anything larger than a handle.
#[derive(Debug)]
pub struct TtlCache<V> {
    name: &'static str,
    state: Mutex<CacheState<V>>,
    ttl: Duration,
    capacity: usize,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache. `capacity` is clamped to a minimum of 1.
    pub fn new(name: &'static str, capacity: usize, ttl: Duration) -> Self {
        Self {
            name,
            state: Mutex::new(CacheState::default()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Look up a value. Expired entries are removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut state = self.lock();
        let expired = state
            .entries
            .get(key)
            .map(|e| now.saturating_duration_since(e.inserted_at) > self.ttl)?;
        if expired {
            debug!(cache = self.name, key, "Cache entry expired, removing");
            state.remove(key);
            return None;
        }
        state.entries.get(key).map(|e| e.data.clone())
    }

    /// Insert or replace a value, evicting the oldest batch first when a new
    /// key would exceed capacity.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let now = Instant::now();
        let mut state = self.lock();

        if state.remove(&key).is_none() && state.entries.len() >= self.capacity {
            self.evict_oldest(&mut state);
        }

        let seq = state.next_seq;
        state.next_seq = state.next_seq.wrapping_add(1);
        state.by_age.insert((now, seq), key.clone());
        state.entries.insert(
            key,
            CacheEntry {
                data: value,
                inserted_at: now,
                seq,
            },
        );
    }

    /// Remove a single key. Returns `true` if it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut state = self.lock();
        let mut removed = 0;
        // by_age is ordered oldest first, so stop at the first live entry
        loop {
            let oldest = state.by_age.keys().next().copied();
            let Some(slot) = oldest else {
                break;
            };
            if now.saturating_duration_since(slot.0) <= self.ttl {
                break;
            }
            if let Some(key) = state.by_age.remove(&slot) {
                state.entries.remove(&key);
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(cache = self.name, removed, "Removed expired cache entries");
        }
        removed
    }

    /// Remove all entries.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.by_age.clear();
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Size and live-entry ages. For observability only.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let state = self.lock();
        let mut live = state
            .by_age
            .keys()
            .map(|(inserted_at, _)| now.saturating_duration_since(*inserted_at))
            .filter(|age| *age <= self.ttl);
        let oldest_age = live.next();
        let newest_age = live.last().or(oldest_age);
        CacheStats {
            name: self.name,
            size: state.entries.len(),
            capacity: self.capacity,
            oldest_age,
            newest_age,
        }
    }

    // -- private helpers ---------------------------------------------------

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState<V>> {
        // maps stay consistent under poisoning: every mutation is one insert/remove pair
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn evict_oldest(&self, state: &mut CacheState<V>) {
        let batch = (self.capacity / 10).max(1);
        let victims: Vec<(Instant, u64)> = state.by_age.keys().take(batch).copied().collect();
        for slot in &victims {
            if let Some(key) = state.by_age.remove(slot) {
                state.entries.remove(&key);
            }
        }
        debug!(cache = self.name, evicted = victims.len(), "Evicted oldest cache entries");
    }
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub name: &'static str,
    /// Entries currently stored, including expired ones not yet swept.
    pub size: usize,
    pub capacity: usize,
    /// Age of the oldest non-expired entry.
    pub oldest_age: Option<Duration>,
    /// Age of the newest non-expired entry.
    pub newest_age: Option<Duration>,
}
