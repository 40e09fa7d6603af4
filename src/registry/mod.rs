//! Per-conversation registry of resolved plant profiles.
//!
//! Unlike the TTL caches, the registry never expires entries; it lives as
//! long as the conversation and evicts the single oldest-inserted key once
//! capacity is reached. One profile is usually registered twice, under its
//! slug and under its common name.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::profile::PlantProfile;

/// Default number of keys a conversation keeps.
pub const DEFAULT_REGISTRY_CAPACITY: usize = 20;

#[derive(Debug, Default)]
struct RegistryState {
    plants: HashMap<String, Arc<PlantProfile>>,
    /// Keys oldest first.
    order: VecDeque<String>,
}

/// Bounded, recency-ordered store of profiles seen in one conversation.
#[derive(Debug)]
pub struct ConversationRegistry {
    state: Mutex<RegistryState>,
    capacity: usize,
}

impl Default for ConversationRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_CAPACITY)
    }
}

impl ConversationRegistry {
    /// `capacity` is clamped to a minimum of 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            capacity: capacity.max(1),
        }
    }

    /// Keys are trimmed and lowercased.
    pub fn normalize_key(key: &str) -> String {
        key.trim().to_lowercase()
    }

    /// Register `profile` under `key`.
    ///
    /// Re-registering an existing key replaces its profile and moves it to
    /// the newest position. A new key beyond capacity evicts the oldest key.
    pub fn register(&self, key: &str, profile: Arc<PlantProfile>) {
        let key = Self::normalize_key(key);
        if key.is_empty() {
            return;
        }
        let mut state = self.lock();
        if state.plants.contains_key(&key) {
            state.order.retain(|k| k != &key);
        } else if state.plants.len() >= self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                debug!(key = %oldest, "Registry full, evicting oldest plant");
                state.plants.remove(&oldest);
            }
        }
        state.order.push_back(key.clone());
        state.plants.insert(key, profile);
    }

    /// Register under the slug and, when present, the common name.
    pub fn register_profile(&self, profile: &Arc<PlantProfile>) {
        self.register(&profile.slug, Arc::clone(profile));
        if let Some(common) = profile.common_name.as_deref() {
            self.register(common, Arc::clone(profile));
        }
    }

    /// Exact key match, else substring match against scientific name,
    /// common name, or slug of any registered profile.
    ///
    /// With several substring matches, which one is returned is unspecified.
    pub fn find_plant(&self, query: &str) -> Option<Arc<PlantProfile>> {
        let query = Self::normalize_key(query);
        if query.is_empty() {
            return None;
        }
        let state = self.lock();
        if let Some(profile) = state.plants.get(&query) {
            return Some(Arc::clone(profile));
        }
        state
            .plants
            .values()
            .find(|p| {
                p.scientific_name.to_lowercase().contains(&query)
                    || p
                        .common_name
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&query))
                    || p.slug.to_lowercase().contains(&query)
            })
            .cloned()
    }

    /// Up to `n` distinct profiles, most recently inserted first.
    pub fn recent_plants(&self, n: usize) -> Vec<Arc<PlantProfile>> {
        let state = self.lock();
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for key in state.order.iter().rev() {
            if out.len() >= n {
                break;
            }
            if let Some(profile) = state.plants.get(key) {
                if seen.insert(profile.id) {
                    out.push(Arc::clone(profile));
                }
            }
        }
        out
    }

    /// Every distinct registered profile, most recent first.
    pub fn all_plants(&self) -> Vec<Arc<PlantProfile>> {
        self.recent_plants(usize::MAX)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().plants.contains_key(&Self::normalize_key(key))
    }

    /// Number of registered keys (not distinct profiles).
    pub fn len(&self) -> usize {
        self.lock().plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().plants.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.plants.clear();
        state.order.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
