//! Process-wide plant data caches with TTL expiry and batched eviction.

pub mod ttl_cache;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::CacheConfig;
use crate::profile::{PlantProfile, SearchHit};

pub use ttl_cache::{CacheStats, TtlCache};

/// The three shared caches used by the plant data client.
///
/// Profile data is not conversation-specific, so one `PlantCaches` is
/// shared by every conversation in the process.
#[derive(Debug)]
pub struct PlantCaches {
    /// Search hits keyed by normalized query and limit.
    pub search: TtlCache<Vec<SearchHit>>,
    /// Profiles keyed by numeric id and by slug.
    pub profiles: TtlCache<Arc<PlantProfile>>,
    /// Profiles keyed by normalized common name.
    pub common_names: TtlCache<Arc<PlantProfile>>,
}

impl PlantCaches {
    pub fn new(config: &CacheConfig) -> Self {
        let ttl = config.ttl();
        Self {
            search: TtlCache::new("search", config.search_capacity, ttl),
            profiles: TtlCache::new("profiles", config.profile_capacity, ttl),
            common_names: TtlCache::new("common_names", config.name_capacity, ttl),
        }
    }

    /// Remove expired entries from all three caches.
    pub fn cleanup(&self) -> usize {
        self.search.cleanup() + self.profiles.cleanup() + self.common_names.cleanup()
    }

    pub fn stats(&self) -> [CacheStats; 3] {
        [
            self.search.stats(),
            self.profiles.stats(),
            self.common_names.stats(),
        ]
    }

    pub fn clear(&self) {
        self.search.clear();
        self.profiles.clear();
        self.common_names.clear();
    }
}

impl Default for PlantCaches {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

/// Start a background task that sweeps expired entries every `interval`.
///
/// Stops when `shutdown_rx` signals `true` or its sender is dropped.
pub fn start_periodic_cleanup(
    caches: Arc<PlantCaches>,
    interval: Duration,
    mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.tick().await; // skip first immediate tick

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = caches.cleanup();
                    if removed > 0 {
                        info!(event = "cache_cleanup", removed, "Swept expired plant cache entries");
                    } else {
                        debug!(event = "cache_cleanup", "No expired plant cache entries");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        debug!("Plant cache cleanup task stopping");
                        break;
                    }
                }
            }
        }
    })
}
