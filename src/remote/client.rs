//! Remote plant data client.
//!
//! Every outbound attempt passes the sliding-window limiter, runs under a
//! bounded timeout, and is retried only for transient failures. Resolved
//! profiles land in the shared caches and in the caller's conversation
//! registry.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::PlantCaches;
use crate::config::Config;
use crate::error::{PlantError, Result};
use crate::extract::normalize_name;
use crate::profile::wire::{DataEnvelope, ErrorEnvelope, ListEnvelope};
use crate::profile::{from_raw, PlantProfile, SearchHit};
use crate::registry::ConversationRegistry;

use super::metrics::ClientMetrics;
use super::rate_limit::SlidingWindowLimiter;
use super::retry::RetryPolicy;
use super::transport::{HttpTransport, PlantTransport, RawResponse};

/// Search size used when resolving a free-form name.
pub const NAME_SEARCH_LIMIT: usize = 5;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ERROR_BODY: usize = 200;

pub struct PlantDataClient {
    transport: Arc<dyn PlantTransport>,
    caches: Arc<PlantCaches>,
    limiter: SlidingWindowLimiter,
    retry: RetryPolicy,
    timeout: Duration,
    metrics: Arc<ClientMetrics>,
}

impl std::fmt::Debug for PlantDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantDataClient")
            .field("limiter", &self.limiter)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PlantDataClient {
    /// Client with default limiter, retry policy and timeout.
    pub fn new(transport: Arc<dyn PlantTransport>, caches: Arc<PlantCaches>) -> Self {
        Self {
            transport,
            caches,
            limiter: SlidingWindowLimiter::default(),
            retry: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            metrics: Arc::new(ClientMetrics::new()),
        }
    }

    /// HTTP client configured from `config`, sharing `caches`.
    pub fn from_config(config: &Config, caches: Arc<PlantCaches>) -> Result<Self> {
        let transport = Arc::new(HttpTransport::from_config(&config.api)?);
        Ok(Self::new(transport, caches)
            .with_limiter(SlidingWindowLimiter::from_config(&config.rate_limit))
            .with_retry(RetryPolicy::from_config(&config.api))
            .with_timeout(config.api.timeout()))
    }

    pub fn with_limiter(mut self, limiter: SlidingWindowLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn caches(&self) -> &Arc<PlantCaches> {
        &self.caches
    }

    pub fn metrics(&self) -> &Arc<ClientMetrics> {
        &self.metrics
    }

    pub fn limiter(&self) -> &SlidingWindowLimiter {
        &self.limiter
    }

    /// Species search, cached by normalized query and limit.
    pub async fn search_by_name(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let normalized = normalize_name(query);
        if normalized.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let key = format!("{}|{}", normalized, limit);
        if let Some(hits) = self.caches.search.get(&key) {
            debug!(query = %normalized, "Search cache hit");
            self.metrics.record_hit();
            return Ok(hits);
        }
        self.metrics.record_miss();

        let result = self
            .fetch("species/search", &[("q", normalized.clone())])
            .await
            .and_then(|body| {
                let envelope: ListEnvelope<SearchHit> = serde_json::from_str(&body)?;
                Ok(envelope.data)
            });
        let mut hits = self.observe(result)?;
        hits.truncate(limit);
        debug!(query = %normalized, results = hits.len(), "Search completed");
        self.caches.search.set(key, hits.clone());
        Ok(hits)
    }

    /// Resolve a profile by its numeric id.
    pub async fn resolve_by_id(
        &self,
        id: u64,
        registry: &ConversationRegistry,
    ) -> Result<Arc<PlantProfile>> {
        self.resolve_profile(&id.to_string(), registry).await
    }

    /// Resolve a profile by its slug.
    pub async fn resolve_by_slug(
        &self,
        slug: &str,
        registry: &ConversationRegistry,
    ) -> Result<Arc<PlantProfile>> {
        let slug = slug.trim().to_lowercase();
        if slug.is_empty() {
            return Err(PlantError::NotFound("empty slug".into()));
        }
        self.resolve_profile(&slug, registry).await
    }

    /// Registry, then common-name cache, then search plus best match.
    pub async fn resolve_by_name(
        &self,
        name: &str,
        registry: &ConversationRegistry,
    ) -> Result<Arc<PlantProfile>> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return Err(PlantError::NotFound("empty plant name".into()));
        }

        if let Some(profile) = registry.find_plant(&normalized) {
            debug!(name = %normalized, id = profile.id, "Registry hit");
            self.metrics.record_hit();
            return Ok(profile);
        }
        if let Some(profile) = self.caches.common_names.get(&normalized) {
            debug!(name = %normalized, id = profile.id, "Common name cache hit");
            self.metrics.record_hit();
            registry.register_profile(&profile);
            return Ok(profile);
        }

        let hits = self.search_by_name(&normalized, NAME_SEARCH_LIMIT).await?;
        let winner = match best_match(&normalized, &hits) {
            Some(hit) => hit,
            None => {
                self.metrics.record_failure();
                return Err(PlantError::NotFound(format!("no plant matches '{}'", name.trim())));
            }
        };
        debug!(name = %normalized, id = winner.id, slug = %winner.slug, "Best search match");

        let profile = self.resolve_by_id(winner.id, registry).await?;
        // the query is an alias for this profile from now on
        self.caches
            .common_names
            .set(normalized, Arc::clone(&profile));
        Ok(profile)
    }

    // -- private helpers ---------------------------------------------------

    async fn resolve_profile(
        &self,
        key: &str,
        registry: &ConversationRegistry,
    ) -> Result<Arc<PlantProfile>> {
        if let Some(profile) = self.caches.profiles.get(key) {
            debug!(key, "Profile cache hit");
            self.metrics.record_hit();
            registry.register_profile(&profile);
            return Ok(profile);
        }
        self.metrics.record_miss();

        let path = format!("species/{}", key);
        let result = self.fetch(&path, &[]).await.and_then(|body| {
            let envelope: DataEnvelope<Value> = serde_json::from_str(&body)?;
            from_raw(envelope.data)
        });
        let profile = Arc::new(self.observe(result)?);
        info!(id = profile.id, slug = %profile.slug, "Resolved plant profile");
        self.store(&profile, registry);
        Ok(profile)
    }

    fn store(&self, profile: &Arc<PlantProfile>, registry: &ConversationRegistry) {
        self.caches
            .profiles
            .set(profile.id.to_string(), Arc::clone(profile));
        self.caches
            .profiles
            .set(profile.slug.to_lowercase(), Arc::clone(profile));
        if let Some(common) = profile.common_name.as_deref() {
            self.caches
                .common_names
                .set(normalize_name(common), Arc::clone(profile));
        }
        registry.register_profile(profile);
    }

    async fn fetch(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let metrics = &self.metrics;
        self.retry
            .run(path, || self.attempt(path, query), |_| metrics.record_retry())
            .await
    }

    async fn attempt(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        self.limiter.try_acquire()?;
        self.metrics.record_call();

        let response = tokio::time::timeout(self.timeout, self.transport.get(path, query))
            .await
            .map_err(|_| {
                PlantError::Transient(format!(
                    "{} timed out after {}ms",
                    path,
                    self.timeout.as_millis()
                ))
            })??;

        if response.is_success() {
            Ok(response.body)
        } else {
            Err(error_from_response(&response))
        }
    }

    fn observe<T>(&self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.metrics.record_failure();
        }
        result
    }
}

/// Classify a non-2xx response, preferring the envelope's `message`.
fn error_from_response(response: &RawResponse) -> PlantError {
    let message = serde_json::from_str::<ErrorEnvelope>(&response.body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let body = response.body.trim();
            if body.is_empty() {
                format!("HTTP {}", response.status)
            } else {
                body.chars().take(MAX_ERROR_BODY).collect()
            }
        });
    PlantError::from_status(response.status, message)
}

/// Pick the search hit that best matches `query`.
///
/// Tried in order: exact common name, exact scientific name, common-name
/// prefix, scientific-name prefix, common-name substring. Falls back to the
/// first hit.
pub fn best_match<'a>(query: &str, hits: &'a [SearchHit]) -> Option<&'a SearchHit> {
    let q = normalize_name(query);
    let common = |h: &SearchHit| h.common_name.as_deref().map(normalize_name);
    let scientific = |h: &SearchHit| normalize_name(&h.scientific_name);

    hits.iter()
        .find(|h| common(*h).is_some_and(|c| c == q))
        .or_else(|| hits.iter().find(|h| scientific(*h) == q))
        .or_else(|| hits.iter().find(|h| common(*h).is_some_and(|c| c.starts_with(&q))))
        .or_else(|| hits.iter().find(|h| scientific(*h).starts_with(&q)))
        .or_else(|| hits.iter().find(|h| common(*h).is_some_and(|c| c.contains(&q))))
        .or_else(|| hits.first())
}
