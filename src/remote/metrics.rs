//! Lock-free counters for the plant data client.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::info;

/// Per-client counters. Observability only; nothing reads them for control flow.
#[derive(Debug, Default)]
pub struct ClientMetrics {
    /// Outbound HTTP attempts, retries included.
    pub outbound_calls: AtomicU64,
    /// Attempts that were a retry of a transient failure.
    pub retries: AtomicU64,
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    /// Operations that surfaced an error to the caller.
    pub failures: AtomicU64,
}

/// Point-in-time copy of [`ClientMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub outbound_calls: u64,
    pub retries: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub failures: u64,
}

impl ClientMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_call(&self) {
        self.outbound_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            outbound_calls: self.outbound_calls.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Emit current counters as a structured log line.
    pub fn emit(&self, reason: &str) {
        let s = self.snapshot();
        info!(
            event = "plant_client_summary",
            reason = reason,
            outbound_calls = s.outbound_calls,
            retries = s.retries,
            cache_hits = s.cache_hits,
            cache_misses = s.cache_misses,
            failures = s.failures,
            "Plant client metrics"
        );
    }
}
