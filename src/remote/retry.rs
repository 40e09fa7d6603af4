//! Bounded retry with linearly increasing delay.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::ApiConfig;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.retry_base_delay(),
        }
    }

    /// Delay before retry number `attempt` (1-based): `attempt * base_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent. `on_retry` runs before each retry sleep.
    pub async fn run<T, F, Fut, R>(&self, label: &str, mut op: F, mut on_retry: R) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        R: FnMut(u32),
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    warn!(
                        op = label,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying plant API call"
                    );
                    on_retry(attempt);
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlantError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_linear_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(3000));
    }

    #[test]
    fn test_from_config() {
        let config = ApiConfig {
            max_retries: 4,
            retry_base_delay_ms: 250,
            ..ApiConfig::default()
        };
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.delay_for(2), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_retried_until_success() {
        let calls = AtomicU32::new(0);
        let mut retries = Vec::new();
        let result = RetryPolicy::default()
            .run(
                "test",
                || async {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(PlantError::Transient("HTTP 500".into()))
                    } else {
                        Ok(n)
                    }
                },
                |attempt| retries.push(attempt),
            )
            .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(retries, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_budget_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = RetryPolicy::default()
            .run(
                "test",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(PlantError::Transient("timeout".into()))
                },
                |_| {},
            )
            .await;
        assert!(matches!(result, Err(PlantError::Transient(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_errors_propagate_immediately() {
        for err in [
            PlantError::NotFound("x".into()),
            PlantError::AuthFailure("x".into()),
            PlantError::UpstreamRateLimited("x".into()),
            PlantError::RateLimited("x".into()),
        ] {
            let calls = AtomicU32::new(0);
            let mut pending = Some(err);
            let result: Result<()> = RetryPolicy::default()
                .run(
                    "test",
                    || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        let e = pending.take().expect("called once");
                        async move { Err(e) }
                    },
                    |_| {},
                )
                .await;
            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_delays_are_linear() {
        let start = tokio::time::Instant::now();
        let _: Result<()> = RetryPolicy::default()
            .run(
                "test",
                || async { Err(PlantError::Transient("HTTP 503".into())) },
                |_| {},
            )
            .await;
        // 1s + 2s
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }
}
