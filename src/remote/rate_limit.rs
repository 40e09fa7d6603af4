//! Sliding-window limiter for outbound API calls.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::RateLimitConfig;
use crate::error::{PlantError, Result};

/// Caps calls per rolling window by keeping the timestamp of each admitted
/// call. A refused call is not recorded.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    window: Duration,
    max_calls: usize,
    calls: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new(window: Duration, max_calls: usize) -> Self {
        Self {
            window,
            max_calls,
            calls: Mutex::new(VecDeque::with_capacity(max_calls.min(1024))),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.window(), config.max_requests)
    }

    /// Record a call if the window has room, else fail with
    /// [`PlantError::RateLimited`].
    pub fn try_acquire(&self) -> Result<()> {
        let now = Instant::now();
        let mut calls = self.lock();
        self.prune(&mut calls, now);
        if calls.len() >= self.max_calls {
            let retry_in = calls
                .front()
                .map(|oldest| self.window.saturating_sub(now.saturating_duration_since(*oldest)))
                .unwrap_or_default();
            return Err(PlantError::RateLimited(format!(
                "{} calls in the last {}s; capacity frees in {}ms",
                calls.len(),
                self.window.as_secs(),
                retry_in.as_millis()
            )));
        }
        calls.push_back(now);
        Ok(())
    }

    /// Calls still admissible in the current window.
    pub fn remaining(&self) -> usize {
        let mut calls = self.lock();
        self.prune(&mut calls, Instant::now());
        self.max_calls.saturating_sub(calls.len())
    }

    /// Time until the oldest recorded call leaves the window, or zero when
    /// the window has room.
    pub fn reset_in(&self) -> Duration {
        let now = Instant::now();
        let mut calls = self.lock();
        self.prune(&mut calls, now);
        if calls.len() < self.max_calls {
            return Duration::ZERO;
        }
        calls
            .front()
            .map(|oldest| self.window.saturating_sub(now.saturating_duration_since(*oldest)))
            .unwrap_or_default()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    fn prune(&self, calls: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = calls.front().copied() {
            if now.saturating_duration_since(oldest) >= self.window {
                calls.pop_front();
            } else {
                break;
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Instant>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}
