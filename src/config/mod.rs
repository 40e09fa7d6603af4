//! Configuration for the plant knowledge subsystem.
//!
//! Loaded from `~/.plantlore/config.toml` when present; every section is
//! `#[serde(default)]` so partial files only override what they name.
//! Environment variables take precedence over the file for the API token
//! and base URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlantError, Result};

/// Default plant data API base.
pub const DEFAULT_API_BASE: &str = "https://trefle.io/api/v1";

const TOKEN_ENV: &str = "PLANTLORE_API_TOKEN";
const TOKEN_ENV_FALLBACK: &str = "TREFLE_API_TOKEN";
const BASE_URL_ENV: &str = "PLANTLORE_API_BASE_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub rate_limit: RateLimitConfig,
    pub cache: CacheConfig,
    pub registry: RegistryConfig,
    pub extraction: ExtractionConfig,
}

/// Remote plant data API settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; `/species/...` paths are appended to it.
    pub base_url: String,
    /// API token sent as the `token` query parameter.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Additional attempts after the first one for transient failures.
    pub max_retries: u32,
    /// Delay unit for linear backoff: attempt N waits `N * retry_base_delay_ms`.
    pub retry_base_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            token: None,
            timeout_secs: 10,
            max_retries: 2,
            retry_base_delay_ms: 1000,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .finish()
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

/// Sliding-window limiter settings for outbound calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 100,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Capacities and TTL of the three process-wide caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    /// Search results keyed by normalized query.
    pub search_capacity: usize,
    /// Profiles keyed by id and slug.
    pub profile_capacity: usize,
    /// Profiles keyed by normalized common name.
    pub name_capacity: usize,
    /// How often the background sweep removes expired entries.
    pub cleanup_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            search_capacity: 200,
            profile_capacity: 300,
            name_capacity: 300,
            cleanup_interval_secs: 60,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

/// Per-conversation registry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { capacity: 20 }
    }
}

/// Limits applied when turning conversation text into lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum unique mentions collected from history.
    pub history_limit: usize,
    /// How many of the most recent history messages are scanned.
    pub history_window: usize,
    /// Mentions resolved against the remote source per message.
    pub max_resolutions: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            history_limit: 5,
            history_window: 10,
            max_resolutions: 3,
        }
    }
}

impl Config {
    /// Directory holding plantlore state: `~/.plantlore`.
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".plantlore")
    }

    /// Default config file path: `~/.plantlore/config.toml`.
    pub fn path() -> PathBuf {
        Self::dir().join("config.toml")
    }

    /// Load from the default path, apply env overrides, and validate.
    pub fn load() -> Result<Self> {
        let path = Self::path();
        let mut config = if path.exists() {
            Self::load_from_path(&path)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Does not apply env overrides.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&data)?;
        Ok(config)
    }

    /// Apply `PLANTLORE_*` environment variables over file values.
    pub fn apply_env_overrides(&mut self) {
        let token = std::env::var(TOKEN_ENV)
            .or_else(|_| std::env::var(TOKEN_ENV_FALLBACK))
            .ok();
        self.apply_overrides(token, std::env::var(BASE_URL_ENV).ok());
    }

    fn apply_overrides(&mut self, token: Option<String>, base_url: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api.token = Some(token.trim().to_string());
        }
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }

    /// Reject values that would make the limiter, caches, or client unusable.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url).map_err(|e| {
            PlantError::Config(format!("invalid api.base_url '{}': {}", self.api.base_url, e))
        })?;
        if self.api.timeout_secs == 0 {
            return Err(PlantError::Config("api.timeout_secs must be > 0".into()));
        }
        if self.rate_limit.window_secs == 0 || self.rate_limit.max_requests == 0 {
            return Err(PlantError::Config(
                "rate_limit.window_secs and rate_limit.max_requests must be > 0".into(),
            ));
        }
        let capacities = [
            ("cache.search_capacity", self.cache.search_capacity),
            ("cache.profile_capacity", self.cache.profile_capacity),
            ("cache.name_capacity", self.cache.name_capacity),
            ("registry.capacity", self.registry.capacity),
        ];
        for (name, value) in capacities {
            if value == 0 {
                return Err(PlantError::Config(format!("{} must be > 0", name)));
            }
        }
        Ok(())
    }
}
