//! Error types for plant knowledge lookups.
//!
//! HTTP status codes are the authority for classifying remote failures:
//! 401 → [`PlantError::AuthFailure`], 404 → [`PlantError::NotFound`],
//! 429 → [`PlantError::UpstreamRateLimited`], 5xx → [`PlantError::Transient`],
//! anything else non-2xx → [`PlantError::Unclassified`].

use thiserror::Error;

/// Errors produced by the plant data client, caches, and configuration.
#[derive(Debug, Error)]
pub enum PlantError {
    /// The remote source has no record for the requested name, id, or slug.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API credential is missing, invalid, or expired. Never retried.
    #[error("Authorization failed: {0}")]
    AuthFailure(String),

    /// The local sliding-window limiter refused the call.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// The remote source answered with HTTP 429.
    #[error("Upstream rate limit: {0}")]
    UpstreamRateLimited(String),

    /// Network error, timeout, or 5xx. Retried up to the configured count.
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Any other non-2xx status.
    #[error("Unexpected response (HTTP {status}): {message}")]
    Unclassified { status: u16, message: String },

    /// A 2xx response whose body did not match the expected envelope.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlantError {
    /// Only transient conditions are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlantError::Transient(_))
    }

    /// True for both the local limiter and upstream 429 responses.
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            PlantError::RateLimited(_) | PlantError::UpstreamRateLimited(_)
        )
    }

    /// Errors that need operator attention rather than a retry or a fallback.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PlantError::AuthFailure(_) | PlantError::Config(_))
    }

    /// Map a non-2xx HTTP status and upstream message to an error kind.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => PlantError::AuthFailure(message),
            404 => PlantError::NotFound(message),
            429 => PlantError::UpstreamRateLimited(message),
            500..=599 => PlantError::Transient(format!("HTTP {}: {}", status, message)),
            _ => PlantError::Unclassified { status, message },
        }
    }
}

impl From<serde_json::Error> for PlantError {
    fn from(err: serde_json::Error) -> Self {
        PlantError::InvalidResponse(err.to_string())
    }
}

impl From<toml::de::Error> for PlantError {
    fn from(err: toml::de::Error) -> Self {
        PlantError::Config(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlantError>;
