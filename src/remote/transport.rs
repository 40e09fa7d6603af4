//! Transport seam between the plant data client and the HTTP API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{PlantError, Result};

/// Status and body of one HTTP exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One GET against the plant API.
///
/// Non-2xx statuses are returned as a [`RawResponse`], not an error; only
/// connection failures and timeouts are errors ([`PlantError::Transient`]).
#[async_trait]
pub trait PlantTransport: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse>;
}

/// reqwest-backed transport. The API token travels as the `token` query
/// parameter.
pub struct HttpTransport {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl HttpTransport {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("plantlore/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlantError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            http,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, config.token.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl PlantTransport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        let url = self.url(path);
        debug!(url = %url, "Plant API request");

        let mut request = self.http.get(&url).query(query);
        if let Some(token) = &self.token {
            request = request.query(&[("token", token.as_str())]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PlantError::Transient(format!("request to {} timed out", path))
            } else {
                PlantError::Transient(format!("request to {} failed: {}", path, e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PlantError::Transient(format!("reading response body failed: {}", e)))?;
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let t = HttpTransport::new("https://trefle.io/api/v1/", None, Duration::from_secs(5))
            .unwrap();
        assert_eq!(t.base_url(), "https://trefle.io/api/v1");
        assert_eq!(t.url("/species/search"), "https://trefle.io/api/v1/species/search");
        assert_eq!(t.url("species/42"), "https://trefle.io/api/v1/species/42");
    }

    #[test]
    fn test_debug_redacts_token() {
        let t = HttpTransport::new(
            "https://trefle.io/api/v1",
            Some("secret-token".into()),
            Duration::from_secs(5),
        )
        .unwrap();
        let debug = format!("{:?}", t);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn test_blank_token_dropped() {
        let t = HttpTransport::new("http://localhost", Some("  ".into()), Duration::from_secs(1))
            .unwrap();
        assert!(t.token.is_none());
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(404, "").is_success());
        assert!(!RawResponse::new(500, "").is_success());
    }
}
