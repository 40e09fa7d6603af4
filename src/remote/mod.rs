//! Remote plant data access: transport seam, rate limiting, retries, and the
//! caching client built on top of them.

pub mod client;
pub mod metrics;
pub mod rate_limit;
pub mod retry;
pub mod transport;

pub use client::{best_match, PlantDataClient, NAME_SEARCH_LIMIT};
pub use metrics::{ClientMetrics, MetricsSnapshot};
pub use rate_limit::SlidingWindowLimiter;
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, PlantTransport, RawResponse};
