//! plantlore: plant knowledge acquisition for conversational assistants.
//!
//! Finds plant names in free-form text, resolves them against a remote
//! botanical API through a rate-limited, retrying client, and renders the
//! resolved profiles as narrative text or structured records.
//!
//! - [`extract`]: ranked plant mentions from text, no I/O
//! - [`remote`]: the API client with its limiter, retry policy, and transport seam
//! - [`cache`] and [`registry`]: process-wide TTL caches and the per-conversation registry
//! - [`format`]: narrative, summary, and record formatters
//! - [`knowledge`]: the facade that ties them together

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod knowledge;
pub mod profile;
pub mod registry;
pub mod remote;

pub use cache::{CacheStats, PlantCaches, TtlCache};
pub use config::Config;
pub use error::{PlantError, Result};
pub use extract::{
    extract_mentions, extract_mentions_from_history, is_plant_related_query, Confidence,
    MentionSource, PlantMention,
};
pub use format::{context_block, narrative, record, summary, PlantRecord};
pub use knowledge::{
    PlantContext, PlantKnowledge, PlantKnowledgeBuilder, ResolutionFailure, ResolutionReport,
};
pub use profile::{PlantProfile, SearchHit};
pub use registry::ConversationRegistry;
pub use remote::{
    HttpTransport, PlantDataClient, PlantTransport, RawResponse, RetryPolicy,
    SlidingWindowLimiter,
};
