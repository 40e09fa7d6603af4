//! High-level facade: text in, mentions and resolved plant context out.
//!
//! `PlantKnowledge` owns the process-wide pieces (client, caches). Each
//! conversation brings its own [`ConversationRegistry`], created with
//! [`PlantKnowledge::new_conversation`].
//!
//! # Example
//!
//! ```rust,ignore
//! use plantlore::{Config, PlantKnowledge};
//!
//! let knowledge = PlantKnowledge::builder()
//!     .config(Config::load()?)
//!     .build()?;
//! let registry = knowledge.new_conversation();
//!
//! let ctx = knowledge
//!     .plant_context("my tomato plant has yellow leaves", &[] as &[&str], &registry)
//!     .await;
//! println!("{}", ctx.narrative);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::cache::{start_periodic_cleanup, PlantCaches};
use crate::config::Config;
use crate::error::{PlantError, Result};
use crate::extract::{
    extract_mentions, extract_mentions_from_history, is_plant_related_query, MentionSource,
    PlantMention,
};
use crate::format::{context_block, record, PlantRecord};
use crate::profile::PlantProfile;
use crate::registry::ConversationRegistry;
use crate::remote::{PlantDataClient, PlantTransport, RetryPolicy, SlidingWindowLimiter};

/// A mention that could not be resolved, with the reason.
#[derive(Debug)]
pub struct ResolutionFailure {
    pub name: String,
    pub error: PlantError,
}

/// Outcome of resolving a batch of mentions. Never an error as a whole.
#[derive(Debug, Default)]
pub struct ResolutionReport {
    /// Resolved profiles, one per distinct id, in mention order.
    pub profiles: Vec<Arc<PlantProfile>>,
    pub failures: Vec<ResolutionFailure>,
}

impl ResolutionReport {
    /// Names of the mentions that failed to resolve.
    pub fn not_found(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.name.clone()).collect()
    }

    /// True when any failure needs operator attention.
    pub fn has_fatal_failure(&self) -> bool {
        self.failures.iter().any(|f| f.error.is_fatal())
    }
}

/// Everything a message handler needs about the plants in a message.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantContext {
    pub plant_related: bool,
    pub mentions: Vec<PlantMention>,
    /// Markdown block for prompt injection; empty when nothing resolved.
    pub narrative: String,
    pub records: Vec<PlantRecord>,
    pub not_found: Vec<String>,
}

pub struct PlantKnowledge {
    client: Arc<PlantDataClient>,
    caches: Arc<PlantCaches>,
    config: Config,
}

impl PlantKnowledge {
    pub fn builder() -> PlantKnowledgeBuilder {
        PlantKnowledgeBuilder::new()
    }

    /// Fresh registry sized from configuration.
    pub fn new_conversation(&self) -> ConversationRegistry {
        ConversationRegistry::new(self.config.registry.capacity)
    }

    pub fn client(&self) -> &Arc<PlantDataClient> {
        &self.client
    }

    pub fn caches(&self) -> &Arc<PlantCaches> {
        &self.caches
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ranked mentions for the current message plus recent history.
    ///
    /// History mentions are tagged [`MentionSource::Context`] and never
    /// displace a mention found in the current message.
    pub fn analyze<S: AsRef<str>>(
        &self,
        current: &str,
        history: &[S],
        registry: &ConversationRegistry,
    ) -> Vec<PlantMention> {
        let known = registry.all_plants();
        let mut mentions = extract_mentions(current, &known);

        let extraction = &self.config.extraction;
        let start = history.len().saturating_sub(extraction.history_window);
        let past = extract_mentions_from_history(&history[start..], extraction.history_limit, &known);

        let mut seen: HashSet<String> =
            mentions.iter().map(|m| m.normalized_name.clone()).collect();
        for mut mention in past {
            if seen.insert(mention.normalized_name.clone()) {
                mention.source = MentionSource::Context;
                mentions.push(mention);
            }
        }
        mentions.sort_by_key(|m| (m.confidence, m.source));
        mentions
    }

    /// Resolve the top mentions concurrently. Failures are isolated per
    /// mention and reported, never propagated.
    pub async fn resolve_mentions(
        &self,
        mentions: &[PlantMention],
        registry: &ConversationRegistry,
    ) -> ResolutionReport {
        let limit = self.config.extraction.max_resolutions;
        let lookups = mentions.iter().take(limit).map(|mention| async move {
            let result = self
                .client
                .resolve_by_name(&mention.normalized_name, registry)
                .await;
            (mention, result)
        });

        let mut report = ResolutionReport::default();
        let mut ids = HashSet::new();
        for (mention, result) in join_all(lookups).await {
            match result {
                Ok(profile) => {
                    if ids.insert(profile.id) {
                        report.profiles.push(profile);
                    }
                }
                Err(err) => {
                    if let PlantError::AuthFailure(_) = err {
                        error!(name = %mention.normalized_name, error = %err, "Plant API rejected credentials");
                    } else {
                        warn!(name = %mention.normalized_name, error = %err, "Could not resolve plant mention");
                    }
                    report.failures.push(ResolutionFailure {
                        name: mention.normalized_name.clone(),
                        error: err,
                    });
                }
            }
        }
        report
    }

    /// Full pipeline: pre-filter, extraction, resolution, formatting.
    pub async fn plant_context<S: AsRef<str>>(
        &self,
        current: &str,
        history: &[S],
        registry: &ConversationRegistry,
    ) -> PlantContext {
        let mentions = self.analyze(current, history, registry);
        let plant_related = is_plant_related_query(current)
            || mentions
                .iter()
                .any(|m| m.source == MentionSource::ExactMatch);
        if !plant_related {
            debug!("Message is not plant related, skipping resolution");
            return PlantContext::default();
        }
        if mentions.is_empty() {
            return PlantContext {
                plant_related,
                ..PlantContext::default()
            };
        }

        let report = self.resolve_mentions(&mentions, registry).await;
        PlantContext {
            plant_related,
            narrative: context_block(&report.profiles),
            records: report.profiles.iter().map(|p| record(p)).collect(),
            not_found: report.not_found(),
            mentions,
        }
    }

    /// Spawn the periodic cache sweep; stops when `shutdown_rx` flips to `true`.
    pub fn start_maintenance(&self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        start_periodic_cleanup(
            Arc::clone(&self.caches),
            self.config.cache.cleanup_interval(),
            shutdown_rx,
        )
    }
}

/// Builder for [`PlantKnowledge`].
#[derive(Default)]
pub struct PlantKnowledgeBuilder {
    config: Option<Config>,
    transport: Option<Arc<dyn PlantTransport>>,
    caches: Option<Arc<PlantCaches>>,
}

impl PlantKnowledgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration to build from (default: [`Config::default`]).
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this transport instead of HTTP.
    pub fn transport(mut self, transport: Arc<dyn PlantTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Share caches with other instances in the process.
    pub fn caches(mut self, caches: Arc<PlantCaches>) -> Self {
        self.caches = Some(caches);
        self
    }

    /// Validate configuration and wire the client.
    pub fn build(self) -> Result<PlantKnowledge> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let caches = self
            .caches
            .unwrap_or_else(|| Arc::new(PlantCaches::new(&config.cache)));
        let client = match self.transport {
            Some(transport) => PlantDataClient::new(transport, Arc::clone(&caches))
                .with_limiter(SlidingWindowLimiter::from_config(&config.rate_limit))
                .with_retry(RetryPolicy::from_config(&config.api))
                .with_timeout(config.api.timeout()),
            None => PlantDataClient::from_config(&config, Arc::clone(&caches))?,
        };

        Ok(PlantKnowledge {
            client: Arc::new(client),
            caches,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Confidence;
    use crate::profile::transform::fixtures::tomato_json;
    use crate::remote::RawResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers by path: tomato search and profile, 404 for everything else.
    #[derive(Default)]
    struct TomatoTransport {
        calls: AtomicUsize,
        reject_auth: bool,
    }

    #[async_trait]
    impl PlantTransport for TomatoTransport {
        async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_auth {
                return Ok(RawResponse::new(401, r#"{"error":true,"message":"bad token"}"#));
            }
            let q = query
                .iter()
                .find(|(k, _)| *k == "q")
                .map(|(_, v)| v.as_str())
                .unwrap_or_default();
            let body = match path {
                "species/search" if q.contains("tomato") => json!({
                    "data": [{
                        "id": 263_319,
                        "common_name": "Garden tomato",
                        "slug": "solanum-lycopersicum",
                        "scientific_name": "Solanum lycopersicum"
                    }],
                    "links": {},
                    "meta": { "total": 1 }
                }),
                "species/search" => json!({ "data": [], "links": {}, "meta": { "total": 0 } }),
                "species/263319" => json!({ "data": tomato_json(), "meta": {} }),
                _ => return Ok(RawResponse::new(404, r#"{"error":true,"message":"Not found"}"#)),
            };
            Ok(RawResponse::new(200, body.to_string()))
        }
    }

    fn knowledge(transport: Arc<TomatoTransport>) -> PlantKnowledge {
        PlantKnowledge::builder()
            .transport(transport)
            .build()
            .unwrap()
    }

    const NO_HISTORY: &[&str] = &[];

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = Config::default();
        config.registry.capacity = 0;
        let result = PlantKnowledge::builder()
            .config(config)
            .transport(Arc::new(TomatoTransport::default()))
            .build();
        assert!(matches!(result, Err(PlantError::Config(_))));
    }

    #[test]
    fn test_new_conversation_uses_configured_capacity() {
        let mut config = Config::default();
        config.registry.capacity = 7;
        let k = PlantKnowledge::builder()
            .config(config)
            .transport(Arc::new(TomatoTransport::default()))
            .build()
            .unwrap();
        assert_eq!(k.new_conversation().capacity(), 7);
        assert_eq!(k.config().registry.capacity, 7);
    }

    #[test]
    fn test_analyze_merges_history_as_context() {
        let k = knowledge(Arc::new(TomatoTransport::default()));
        let registry = k.new_conversation();
        let history = ["I also grow basil on the balcony", "and my tomato is doing fine"];
        let mentions = k.analyze("my tomato plant has yellow leaves", &history, &registry);

        let tomato: Vec<_> = mentions.iter().filter(|m| m.normalized_name == "tomato").collect();
        assert_eq!(tomato.len(), 1);
        assert_eq!(tomato[0].source, MentionSource::CommonName);
        assert_eq!(mentions[0].normalized_name, "tomato");

        let basil = mentions
            .iter()
            .find(|m| m.normalized_name == "basil")
            .expect("history mention");
        assert_eq!(basil.source, MentionSource::Context);
        assert_eq!(basil.confidence, Confidence::High);
    }

    #[test]
    fn test_analyze_respects_history_window() {
        let mut config = Config::default();
        config.extraction.history_window = 1;
        let k = PlantKnowledge::builder()
            .config(config)
            .transport(Arc::new(TomatoTransport::default()))
            .build()
            .unwrap();
        let registry = k.new_conversation();
        let history = ["what about basil?", "nothing to see here"];
        let mentions = k.analyze("hello", &history, &registry);
        assert!(mentions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_plant_context_resolves_tomato() {
        let transport = Arc::new(TomatoTransport::default());
        let k = knowledge(transport.clone());
        let registry = k.new_conversation();

        let ctx = k
            .plant_context("my tomato plant has yellow leaves", NO_HISTORY, &registry)
            .await;
        assert!(ctx.plant_related);
        assert_eq!(ctx.records.len(), 1);
        assert_eq!(ctx.records[0].scientific_name, "Solanum lycopersicum");
        assert!(ctx.narrative.contains("### Garden tomato"));
        assert!(ctx.not_found.is_empty(), "unexpected failures: {:?}", ctx.not_found);
        let calls = transport.calls.load(Ordering::SeqCst);
        assert_eq!(calls, 2);

        // same question again: registry and caches answer
        let again = k
            .plant_context("my tomato plant has yellow leaves", NO_HISTORY, &registry)
            .await;
        assert_eq!(again.records.len(), 1);
        assert_eq!(transport.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrelated_message_skips_resolution() {
        let transport = Arc::new(TomatoTransport::default());
        let k = knowledge(transport.clone());
        let ctx = k
            .plant_context("what time is the meeting tomorrow", NO_HISTORY, &k.new_conversation())
            .await;
        assert!(!ctx.plant_related);
        assert!(ctx.mentions.is_empty());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_isolated_per_mention() {
        let transport = Arc::new(TomatoTransport::default());
        let k = knowledge(transport);
        let registry = k.new_conversation();
        let mentions = vec![
            PlantMention {
                original_text: "tomato".into(),
                normalized_name: "tomato".into(),
                confidence: Confidence::High,
                source: MentionSource::CommonName,
            },
            PlantMention {
                original_text: "zzyzx".into(),
                normalized_name: "zzyzx".into(),
                confidence: Confidence::High,
                source: MentionSource::Pattern,
            },
        ];
        let report = k.resolve_mentions(&mentions, &registry).await;
        assert_eq!(report.profiles.len(), 1);
        assert_eq!(report.not_found(), vec!["zzyzx".to_string()]);
        assert!(!report.has_fatal_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolution_limit_and_dedup() {
        let transport = Arc::new(TomatoTransport::default());
        let mut config = Config::default();
        config.extraction.max_resolutions = 2;
        let k = PlantKnowledge::builder()
            .config(config)
            .transport(transport.clone())
            .build()
            .unwrap();
        let mention = |name: &str| PlantMention {
            original_text: name.into(),
            normalized_name: name.into(),
            confidence: Confidence::High,
            source: MentionSource::CommonName,
        };
        let mentions = vec![mention("tomato"), mention("garden tomato"), mention("basil")];
        let report = k.resolve_mentions(&mentions, &k.new_conversation()).await;
        // both names land on one profile; "basil" is past the limit
        assert_eq!(report.profiles.len(), 1);
        assert!(report.failures.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_is_reported_not_raised() {
        let transport = Arc::new(TomatoTransport {
            reject_auth: true,
            ..Default::default()
        });
        let k = knowledge(transport.clone());
        let ctx_registry = k.new_conversation();
        let report = k
            .resolve_mentions(&k.analyze("my tomato plant", NO_HISTORY, &ctx_registry), &ctx_registry)
            .await;
        assert!(report.profiles.is_empty());
        assert!(report.has_fatal_failure());
        assert_eq!(report.not_found(), vec!["tomato".to_string()]);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_maintenance_stops_on_shutdown() {
        let k = knowledge(Arc::new(TomatoTransport::default()));
        let (tx, rx) = watch::channel(false);
        let handle = k.start_maintenance(rx);
        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
