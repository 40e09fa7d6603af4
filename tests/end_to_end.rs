//! The tomato conversation through the public facade with a stub API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use plantlore::{
    extract_mentions, Confidence, MentionSource, PlantKnowledge, PlantTransport, RawResponse,
    Result,
};

#[derive(Default)]
struct StubPlantApi {
    calls: AtomicUsize,
}

impl StubPlantApi {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlantTransport for StubPlantApi {
    async fn get(&self, path: &str, _query: &[(&str, String)]) -> Result<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = match path {
            "species/search" => json!({
                "data": [{
                    "id": 263_319,
                    "common_name": "Garden tomato",
                    "slug": "solanum-lycopersicum",
                    "scientific_name": "Solanum lycopersicum"
                }],
                "links": {},
                "meta": { "total": 1 }
            }),
            "species/263319" | "species/solanum-lycopersicum" => json!({
                "data": {
                    "id": 263_319,
                    "common_name": "Garden tomato",
                    "slug": "solanum-lycopersicum",
                    "scientific_name": "Solanum lycopersicum",
                    "family": "Solanaceae",
                    "genus": "Solanum",
                    "edible": true,
                    "edible_part": ["fruits"],
                    "growth": { "light": 8, "soil_humidity": 6, "days_to_harvest": 70 }
                },
                "meta": {}
            }),
            _ => return Ok(RawResponse::new(404, r#"{"error":true,"message":"Not found"}"#)),
        };
        Ok(RawResponse::new(200, body.to_string()))
    }
}

const MESSAGE: &str = "my tomato plant has yellow leaves";
const NO_HISTORY: &[&str] = &[];

#[test]
fn test_tomato_mention_is_high_confidence_common_name() {
    let mentions = extract_mentions(MESSAGE, &[]);
    let tomato = mentions
        .iter()
        .find(|m| m.normalized_name == "tomato")
        .expect("tomato mention");
    assert_eq!(tomato.confidence, Confidence::High);
    assert_eq!(tomato.source, MentionSource::CommonName);

    let json = serde_json::to_value(tomato).unwrap();
    assert_eq!(json["normalizedName"], "tomato");
    assert_eq!(json["confidence"], "high");
    assert_eq!(json["source"], "common_name");
}

#[tokio::test]
async fn test_tomato_resolves_once_then_served_from_cache() {
    let api = Arc::new(StubPlantApi::default());
    let knowledge = PlantKnowledge::builder()
        .transport(api.clone())
        .build()
        .unwrap();
    let registry = knowledge.new_conversation();

    let ctx = knowledge.plant_context(MESSAGE, NO_HISTORY, &registry).await;
    assert!(ctx.plant_related);
    assert_eq!(ctx.records.len(), 1);
    assert_eq!(ctx.records[0].scientific_name, "Solanum lycopersicum");
    assert!(ctx.narrative.contains("Full sun"));
    let after_first = api.calls();
    assert!(after_first > 0);

    let again = knowledge.plant_context(MESSAGE, NO_HISTORY, &registry).await;
    assert_eq!(again.records.len(), 1);
    assert_eq!(api.calls(), after_first, "repeat within ttl must not hit the API");
}

#[tokio::test]
async fn test_caches_are_shared_across_conversations() {
    let api = Arc::new(StubPlantApi::default());
    let knowledge = PlantKnowledge::builder()
        .transport(api.clone())
        .build()
        .unwrap();

    let first = knowledge.new_conversation();
    knowledge.plant_context(MESSAGE, NO_HISTORY, &first).await;
    let calls = api.calls();

    let second = knowledge.new_conversation();
    assert!(second.is_empty());
    let ctx = knowledge.plant_context(MESSAGE, NO_HISTORY, &second).await;
    assert_eq!(ctx.records.len(), 1);
    assert_eq!(api.calls(), calls);
    assert!(second.contains_key("garden tomato"));
}

#[tokio::test]
async fn test_registry_known_plant_matches_exactly_in_follow_up() {
    let api = Arc::new(StubPlantApi::default());
    let knowledge = PlantKnowledge::builder()
        .transport(api.clone())
        .build()
        .unwrap();
    let registry = knowledge.new_conversation();
    knowledge.plant_context(MESSAGE, NO_HISTORY, &registry).await;

    let follow_up = "how long until Solanum lycopersicum fruits?";
    let mentions = knowledge.analyze(follow_up, &[MESSAGE], &registry);
    assert_eq!(mentions[0].source, MentionSource::ExactMatch);
    assert_eq!(mentions[0].confidence, Confidence::High);
}
