//! Plant mention extraction from free-form conversational text.
//!
//! Three passes run over the input and are merged in priority order; the
//! earliest pass wins when two passes produce the same normalized name:
//!
//! 1. Registry pass: names of profiles already resolved in the conversation.
//! 2. Vocabulary pass: curated static plant names, matched as whole words.
//! 3. Pattern pass: linguistic templates scored by a confidence heuristic.
//!
//! Extraction never fails. Text without plant mentions yields an empty list.

pub mod patterns;
pub mod vocabulary;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::profile::PlantProfile;

use self::patterns::{PatternCandidate, PatternKind};

pub use self::vocabulary::{is_known_plant_name, PLANT_NAMES};

/// Genus names this short or shorter are too ambiguous to match on their own.
const MIN_GENUS_LEN: usize = 4;
const MIN_CANDIDATE_LEN: usize = 3;
const MAX_CANDIDATE_LEN: usize = 30;
/// Bytes on each side of a pattern match searched for context keywords.
const CONTEXT_WINDOW_BYTES: usize = 50;

/// How certain the extractor is. Ordered most certain first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Which pass produced a mention. Ordered by tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionSource {
    /// Matched a profile already known to the conversation registry.
    ExactMatch,
    /// Matched the static vocabulary.
    CommonName,
    /// Captured by a linguistic template.
    Pattern,
    /// Carried over from earlier conversation history.
    Context,
}

/// A candidate plant name found in text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantMention {
    /// The text as it appeared in the input.
    pub original_text: String,
    /// Lowercased, trimmed, whitespace-collapsed identity key.
    pub normalized_name: String,
    pub confidence: Confidence,
    pub source: MentionSource,
}

impl PlantMention {
    fn new(original: &str, confidence: Confidence, source: MentionSource) -> Self {
        Self {
            original_text: original.trim().to_string(),
            normalized_name: normalize_name(original),
            confidence,
            source,
        }
    }
}

/// Lowercase, trim, and collapse internal whitespace to single spaces.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Cheap pre-filter: does the text talk about plants at all?
pub fn is_plant_related_query(text: &str) -> bool {
    vocabulary::mentions_plant_keyword(text)
}

/// Extract ranked, deduplicated plant mentions from `text`.
///
/// `known` holds profiles already resolved in the conversation; pass an
/// empty slice when there is no registry. Output is sorted most confident
/// first; equal confidence keeps registry and vocabulary hits ahead of
/// pattern hits, then discovery order.
pub fn extract_mentions(text: &str, known: &[Arc<PlantProfile>]) -> Vec<PlantMention> {
    let mut seen = HashSet::new();
    let mut mentions = Vec::new();
    let mut push = |mention: PlantMention| {
        if !mention.normalized_name.is_empty() && seen.insert(mention.normalized_name.clone()) {
            mentions.push(mention);
        }
    };

    for mention in registry_pass(text, known) {
        push(mention);
    }
    for mention in vocabulary_pass(text) {
        push(mention);
    }
    for mention in pattern_pass(text) {
        push(mention);
    }

    mentions.sort_by_key(|m| (m.confidence, m.source));
    mentions
}

/// Collect unique mentions from history, newest message first, stopping at `limit`.
pub fn extract_mentions_from_history<S: AsRef<str>>(
    messages: &[S],
    limit: usize,
    known: &[Arc<PlantProfile>],
) -> Vec<PlantMention> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    if limit == 0 {
        return out;
    }
    for message in messages.iter().rev() {
        for mention in extract_mentions(message.as_ref(), known) {
            if seen.insert(mention.normalized_name.clone()) {
                out.push(mention);
                if out.len() >= limit {
                    return out;
                }
            }
        }
    }
    out
}

fn registry_pass(text: &str, known: &[Arc<PlantProfile>]) -> Vec<PlantMention> {
    if known.is_empty() {
        return Vec::new();
    }
    let lowered = text.to_lowercase();
    let mut out = Vec::new();

    for profile in known {
        let common = profile.common_name.as_deref().map(normalize_name);
        let scientific = normalize_name(&profile.scientific_name);
        let genus = normalize_name(&profile.genus);

        let hit = common
            .iter()
            .chain(std::iter::once(&scientific))
            .find_map(|name| as_written(text, &lowered, name))
            .map(|found| (found, Confidence::High));
        let hit = hit.or_else(|| {
            (genus.len() >= MIN_GENUS_LEN)
                .then(|| as_written(text, &lowered, &genus))
                .flatten()
                .map(|found| (found, Confidence::Medium))
        });
        if let Some((found, confidence)) = hit {
            out.push(PlantMention::new(found, confidence, MentionSource::ExactMatch));
        }
    }
    out
}

/// Locate `needle` (already lowercased) in `text` and return it as written.
///
/// Falls back to `needle` when lowercasing changed byte offsets.
fn as_written<'a>(text: &'a str, lowered: &str, needle: &'a str) -> Option<&'a str> {
    if needle.is_empty() {
        return None;
    }
    let start = lowered.find(needle)?;
    let end = start + needle.len();
    if lowered.len() == text.len() && text.is_char_boundary(start) && text.is_char_boundary(end) {
        Some(&text[start..end])
    } else {
        Some(needle)
    }
}

fn vocabulary_pass(text: &str) -> Vec<PlantMention> {
    vocabulary::find_vocabulary_names(text)
        .into_iter()
        .map(|hit| {
            PlantMention::new(
                &text[hit.start..hit.end],
                Confidence::High,
                MentionSource::CommonName,
            )
        })
        .collect()
}

fn pattern_pass(text: &str) -> Vec<PlantMention> {
    let lowered = text.to_ascii_lowercase();
    patterns::find_candidates(text)
        .into_iter()
        .filter_map(|candidate| {
            let normalized = normalize_name(&candidate.text);
            if !is_acceptable_candidate(&normalized, candidate.kind) {
                return None;
            }
            let confidence = score_candidate(&normalized, &candidate, &lowered);
            if confidence == Confidence::Low && !is_known_plant_name(&normalized) {
                return None;
            }
            Some(PlantMention::new(
                &candidate.text,
                confidence,
                MentionSource::Pattern,
            ))
        })
        .collect()
}

fn is_acceptable_candidate(normalized: &str, kind: PatternKind) -> bool {
    let len = normalized.chars().count();
    if !(MIN_CANDIDATE_LEN..=MAX_CANDIDATE_LEN).contains(&len) {
        return false;
    }
    if vocabulary::is_stopword(normalized) {
        return false;
    }
    let mut words = normalized.split(' ');
    match kind {
        // "The plant", "This morning": a stopword genus is never a binomial
        PatternKind::Binomial => words.next().is_some_and(|w| !vocabulary::is_stopword(w)),
        _ => !words.all(vocabulary::is_stopword),
    }
}

/// Binomial shape or vocabulary membership is high; plant-care vocabulary
/// near the match is medium; anything else is low. The template's own
/// words (a care verb, say) never count as context.
fn score_candidate(normalized: &str, candidate: &PatternCandidate, lowered: &str) -> Confidence {
    if candidate.kind == PatternKind::Binomial || is_known_plant_name(normalized) {
        return Confidence::High;
    }
    let (before, after) = context_windows(lowered, candidate.start, candidate.end);
    if vocabulary::has_context_keyword(before) || vocabulary::has_context_keyword(after) {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Text on either side of `start..end`, up to `CONTEXT_WINDOW_BYTES` each.
fn context_windows(text: &str, start: usize, end: usize) -> (&str, &str) {
    let mut lo = start.saturating_sub(CONTEXT_WINDOW_BYTES);
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (end + CONTEXT_WINDOW_BYTES).min(text.len());
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }
    (&text[lo..start], &text[end..hi])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_support::profile;

    fn names(mentions: &[PlantMention]) -> Vec<&str> {
        mentions.iter().map(|m| m.normalized_name.as_str()).collect()
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Cherry   Tomato \t"), "cherry tomato");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_tomato_scenario() {
        let mentions = extract_mentions("my tomato plant has yellow leaves", &[]);
        let tomato = mentions
            .iter()
            .find(|m| m.normalized_name == "tomato")
            .expect("tomato mention");
        assert_eq!(tomato.confidence, Confidence::High);
        assert_eq!(tomato.source, MentionSource::CommonName);
        assert_eq!(mentions[0].normalized_name, "tomato");
    }

    #[test]
    fn test_vocabulary_name_is_high_confidence() {
        for text in ["I love lavender.", "Lavender", "is (lavender) ok"] {
            let mentions = extract_mentions(text, &[]);
            let m = mentions
                .iter()
                .find(|m| m.normalized_name == "lavender")
                .unwrap_or_else(|| panic!("no lavender in {text:?}"));
            assert_eq!(m.confidence, Confidence::High);
        }
    }

    #[test]
    fn test_no_duplicate_names_across_passes() {
        // tomato hits vocabulary, possessive, and classifier templates
        let mentions = extract_mentions("My tomato plant and the tomato plant next door", &[]);
        let mut seen = HashSet::new();
        for m in &mentions {
            assert!(seen.insert(&m.normalized_name), "dup {}", m.normalized_name);
        }
    }

    #[test]
    fn test_sorted_by_confidence() {
        let mentions = extract_mentions(
            "I need to water my alocasia, and Ficus lyrata looks great next to the basil",
            &[],
        );
        assert!(!mentions.is_empty());
        for pair in mentions.windows(2) {
            assert!(pair[0].confidence <= pair[1].confidence, "{mentions:?}");
        }
    }

    #[test]
    fn test_pattern_with_context_is_medium() {
        let mentions = extract_mentions("the leaves are curling, how often should I water my alocasia", &[]);
        let m = mentions
            .iter()
            .find(|m| m.normalized_name == "alocasia")
            .expect("alocasia");
        assert_eq!(m.confidence, Confidence::Medium);
        assert_eq!(m.source, MentionSource::Pattern);
    }

    #[test]
    fn test_low_confidence_pattern_discarded() {
        // classifier template fires on "family tree" but nothing plant-like is nearby
        let mentions = extract_mentions("we drew a family tree at school", &[]);
        assert!(!names(&mentions).contains(&"family"), "{mentions:?}");
    }

    #[test]
    fn test_care_verb_alone_is_not_context() {
        let text = "I grow tired of meetings";
        assert!(extract_mentions(text, &[]).is_empty());

        let mentions = extract_mentions("I grow tired of watering", &[]);
        let m = mentions
            .iter()
            .find(|m| m.normalized_name == "tired")
            .expect("context from the rest of the sentence");
        assert_eq!(m.confidence, Confidence::Medium);
    }

    #[test]
    fn test_subject_classifier_word_not_duplicated() {
        let mentions = extract_mentions("the tomato plant is wilting", &[]);
        assert_eq!(names(&mentions), vec!["tomato"]);
        assert_eq!(mentions[0].source, MentionSource::CommonName);
    }

    #[test]
    fn test_binomial_is_high_confidence() {
        let mentions = extract_mentions("Is Ficus lyrata toxic to cats?", &[]);
        let m = mentions
            .iter()
            .find(|m| m.normalized_name == "ficus lyrata")
            .expect("binomial");
        assert_eq!(m.confidence, Confidence::High);
        assert_eq!(m.original_text, "Ficus lyrata");
    }

    #[test]
    fn test_stopword_candidates_rejected() {
        let mentions = extract_mentions("The plant is fine and my new plant too", &[]);
        let found = names(&mentions);
        assert!(!found.contains(&"the plant"), "{found:?}");
        assert!(!found.contains(&"new"), "{found:?}");
    }

    #[test]
    fn test_registry_pass_wins_and_ranks_first() {
        let known = vec![Arc::new(profile(1, "Solanum lycopersicum", Some("Tomato")))];
        let mentions = extract_mentions("my tomato plant", &known);
        assert_eq!(mentions[0].normalized_name, "tomato");
        assert_eq!(mentions[0].source, MentionSource::ExactMatch);
        assert_eq!(mentions[0].confidence, Confidence::High);
    }

    #[test]
    fn test_registry_mention_keeps_text_as_written() {
        let known = vec![Arc::new(profile(1, "Solanum lycopersicum", Some("Garden tomato")))];
        let mentions = extract_mentions("My Garden Tomato is wilting", &known);
        assert_eq!(mentions[0].normalized_name, "garden tomato");
        assert_eq!(mentions[0].original_text, "Garden Tomato");

        let mentions = extract_mentions("is SOLANUM Lycopersicum hardy?", &known);
        assert_eq!(mentions[0].original_text, "SOLANUM Lycopersicum");
    }

    #[test]
    fn test_registry_scientific_name_match() {
        let known = vec![Arc::new(profile(7, "Monstera deliciosa", Some("Swiss cheese plant")))];
        let mentions = extract_mentions("is monstera deliciosa easy?", &known);
        assert!(mentions.iter().any(|m| m.normalized_name == "monstera deliciosa"
            && m.source == MentionSource::ExactMatch));
    }

    #[test]
    fn test_registry_genus_only_is_medium() {
        let known = vec![Arc::new(profile(9, "Ficus elastica", Some("Rubber fig")))];
        let mentions = extract_mentions("all my ficus are dropping things", &known);
        let m = mentions
            .iter()
            .find(|m| m.normalized_name == "ficus")
            .expect("genus mention");
        assert_eq!(m.confidence, Confidence::Medium);
        assert_eq!(m.source, MentionSource::ExactMatch);
    }

    #[test]
    fn test_short_genus_ignored() {
        let known = vec![Arc::new(profile(3, "Poa annua", Some("Annual bluegrass")))];
        let mentions = extract_mentions("a poa of sorts", &known);
        assert!(!names(&mentions).contains(&"poa"));
    }

    #[test]
    fn test_empty_and_unrelated_text() {
        assert!(extract_mentions("", &[]).is_empty());
        assert!(extract_mentions("see you at noon tomorrow", &[]).is_empty());
    }

    #[test]
    fn test_history_newest_first_and_limited() {
        let history = vec![
            "I planted basil last week",
            "the rosemary is doing great",
            "what about my lavender?",
        ];
        let mentions = extract_mentions_from_history(&history, 2, &[]);
        assert_eq!(names(&mentions), vec!["lavender", "rosemary"]);
    }

    #[test]
    fn test_history_dedupes_across_messages() {
        let history = vec!["mint is great", "more mint please"];
        let mentions = extract_mentions_from_history(&history, 10, &[]);
        assert_eq!(names(&mentions), vec!["mint"]);
    }

    #[test]
    fn test_history_zero_limit() {
        let history = vec!["basil"];
        assert!(extract_mentions_from_history(&history, 0, &[]).is_empty());
    }

    #[test]
    fn test_is_plant_related_query() {
        assert!(is_plant_related_query("my tomato plant has yellow leaves"));
        assert!(is_plant_related_query("When should I repot?"));
        assert!(!is_plant_related_query("send 5 tokens to alice"));
    }

    #[test]
    fn test_mention_serializes_snake_case_enums() {
        let m = PlantMention::new("Tomato", Confidence::High, MentionSource::CommonName);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["normalizedName"], "tomato");
        assert_eq!(json["confidence"], "high");
        assert_eq!(json["source"], "common_name");
    }
}
