//! Lightweight linguistic templates for spotting plant names the vocabulary misses.

use once_cell::sync::Lazy;
use regex::Regex;

/// Which template produced a candidate. Binomials get special scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// "my <candidate> plant"
    Possessive,
    /// "the <candidate> is/needs/has ..."
    Subject,
    /// "<candidate> plant/tree/bush"
    Classifier,
    /// "grow/water/prune/propagate <candidate>"
    CareVerb,
    /// "Genus species"
    Binomial,
}

/// A raw candidate captured by one of the templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternCandidate {
    pub text: String,
    pub kind: PatternKind,
    /// Byte span of the whole template match in the input.
    pub start: usize,
    pub end: usize,
}

static TEMPLATES: Lazy<Vec<(PatternKind, Regex)>> = Lazy::new(|| {
    vec![
        (
            PatternKind::Possessive,
            Regex::new(r"(?i)\bmy\s+([a-z]+(?:[\s-][a-z]+)?)\s+plants?\b").unwrap(),
        ),
        (
            PatternKind::Subject,
            Regex::new(
                r"(?i)\bthe\s+([a-z]+(?:\s[a-z]+)?)\s+(?:is|are|needs|need|has|have|looks|seems|keeps)\b",
            )
            .unwrap(),
        ),
        (
            PatternKind::Classifier,
            Regex::new(r"(?i)\b([a-z]+)\s+(?:plants?|trees?|bush(?:es)?|shrubs?|vines?|seedlings?)\b")
                .unwrap(),
        ),
        (
            PatternKind::CareVerb,
            Regex::new(
                r"(?i)\b(?:grow|growing|grew|water|watering|prune|pruning|propagate|propagating|repot|repotting|fertilize|fertilizing)\s+(?:my\s+|the\s+|a\s+|an\s+|some\s+|our\s+)?([a-z]+)\b",
            )
            .unwrap(),
        ),
        (
            PatternKind::Binomial,
            Regex::new(r"\b([A-Z][a-z]{2,}\s[a-z]{3,})\b").unwrap(),
        ),
    ]
});

/// Trailing words that classify a plant rather than name it.
const CLASSIFIER_WORDS: &[&str] = &[
    "plant", "plants", "tree", "trees", "bush", "bushes", "shrub", "shrubs", "vine", "vines",
    "seedling", "seedlings",
];

/// Run every template over `text`, returning candidates in template order.
pub fn find_candidates(text: &str) -> Vec<PatternCandidate> {
    let mut out = Vec::new();
    for (kind, re) in TEMPLATES.iter() {
        for caps in re.captures_iter(text) {
            let (Some(whole), Some(cand)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push(PatternCandidate {
                text: strip_classifier(cand.as_str()).to_string(),
                kind: *kind,
                start: whole.start(),
                end: whole.end(),
            });
        }
    }
    out
}

/// "tomato plant" → "tomato". A lone classifier word is left as is.
fn strip_classifier(candidate: &str) -> &str {
    match candidate.rsplit_once(char::is_whitespace) {
        Some((head, last))
            if !head.trim().is_empty()
                && CLASSIFIER_WORDS.contains(&last.to_ascii_lowercase().as_str()) =>
        {
            head.trim_end()
        }
        _ => candidate,
    }
}
