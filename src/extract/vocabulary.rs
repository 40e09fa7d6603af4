//! Static word lists used by the mention extractor.
//!
//! All entries are lowercase ASCII so byte offsets found in an
//! ASCII-lowercased copy of the input line up with the original text.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use once_cell::sync::Lazy;

/// Curated common names of plants, herbs, vegetables, fruits, flowers, trees and shrubs.
pub const PLANT_NAMES: &[&str] = &[
    // Houseplants
    "monstera", "pothos", "golden pothos", "philodendron", "snake plant", "spider plant",
    "peace lily", "zz plant", "rubber plant", "fiddle leaf fig", "aloe vera", "aloe",
    "jade plant", "string of pearls", "chinese evergreen", "dracaena", "calathea",
    "prayer plant", "boston fern", "bird of paradise", "parlor palm", "areca palm",
    "money tree", "swiss cheese plant", "english ivy", "anthurium", "begonia",
    "african violet", "christmas cactus", "cactus", "succulent", "echeveria", "haworthia",
    "hoya", "peperomia", "croton", "dieffenbachia", "schefflera", "yucca", "bromeliad",
    "air plant", "venus flytrap", "pitcher plant",
    // Herbs
    "basil", "sweet basil", "thai basil", "mint", "peppermint", "spearmint", "rosemary",
    "thyme", "oregano", "parsley", "cilantro", "coriander", "dill", "sage", "chives",
    "lemongrass", "lemon balm", "tarragon", "fennel", "chamomile", "bay laurel", "marjoram",
    "catnip", "stevia",
    // Vegetables
    "tomato", "cherry tomato", "potato", "sweet potato", "carrot", "lettuce", "spinach",
    "kale", "cabbage", "broccoli", "cauliflower", "brussels sprouts", "cucumber",
    "zucchini", "squash", "butternut squash", "pumpkin", "pepper", "bell pepper",
    "chili pepper", "jalapeno", "eggplant", "onion", "garlic", "leek", "shallot", "pea",
    "snap pea", "green bean", "bean", "corn", "sweet corn", "radish", "beet", "turnip",
    "celery", "asparagus", "artichoke", "okra", "swiss chard", "arugula", "bok choy",
    "rhubarb", "horseradish", "ginger", "turmeric",
    // Fruits
    "strawberry", "blueberry", "raspberry", "blackberry", "gooseberry", "grape", "apple",
    "pear", "peach", "plum", "cherry", "apricot", "lemon", "lime", "orange", "grapefruit",
    "fig", "olive", "avocado", "mango", "banana", "pineapple", "papaya", "passion fruit",
    "kiwi", "pomegranate", "watermelon", "cantaloupe", "melon",
    // Flowers
    "rose", "tulip", "daffodil", "sunflower", "lavender", "lily", "orchid", "daisy",
    "marigold", "petunia", "geranium", "hydrangea", "peony", "dahlia", "zinnia",
    "chrysanthemum", "carnation", "iris", "poppy", "snapdragon", "pansy", "violet",
    "camellia", "gardenia", "jasmine", "hibiscus", "magnolia", "lilac", "foxglove",
    "lupine", "aster", "cosmos", "nasturtium", "morning glory", "black-eyed susan",
    "coneflower", "echinacea", "bleeding heart", "hosta", "fuchsia", "impatiens",
    "clematis", "wisteria", "bougainvillea", "honeysuckle", "sweet pea", "crocus",
    "hyacinth", "gladiolus",
    // Trees
    "oak", "maple", "japanese maple", "birch", "pine", "spruce", "fir", "cedar", "willow",
    "weeping willow", "elm", "ash", "beech", "redwood", "sequoia", "cypress", "juniper",
    "eucalyptus", "palm", "ginkgo", "dogwood", "cherry blossom", "sycamore", "poplar",
    "aspen", "chestnut", "walnut", "hickory", "linden", "hawthorn", "bonsai",
    // Shrubs and others
    "boxwood", "azalea", "rhododendron", "holly", "privet", "forsythia", "barberry",
    "viburnum", "spirea", "butterfly bush", "bamboo", "ivy", "fern", "moss", "clover",
];

/// Words that mark a message as gardening-related.
pub const PLANT_KEYWORDS: &[&str] = &[
    "plant", "garden", "grow", "seed", "soil", "leaf", "leaves", "flower", "bloom",
    "root", "prune", "repot", "fertiliz", "compost", "harvest", "propagat", "sprout",
    "seedling", "germinat", "houseplant", "succulent", "watering", "mulch", "potting",
    "botanical", "species", "foliage", "perennial", "annual", "shrub", "herb",
];

/// Keywords whose presence near a pattern match raises its confidence to medium.
pub const CONTEXT_KEYWORDS: &[&str] = &[
    "grow", "garden", "leaf", "leaves", "bloom", "flower", "repot", "soil", "water",
    "prune", "seed", "root", "sun", "light", "fertiliz", "pot", "compost", "harvest",
    "propagat", "wilt", "yellow", "brown", "droop",
];

/// Candidates the pattern pass must never report.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "my", "your", "our", "their", "his", "her", "its", "this", "that",
    "these", "those", "it", "they", "them", "i", "you", "we", "he", "she", "and", "or",
    "but", "if", "then", "when", "where", "why", "how", "what", "which", "who", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "can", "may", "might", "must", "not", "so", "very",
    "really", "too", "also", "just", "still", "always", "never", "some", "any", "all",
    "each", "every", "both", "few", "more", "most", "much", "many", "such", "only",
    "there", "here", "now", "today", "again", "once", "well", "good", "bad", "new", "old",
    "big", "small", "little", "tall", "young", "dead", "dying", "sick", "other", "same",
    "first", "whole", "entire", "baby", "potted", "favorite", "favourite", "own", "one",
    "plant", "plants", "tree", "trees", "bush", "shrub", "flower", "flowers", "house",
    "indoor", "outdoor", "garden", "soil", "water", "pot", "leaf", "leaves", "seed",
    "seeds", "root", "roots", "sun", "thing", "stuff", "something", "everything", "in",
    "on", "at", "to", "for", "of", "with", "from", "by", "up", "out", "off", "over",
    "under", "into", "about", "because", "please", "thanks", "hello", "hi", "help",
    "green", "yellow", "brown", "them", "him", "me", "us", "lot", "lots", "bit", "way",
];

/// Static names sorted longest first; automaton pattern ids index into this list.
pub(crate) static NAMES_LONGEST_FIRST: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut names: Vec<&'static str> = PLANT_NAMES.to_vec();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    names.dedup();
    names
});

static NAME_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasickBuilder::new()
        .match_kind(MatchKind::Standard)
        .build(NAMES_LONGEST_FIRST.iter())
        .expect("static plant vocabulary is a valid automaton")
});

static KEYWORD_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(PLANT_KEYWORDS).expect("static keyword list is a valid automaton")
});

static CONTEXT_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(CONTEXT_KEYWORDS).expect("static context list is a valid automaton")
});

/// A vocabulary hit: the canonical name and its byte span in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyHit {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
}

/// True when `name` is in the curated vocabulary (expects normalized input).
pub fn is_known_plant_name(name: &str) -> bool {
    NAMES_LONGEST_FIRST.binary_search_by(|entry| {
        name.len().cmp(&entry.len()).then_with(|| (*entry).cmp(name))
    })
    .is_ok()
}

/// True when `word` may not be reported as a plant candidate.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Find every vocabulary name occurring in `text` as a whole word.
///
/// Returns the first occurrence of each distinct name, ordered longest name
/// first so "cherry tomato" is reported ahead of "tomato".
pub fn find_vocabulary_names(text: &str) -> Vec<VocabularyHit> {
    let lowered = text.to_ascii_lowercase();
    let bytes = lowered.as_bytes();
    let mut first_hit: Vec<Option<(usize, usize)>> = vec![None; NAMES_LONGEST_FIRST.len()];

    for m in NAME_MATCHER.find_overlapping_iter(&lowered) {
        let idx = m.pattern().as_usize();
        if first_hit[idx].is_some() {
            continue;
        }
        if is_word_boundary(bytes, m.start(), m.end()) {
            first_hit[idx] = Some((m.start(), m.end()));
        }
    }

    first_hit
        .into_iter()
        .enumerate()
        .filter_map(|(idx, span)| {
            span.map(|(start, end)| VocabularyHit {
                name: NAMES_LONGEST_FIRST[idx],
                start,
                end,
            })
        })
        .collect()
}

/// True when `text` contains any plant keyword or vocabulary name.
pub fn mentions_plant_keyword(text: &str) -> bool {
    let lowered = text.to_ascii_lowercase();
    KEYWORD_MATCHER.is_match(&lowered) || !find_vocabulary_names(&lowered).is_empty()
}

/// True when a context keyword occurs inside `window` (already lowercased).
pub fn has_context_keyword(window: &str) -> bool {
    CONTEXT_MATCHER.is_match(window)
}

fn is_word_boundary(bytes: &[u8], start: usize, end: usize) -> bool {
    let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
    let after_ok = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
    before_ok && after_ok
}
