use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::types::ExtractedParameters;

/// Destinations recognised without a language model, longest first so that
/// "lake como" wins over "como".
const LOCATIONS: &[&str] = &[
    "amsterdam",
    "barcelona",
    "lake como",
    "santorini",
    "florence",
    "thailand",
    "tuscany",
    "mykonos",
    "france",
    "greece",
    "london",
    "berlin",
    "vienna",
    "prague",
    "madrid",
    "venice",
    "italy",
    "spain",
    "paris",
    "milan",
    "rome",
    "como",
    "bali",
];

/// Preference tag and the phrases that imply it.
pub(crate) const PREFERENCE_KEYWORDS: &[(&str, &[&str])] = &[
    ("romantic", &["romantic", "romance", "couple", "couples", "honeymoon"]),
    ("family", &["family", "family-friendly", "kids", "children"]),
    ("luxury", &["luxury", "luxurious", "premium", "5-star", "five star"]),
    ("beach", &["beach", "seaside", "coastal", "coast", "ocean"]),
    ("business", &["business", "corporate", "conference"]),
    ("pet", &["pet", "pets", "pet-friendly", "dog", "dogs"]),
    ("mountain", &["mountain", "mountains", "alpine", "ski"]),
    ("spa", &["spa", "wellness", "massage"]),
    ("pool", &["pool", "swimming"]),
    ("city", &["city", "urban", "downtown"]),
    ("budget", &["budget", "cheap", "affordable", "economy"]),
];

const AMOUNT: &str = r"(\d+(?:\.\d+)?)";

// Checked in order; the first pattern that matches sets the budget.
static BUDGET_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let patterns = [
        format!(r"\bunder\s+€?\s*{AMOUNT}"),
        format!(r"\bbelow\s+€?\s*{AMOUNT}"),
        format!(r"\bless\s+than\s+€?\s*{AMOUNT}"),
        format!(r"\bup\s+to\s+€?\s*{AMOUNT}"),
        format!(r"\bmax\s+€?\s*{AMOUNT}"),
        format!(r"\bmaximum\s+€?\s*{AMOUNT}"),
        format!(r"{AMOUNT}\s*€"),
        format!(r"€\s*{AMOUNT}"),
        format!(r"{AMOUNT}\s*eur\b"),
        format!(r"{AMOUNT}\s*euros?\b"),
    ];
    compile(&patterns)
});

static ADULTS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(&[r"(\d+)\s*adults?\b"]));
static CHILDREN: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"(\d+)\s*(?:children|child|kids?)\b"]));
static ROOMS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(&[r"(\d+)\s*rooms?\b"]));

fn compile<S: AsRef<str>>(patterns: &[S]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern.as_ref()) {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::error!(pattern = pattern.as_ref(), error = %err, "invalid extraction pattern");
                None
            }
        })
        .collect()
}

/// Keyword and pattern based extraction. Pure and infallible.
pub fn extract_parameters(demand: &str) -> ExtractedParameters {
    let text = demand.to_lowercase();
    let defaults = ExtractedParameters::default();

    ExtractedParameters {
        location: find_location(&text),
        budget_max: find_budget(&text),
        adults: find_count(&ADULTS, &text)
            .map(|n| n.max(1))
            .unwrap_or(defaults.adults),
        children: find_count(&CHILDREN, &text).unwrap_or(defaults.children),
        rooms: find_count(&ROOMS, &text)
            .map(|n| n.max(1))
            .unwrap_or(defaults.rooms),
        preferences: find_preferences(&text),
        ..defaults
    }
}

fn find_location(text: &str) -> Option<String> {
    LOCATIONS
        .iter()
        .find(|name| text.contains(**name))
        .map(|name| title_case(name))
}

fn find_budget(text: &str) -> Option<f64> {
    BUDGET_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|amount| amount.as_str().parse::<f64>().ok())
    })
}

fn find_count(patterns: &[Regex], text: &str) -> Option<u32> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|count| count.as_str().parse().ok())
    })
}

fn find_preferences(text: &str) -> BTreeSet<String> {
    PREFERENCE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| contains_word(text, kw)))
        .map(|(tag, _)| tag.to_string())
        .collect()
}

/// Substring match that does not start or end inside a word, so `spa`
/// does not fire on `spain`.
pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let end = start + matched.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
