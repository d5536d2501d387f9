//! Deterministic rule matching used when the model can't decide.
//!
//! Order: exact tag match on every hint, then partial tag match on any hint,
//! then keyword scoring, then the namespace default.

use docroute_core::catalog::{Catalog, CatalogEntry, normalize_key};

/// Words too common to say anything about which document fits.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "how", "what", "with", "can", "does", "use", "using", "into", "from",
    "this", "that", "are", "you", "your", "about", "should", "which", "want", "need", "set",
    "get", "have", "when", "where", "why", "who", "will", "would", "could", "there", "their",
    "any", "all", "our", "its", "but", "not", "way",
];

/// The ultimate single-best fallback for a namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DefaultChoice {
    /// A designated overview document
    Id(String),
    /// Whatever entry comes first in discovery order
    First,
    /// No default; exhausting the rules is an empty selection
    #[default]
    None,
}

impl DefaultChoice {
    pub fn from_config(default_document: Option<&str>, default_to_first: bool) -> Self {
        match default_document {
            Some(id) if !id.trim().is_empty() => DefaultChoice::Id(id.trim().to_string()),
            _ if default_to_first => DefaultChoice::First,
            _ => DefaultChoice::None,
        }
    }
}

/// Which rule produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMatch {
    Exact,
    Partial,
    Keyword { score: u32 },
    Default,
}

impl std::fmt::Display for RuleMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleMatch::Exact => write!(f, "exact tag match"),
            RuleMatch::Partial => write!(f, "partial tag match"),
            RuleMatch::Keyword { score } => write!(f, "keyword match (score {score})"),
            RuleMatch::Default => write!(f, "namespace default"),
        }
    }
}

/// Pick one entry by rules alone.
pub fn resolve<'a>(
    catalog: &'a Catalog,
    hints: &[String],
    query: &str,
    default: &DefaultChoice,
) -> Option<(&'a CatalogEntry, RuleMatch)> {
    let hints: Vec<String> = hints
        .iter()
        .map(|h| normalize_key(h))
        .filter(|h| !h.is_empty())
        .collect();

    if !hints.is_empty()
        && let Some(entry) = catalog
            .entries()
            .iter()
            .find(|e| hints.iter().all(|h| has_tag(e, h)))
    {
        return Some((entry, RuleMatch::Exact));
    }

    // Earlier hints carry more weight (e.g. method before platform)
    for hint in &hints {
        if let Some(entry) = catalog.entries().iter().find(|e| has_tag(e, hint)) {
            return Some((entry, RuleMatch::Partial));
        }
    }

    let terms = keywords(hints.iter().map(String::as_str).chain(std::iter::once(query)));
    if !terms.is_empty() {
        let mut best: Option<(&CatalogEntry, u32)> = None;
        for entry in catalog.entries() {
            let score = score(entry, &terms);
            if score > 0 && best.is_none_or(|(_, top)| score > top) {
                best = Some((entry, score));
            }
        }
        if let Some((entry, score)) = best {
            return Some((entry, RuleMatch::Keyword { score }));
        }
    }

    let fallback = match default {
        DefaultChoice::Id(id) => catalog.find(id),
        DefaultChoice::First => catalog.entries().first(),
        DefaultChoice::None => None,
    };
    fallback.map(|entry| (entry, RuleMatch::Default))
}

fn has_tag(entry: &CatalogEntry, hint: &str) -> bool {
    entry.tags.iter().any(|t| t.eq_ignore_ascii_case(hint))
}

/// Lowercased terms of three or more characters, minus stop-words, deduplicated.
fn keywords<'a>(texts: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for text in texts {
        for word in text.split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '.')) {
            let word = word.trim_matches(|c| c == '-' || c == '.').to_lowercase();
            if word.chars().count() >= 3 && !STOP_WORDS.contains(&word.as_str()) && !terms.contains(&word) {
                terms.push(word);
            }
        }
    }
    terms
}

fn score(entry: &CatalogEntry, terms: &[String]) -> u32 {
    let id = entry.id.to_lowercase();
    let description = entry.description.to_lowercase();
    terms
        .iter()
        .map(|term| {
            let mut points = 0;
            if entry.tags.iter().any(|t| t.eq_ignore_ascii_case(term)) {
                points += 2;
            }
            if id.contains(term.as_str()) {
                points += 1;
            }
            if description.contains(term.as_str()) {
                points += 1;
            }
            points
        })
        .sum()
}
