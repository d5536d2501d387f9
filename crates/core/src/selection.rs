//! Selection request/response and resolved-content value objects.
//!
//! These are created per call and never persisted.

use serde::{Deserialize, Serialize};
use crate::catalog::Namespace;

/// How many identifiers the model may choose, and what happens when it can't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Exactly one decisive result; falls back to rule matching.
    SingleBest,
    /// 0..N ranked results; an empty answer is a legitimate outcome.
    BestOfN,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionRequest {
    /// The caller's natural-language query
    pub query: String,

    /// Which catalog to select from
    pub namespace: Namespace,

    /// Upper bound on accepted identifiers
    pub max_results: usize,

    pub mode: SelectionMode,

    /// Structured hints for the rule fallback (e.g. deployment method, platform)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

impl SelectionRequest {
    pub fn single_best(query: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            query: query.into(),
            namespace,
            max_results: 1,
            mode: SelectionMode::SingleBest,
            hints: Vec::new(),
        }
    }

    pub fn best_of(query: impl Into<String>, namespace: Namespace, max_results: usize) -> Self {
        Self {
            query: query.into(),
            namespace,
            max_results,
            mode: SelectionMode::BestOfN,
            hints: Vec::new(),
        }
    }

    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }

    /// The effective bound: 1 for single-best, at least 1 otherwise.
    pub fn limit(&self) -> usize {
        match self.mode {
            SelectionMode::SingleBest => 1,
            SelectionMode::BestOfN => self.max_results.max(1),
        }
    }
}

/// How a selection response came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// The model chose at least one valid identifier.
    Selected,
    /// The model deliberately chose nothing and said why (best-of-N only).
    Abstained,
    /// Deterministic rule matching chose after the model was exhausted or skipped.
    RuleFallback,
    /// Attempts were exhausted in best-of-N mode; nothing is selected.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResponse {
    /// Canonical catalog identifiers, most relevant first
    pub selected_ids: Vec<String>,

    pub rationale: String,

    pub outcome: SelectionOutcome,

    /// LLM attempts consumed
    pub attempts: u32,
}

impl SelectionResponse {
    pub fn is_empty(&self) -> bool {
        self.selected_ids.is_empty()
    }
}

/// Final content handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedContent {
    /// One document verbatim, or several joined by a visible separator
    Text { content: String },
    /// Absolute URLs, most relevant first
    Urls { urls: Vec<String> },
    /// Nothing relevant was found; distinct from an empty document
    Empty { reason: String },
}

impl ResolvedContent {
    pub fn empty(reason: impl Into<String>) -> Self {
        ResolvedContent::Empty {
            reason: reason.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResolvedContent::Empty { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResolvedContent::Text { content } => Some(content),
            _ => None,
        }
    }

    pub fn urls(&self) -> &[String] {
        match self {
            ResolvedContent::Urls { urls } => urls,
            _ => &[],
        }
    }
}
