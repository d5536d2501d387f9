//! Selection Prompt Builder and answer parsing.
//!
//! The system prompt carries the rules; the user prompt carries the full
//! catalog as JSON plus the query. The catalog is never truncated, so the
//! model cannot pick an identifier it was not shown.

use docroute_core::catalog::Catalog;
use docroute_core::error::SelectionError;
use docroute_core::provider::ResponseFormat;
use docroute_core::selection::{SelectionMode, SelectionRequest};
use serde_json::{Value, json};

const DEFAULT_ROLE: &str =
    "You are a documentation assistant that routes questions to the most relevant pre-written documents.";

/// The JSON shape the model answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerShape {
    /// `{"Names": [...], "Reason": "..."}`, catalog shown as name/description
    Names,
    /// `{"Urls": [...], "Reason": "..."}`, catalog shown as url/summary
    Urls,
}

impl AnswerShape {
    pub fn key(&self) -> &'static str {
        match self {
            AnswerShape::Names => "Names",
            AnswerShape::Urls => "Urls",
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            AnswerShape::Names => "name",
            AnswerShape::Urls => "URL",
        }
    }

    fn example(&self) -> &'static str {
        match self {
            AnswerShape::Names => "getting-started.md",
            AnswerShape::Urls => "https://docs.example.com/getting-started",
        }
    }
}

/// A fully rendered prompt for one selection call.
#[derive(Debug, Clone)]
pub struct SelectionPrompt {
    pub system: String,
    pub user: String,
    pub format: ResponseFormat,
}

/// Renders [`SelectionPrompt`]s for one namespace.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    role: String,
    guidelines: Vec<String>,
    shape: AnswerShape,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(AnswerShape::Names)
    }
}

impl PromptBuilder {
    pub fn new(shape: AnswerShape) -> Self {
        Self {
            role: DEFAULT_ROLE.into(),
            guidelines: Vec::new(),
            shape,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_guidelines(mut self, guidelines: Vec<String>) -> Self {
        self.guidelines = guidelines;
        self
    }

    pub fn shape(&self) -> AnswerShape {
        self.shape
    }

    pub fn build(&self, request: &SelectionRequest, catalog: &Catalog) -> SelectionPrompt {
        SelectionPrompt {
            system: self.system_prompt(request),
            user: self.user_prompt(request, catalog),
            format: self.response_format(request.limit()),
        }
    }

    fn system_prompt(&self, request: &SelectionRequest) -> String {
        let key = self.shape.key();
        let noun = self.shape.noun();
        let limit = request.limit();

        let mut rules = vec![format!(
            "Use only {noun}s that appear in the provided catalog, copied exactly. Never invent one."
        )];
        match request.mode {
            SelectionMode::SingleBest => {
                rules.push(format!("Return exactly one {noun}. Be decisive and do not abstain."));
            }
            SelectionMode::BestOfN => {
                rules.push(format!(
                    "Return at most {limit} {noun}(s), ordered from most to least relevant."
                ));
                rules.push(format!(
                    "If nothing in the catalog is relevant, return an empty \"{key}\" array and explain why in \"Reason\"."
                ));
            }
        }
        rules.extend(self.guidelines.iter().cloned());

        let example = json!({ key: [self.shape.example()], "Reason": "Why this matches the request" });

        let mut prompt = format!("{}\n\nRules:\n", self.role);
        for rule in rules {
            prompt.push_str("- ");
            prompt.push_str(&rule);
            prompt.push('\n');
        }
        prompt.push_str("\nRespond with a JSON object only, for example:\n");
        prompt.push_str(&example.to_string());
        prompt
    }

    fn user_prompt(&self, request: &SelectionRequest, catalog: &Catalog) -> String {
        let items: Vec<Value> = catalog
            .entries()
            .iter()
            .map(|entry| match self.shape {
                AnswerShape::Names => json!({ "name": entry.id, "description": entry.description }),
                AnswerShape::Urls => json!({
                    "url": entry.url.as_deref().unwrap_or(&entry.id),
                    "summary": entry.description,
                }),
            })
            .collect();

        let mut prompt = format!("Catalog:\n{}\n", Value::Array(items));
        if !request.hints.is_empty() {
            prompt.push_str(&format!("\nContext: {}\n", request.hints.join(", ")));
        }
        prompt.push_str(&format!("\nRequest: {}", request.query.trim()));
        prompt
    }

    fn response_format(&self, limit: usize) -> ResponseFormat {
        let key = self.shape.key();
        ResponseFormat::JsonSchema {
            name: "document_selection".into(),
            schema: json!({
                "type": "object",
                "properties": {
                    key: { "type": "array", "items": { "type": "string" }, "maxItems": limit },
                    "Reason": { "type": "string" }
                },
                "required": [key, "Reason"],
                "additionalProperties": false
            }),
        }
    }
}

/// A decoded model answer, before catalog validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelection {
    pub candidates: Vec<String>,
    pub reason: Option<String>,
}

/// Decode a model answer in the given shape.
///
/// Tolerates markdown code fences, prose around the object, and any casing
/// of the keys. Anything else is an [`SelectionError::InvalidResponse`].
pub fn parse_selection(raw: &str, shape: AnswerShape) -> Result<ParsedSelection, SelectionError> {
    let value = decode_object(raw)
        .ok_or_else(|| SelectionError::InvalidResponse(format!("not a JSON object: {}", preview(raw))))?;
    let Value::Object(fields) = value else {
        return Err(SelectionError::InvalidResponse("not a JSON object".into()));
    };

    let field = |name: &str| {
        fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    };

    let candidates = match field(shape.key()) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(single)) if !single.trim().is_empty() => vec![single.trim().to_string()],
        Some(Value::Null) | Some(Value::String(_)) => Vec::new(),
        Some(_) => {
            return Err(SelectionError::InvalidResponse(format!(
                "\"{}\" is not a list of strings",
                shape.key()
            )));
        }
        None => {
            return Err(SelectionError::InvalidResponse(format!(
                "missing \"{}\" field",
                shape.key()
            )));
        }
    };

    let reason = field("Reason")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from);

    Ok(ParsedSelection { candidates, reason })
}

fn decode_object(raw: &str) -> Option<Value> {
    let text = strip_fences(raw.trim());
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn preview(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(80) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
