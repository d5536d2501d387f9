//! The Selector: one LLM-backed choice over a catalog.
//!
//! # States
//!
//! 1. **Building**: render the prompt once; every retry reuses it
//! 2. **Requesting**: one provider call, bounded by the request timeout
//! 3. **Validating**: keep only identifiers present in the catalog
//! 4. **Accepted** / **Retrying** / **Exhausted**
//!
//! Malformed JSON, transport errors, timeouts and answers with no usable
//! identifier are all transient: they consume one attempt. When attempts run
//! out, single-best mode falls back to [`rules`](crate::rules) and best-of-N
//! mode returns an empty selection with a rationale.

use std::sync::Arc;
use std::time::Duration;

use docroute_core::catalog::Catalog;
use docroute_core::error::{Error, Result, SelectionError};
use docroute_core::provider::{Provider, ProviderRequest};
use docroute_core::selection::{SelectionMode, SelectionOutcome, SelectionRequest, SelectionResponse};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::prompt::{AnswerShape, PromptBuilder, SelectionPrompt, parse_selection};
use crate::retry::{RetryOutcome, RetryPolicy, with_retry};
use crate::rules::{self, DefaultChoice};

/// What a single successful attempt produced.
#[derive(Debug)]
enum Verdict {
    Accepted { ids: Vec<String>, reason: Option<String> },
    Abstained { reason: String },
}

pub struct Selector {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    retry: RetryPolicy,
    request_timeout: Duration,
}

impl Selector {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.3,
            max_tokens: Some(512),
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Choose identifiers from `catalog` for `request`.
    ///
    /// Every returned identifier is a member of `catalog`, spelled the way
    /// the catalog spells it. Errors are limited to cancellation, an empty
    /// catalog, and a single-best request that no rule could satisfy.
    pub async fn select(
        &self,
        request: &SelectionRequest,
        catalog: &Catalog,
        prompt: &PromptBuilder,
        default: &DefaultChoice,
        cancel: &CancellationToken,
    ) -> Result<SelectionResponse> {
        let namespace = catalog.namespace().as_str();

        if catalog.is_empty() {
            warn!(namespace, "Catalog is empty, nothing to select from");
            return Err(SelectionError::CatalogUnavailable {
                namespace: namespace.to_string(),
            }
            .into());
        }

        if request.mode == SelectionMode::SingleBest && request.query.trim().is_empty() {
            debug!(namespace, "Blank query, using rules only");
            return self.fall_back(request, catalog, default, 0, "blank query");
        }

        let rendered = prompt.build(request, catalog);
        let shape = prompt.shape();
        let limit = request.limit();

        let outcome = with_retry(&self.retry, cancel, |attempt| {
            self.attempt(attempt, &rendered, request, catalog, shape, limit)
        })
        .await?;

        match outcome {
            RetryOutcome::Succeeded { value: Verdict::Accepted { ids, reason }, attempts } => {
                info!(namespace, attempts, selected = ?ids, "Selection accepted");
                Ok(SelectionResponse {
                    selected_ids: ids,
                    rationale: reason.unwrap_or_default(),
                    outcome: SelectionOutcome::Selected,
                    attempts,
                })
            }
            RetryOutcome::Succeeded { value: Verdict::Abstained { reason }, attempts } => {
                info!(namespace, attempts, reason = %reason, "Model found nothing relevant");
                Ok(SelectionResponse {
                    selected_ids: Vec::new(),
                    rationale: reason,
                    outcome: SelectionOutcome::Abstained,
                    attempts,
                })
            }
            RetryOutcome::Exhausted { attempts, last_error } => match request.mode {
                SelectionMode::SingleBest => {
                    self.fall_back(request, catalog, default, attempts, &last_error)
                }
                SelectionMode::BestOfN => {
                    warn!(namespace, attempts, error = %last_error, "Selection exhausted, returning empty result");
                    Ok(SelectionResponse {
                        selected_ids: Vec::new(),
                        rationale: format!(
                            "No valid selection after {attempts} attempt(s): {last_error}"
                        ),
                        outcome: SelectionOutcome::Exhausted,
                        attempts,
                    })
                }
            },
        }
    }

    async fn attempt(
        &self,
        attempt: u32,
        prompt: &SelectionPrompt,
        request: &SelectionRequest,
        catalog: &Catalog,
        shape: AnswerShape,
        limit: usize,
    ) -> std::result::Result<Verdict, String> {
        let mut provider_request = ProviderRequest::prompt(&self.model, &prompt.system, &prompt.user);
        provider_request.temperature = self.temperature;
        provider_request.max_tokens = self.max_tokens;
        provider_request.response_format = prompt.format.clone();

        debug!(
            provider = self.provider.name(),
            namespace = %catalog.namespace(),
            attempt,
            "Requesting selection"
        );

        let response = match tokio::time::timeout(
            self.request_timeout,
            self.provider.complete(provider_request),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(e.to_string()),
            Err(_) => {
                return Err(format!(
                    "request timed out after {}s",
                    self.request_timeout.as_secs_f32()
                ));
            }
        };

        let parsed = parse_selection(response.text(), shape).map_err(|e| {
            if response.is_truncated() {
                format!("{e} (answer truncated by token limit)")
            } else {
                e.to_string()
            }
        })?;

        if parsed.candidates.is_empty() {
            return match (request.mode, parsed.reason) {
                (SelectionMode::BestOfN, Some(reason)) => Ok(Verdict::Abstained { reason }),
                _ => Err("answer contained no identifiers".into()),
            };
        }

        let ids = validate(&parsed.candidates, catalog, limit);
        if ids.is_empty() {
            return Err(format!(
                "none of {:?} are in the catalog",
                parsed.candidates
            ));
        }
        Ok(Verdict::Accepted {
            ids,
            reason: parsed.reason,
        })
    }

    fn fall_back(
        &self,
        request: &SelectionRequest,
        catalog: &Catalog,
        default: &DefaultChoice,
        attempts: u32,
        cause: &str,
    ) -> Result<SelectionResponse> {
        let namespace = catalog.namespace().as_str();
        match rules::resolve(catalog, &request.hints, &request.query, default) {
            Some((entry, matched)) => {
                info!(namespace, attempts, id = %entry.id, rule = %matched, "Rule fallback selected document");
                Ok(SelectionResponse {
                    selected_ids: vec![entry.id.clone()],
                    rationale: format!("Selected by {matched} ({cause})"),
                    outcome: SelectionOutcome::RuleFallback,
                    attempts,
                })
            }
            None => {
                warn!(namespace, attempts, "No rule matched and no default configured");
                Err(Error::Selection(SelectionError::EmptySelection {
                    namespace: namespace.to_string(),
                    attempts,
                }))
            }
        }
    }
}

/// Map candidates onto catalog identifiers: drop unknowns, dedupe, keep the
/// first `limit` in answer order.
fn validate(candidates: &[String], catalog: &Catalog, limit: usize) -> Vec<String> {
    let mut accepted: Vec<String> = Vec::new();
    for candidate in candidates {
        match catalog.find(candidate).or_else(|| catalog.find_by_url(candidate)) {
            Some(entry) if !accepted.contains(&entry.id) => accepted.push(entry.id.clone()),
            Some(_) => {}
            None => {
                warn!(namespace = %catalog.namespace(), id = %candidate, "Dropping identifier not in catalog");
            }
        }
    }
    if accepted.len() > limit {
        debug!(namespace = %catalog.namespace(), returned = accepted.len(), limit, "Truncating over-long selection");
        accepted.truncate(limit);
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;
    use docroute_core::catalog::{CatalogEntry, Namespace};
    use docroute_core::error::ProviderError;
    use docroute_core::provider::ProviderResponse;

    fn catalog() -> Catalog {
        Catalog::new(
            Namespace::new("deployments"),
            vec![
                CatalogEntry::new("HelmDeployment.md", "Deploy on Kubernetes"),
                CatalogEntry::new("DockerComposeDeployment.md", "Local single-server deploy"),
            ],
        )
    }

    fn url_catalog() -> Catalog {
        let entries = ["a", "b", "c", "d"]
            .iter()
            .map(|n| {
                CatalogEntry::new(format!("{n}.md"), format!("Page {n}"))
                    .with_url(format!("https://docs.example/{n}"))
            })
            .collect();
        Catalog::new(Namespace::new("docs"), entries)
    }

    fn selector(provider: Arc<ScriptedProvider>) -> Selector {
        Selector::new(provider, "mock-model")
    }

    fn single(query: &str) -> SelectionRequest {
        SelectionRequest::single_best(query, Namespace::new("deployments"))
    }

    #[tokio::test]
    async fn accepts_valid_answer_with_canonical_casing() {
        let provider = Arc::new(ScriptedProvider::new(&[r#"{"Names": ["helmdeployment.md"], "Reason": "k8s"}"#]));
        let response = selector(provider.clone())
            .select(&single("kubernetes"), &catalog(), &PromptBuilder::default(), &DefaultChoice::None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.selected_ids, vec!["HelmDeployment.md"]);
        assert_eq!(response.outcome, SelectionOutcome::Selected);
        assert_eq!(response.rationale, "k8s");
        assert_eq!(response.attempts, 1);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].response_format.is_structured());
        assert_eq!(requests[0].max_tokens, Some(512));
    }

    #[tokio::test]
    async fn accepts_non_ascii_id_in_other_case() {
        let provider = Arc::new(ScriptedProvider::new(&[r#"{"Names": ["überblick.md"]}"#]));
        let catalog = Catalog::new(
            Namespace::new("deployments"),
            vec![
                CatalogEntry::new("Zeta.md", "Something else"),
                CatalogEntry::new("Überblick.md", "Overview of all methods"),
            ],
        );
        let response = selector(provider.clone())
            .select(&single("overview"), &catalog, &PromptBuilder::default(), &DefaultChoice::None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.selected_ids, vec!["Überblick.md"]);
        assert_eq!(response.outcome, SelectionOutcome::Selected);
        assert_eq!(response.attempts, 1);
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn single_best_never_returns_more_than_one() {
        let provider = Arc::new(ScriptedProvider::new(&[
            r#"{"Names": ["DockerComposeDeployment.md", "HelmDeployment.md"]}"#,
        ]));
        let response = selector(provider)
            .select(&single("deploy"), &catalog(), &PromptBuilder::default(), &DefaultChoice::None, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response.selected_ids, vec!["DockerComposeDeployment.md"]);
    }

    #[tokio::test]
    async fn unknown_ids_dropped_and_best_of_truncated_in_order() {
        let provider = Arc::new(ScriptedProvider::new(&[
            r#"{"Urls": ["https://docs.example/c", "https://made.up/x", "https://docs.example/a", "https://docs.example/c", "https://docs.example/d"], "Reason": "ranked"}"#,
        ]));
        let request = SelectionRequest::best_of("q", Namespace::new("docs"), 2);
        let response = selector(provider)
            .select(&request, &url_catalog(), &PromptBuilder::new(AnswerShape::Urls), &DefaultChoice::None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.selected_ids, vec!["c.md", "a.md"]);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_after_invalid_then_accepts() {
        let provider = Arc::new(
            ScriptedProvider::new(&["not json", r#"{"Names": ["nope.md"]}"#])
                .then_error(ProviderError::Network("reset".into()))
                .then(r#"{"Names": ["DockerComposeDeployment.md"]}"#),
        );
        let selector = selector(provider.clone()).with_retry(RetryPolicy::new(4, Duration::from_millis(500)));
        let response = selector
            .select(&single("local"), &catalog(), &PromptBuilder::default(), &DefaultChoice::None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.selected_ids, vec!["DockerComposeDeployment.md"]);
        assert_eq!(response.attempts, 4);
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn single_best_exhaustion_uses_rules_after_exact_bound() {
        let provider = Arc::new(ScriptedProvider::always("{{{ not json"));
        let response = selector(provider.clone())
            .select(&single("how to deploy on kubernetes"), &catalog(), &PromptBuilder::default(), &DefaultChoice::None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 3);
        assert_eq!(response.selected_ids, vec!["HelmDeployment.md"]);
        assert_eq!(response.outcome, SelectionOutcome::RuleFallback);
        assert_eq!(response.attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn single_best_without_rule_or_default_is_empty_selection() {
        let provider = Arc::new(ScriptedProvider::failing(ProviderError::Network("down".into())));
        let err = selector(provider)
            .select(&single("zzz"), &catalog(), &PromptBuilder::default(), &DefaultChoice::None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Selection(SelectionError::EmptySelection { attempts: 3, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn best_of_exhaustion_returns_empty_with_rationale() {
        let provider = Arc::new(ScriptedProvider::always("garbage"));
        let request = SelectionRequest::best_of("q", Namespace::new("docs"), 3);
        let response = selector(provider.clone())
            .select(&request, &url_catalog(), &PromptBuilder::new(AnswerShape::Urls), &DefaultChoice::First, &CancellationToken::new())
            .await
            .unwrap();

        assert!(response.is_empty());
        assert!(!response.rationale.is_empty());
        assert_eq!(response.outcome, SelectionOutcome::Exhausted);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn best_of_empty_list_with_reason_is_accepted() {
        let provider = Arc::new(ScriptedProvider::new(&[r#"{"Urls": [], "Reason": "off topic"}"#]));
        let request = SelectionRequest::best_of("weather", Namespace::new("docs"), 3);
        let response = selector(provider.clone())
            .select(&request, &url_catalog(), &PromptBuilder::new(AnswerShape::Urls), &DefaultChoice::None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.outcome, SelectionOutcome::Abstained);
        assert_eq!(response.rationale, "off topic");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_catalog_never_calls_provider() {
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let empty = Catalog::new(Namespace::new("deployments"), vec![]);
        let err = selector(provider.clone())
            .select(&single("anything"), &empty, &PromptBuilder::default(), &DefaultChoice::First, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Selection(SelectionError::CatalogUnavailable { .. })));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_single_best_query_skips_provider() {
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let response = selector(provider.clone())
            .select(&single("   "), &catalog(), &PromptBuilder::default(), &DefaultChoice::First, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.selected_ids, vec!["HelmDeployment.md"]);
        assert_eq!(response.attempts, 0);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn identical_inputs_give_identical_order() {
        let answer = r#"{"Urls": ["https://docs.example/b", "https://docs.example/a"]}"#;
        let provider = Arc::new(ScriptedProvider::always(answer));
        let selector = selector(provider);
        let catalog = url_catalog();
        let request = SelectionRequest::best_of("q", Namespace::new("docs"), 3);
        let prompt = PromptBuilder::new(AnswerShape::Urls);

        let first = selector
            .select(&request, &catalog, &prompt, &DefaultChoice::None, &CancellationToken::new())
            .await
            .unwrap();
        let second = selector
            .select(&request, &catalog, &prompt, &DefaultChoice::None, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(first.selected_ids, second.selected_ids);
        assert_eq!(first.selected_ids, vec!["b.md", "a.md"]);
    }

    struct HangingProvider;

    #[async_trait::async_trait]
    impl Provider for HangingProvider {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn complete(&self, _request: ProviderRequest) -> std::result::Result<ProviderResponse, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_provider_times_out_then_falls_back() {
        let selector = Selector::new(Arc::new(HangingProvider), "m")
            .with_request_timeout(Duration::from_secs(5))
            .with_retry(RetryPolicy::new(2, Duration::ZERO));
        let response = selector
            .select(&single("zzz"), &catalog(), &PromptBuilder::default(), &DefaultChoice::First, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response.outcome, SelectionOutcome::RuleFallback);
        assert_eq!(response.selected_ids, vec!["HelmDeployment.md"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_in_flight_call() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let err = Selector::new(Arc::new(HangingProvider), "m")
            .select(&single("kubernetes"), &catalog(), &PromptBuilder::default(), &DefaultChoice::First, &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
