//! Two-Phase Narrower: section first, then files within the section.
//!
//! Phase 1 picks exactly one section (single-best, no default). Phase 2
//! picks up to `max_urls` files of that section (best-of-N) and resolves
//! them to absolute URLs. If Phase 1 finds nothing, Phase 2 never runs.

use std::sync::Arc;

use docroute_core::catalog::Namespace;
use docroute_core::error::{Error, Result, SelectionError};
use docroute_core::selection::{ResolvedContent, SelectionRequest};
use docroute_core::toggle::{DOC_NOT_FOUND, FeatureToggle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::assembler::{AssemblyMode, ContentAssembler};
use crate::doctree::DocTreeSource;
use crate::prompt::{AnswerShape, PromptBuilder};
use crate::rules::DefaultChoice;
use crate::selector::Selector;

pub struct TwoPhaseNarrower {
    source: Arc<dyn DocTreeSource>,
    selector: Arc<Selector>,
    assembler: Arc<ContentAssembler>,
    toggles: Arc<dyn FeatureToggle>,
    namespace: Namespace,
    max_urls: usize,
    section_prompt: PromptBuilder,
    file_prompt: PromptBuilder,
}

impl TwoPhaseNarrower {
    pub fn new(
        source: Arc<dyn DocTreeSource>,
        selector: Arc<Selector>,
        assembler: Arc<ContentAssembler>,
        toggles: Arc<dyn FeatureToggle>,
        namespace: Namespace,
    ) -> Self {
        Self {
            source,
            selector,
            assembler,
            toggles,
            namespace,
            max_urls: 3,
            section_prompt: PromptBuilder::new(AnswerShape::Names).with_role(
                "You are a documentation assistant. Pick the documentation section that best answers the user's question.",
            ),
            file_prompt: PromptBuilder::new(AnswerShape::Urls).with_role(
                "You are a documentation assistant. Pick the documentation pages that best answer the user's question.",
            ),
        }
    }

    pub fn with_max_urls(mut self, max_urls: usize) -> Self {
        self.max_urls = max_urls.max(1);
        self
    }

    /// Route `query` to at most `max_urls` documentation URLs.
    ///
    /// The `doc-not-found` toggle is read once, and only when the result is
    /// empty; it never changes the result.
    pub async fn route(&self, query: &str, cancel: &CancellationToken) -> Result<ResolvedContent> {
        let result = self.narrow(query, cancel).await?;
        if let ResolvedContent::Empty { reason } = &result
            && self.toggles.is_enabled(&DOC_NOT_FOUND)
        {
            info!(event = "doc_not_found", query = %query, reason = %reason, "No documentation found");
        }
        Ok(result)
    }

    async fn narrow(&self, query: &str, cancel: &CancellationToken) -> Result<ResolvedContent> {
        let sections = cancellable(cancel, self.source.sections()).await??;

        // Phase 1
        let request = SelectionRequest::single_best(query, self.namespace.clone());
        let section = match self
            .selector
            .select(&request, &sections, &self.section_prompt, &DefaultChoice::None, cancel)
            .await
        {
            Ok(response) => match response.selected_ids.into_iter().next() {
                Some(id) => id,
                None => return Ok(ResolvedContent::empty(response.rationale)),
            },
            Err(Error::Selection(e @ (SelectionError::EmptySelection { .. } | SelectionError::CatalogUnavailable { .. }))) => {
                debug!(namespace = %self.namespace, error = %e, "No section selected, skipping file selection");
                return Ok(ResolvedContent::empty(e.to_string()));
            }
            Err(e) => return Err(e),
        };

        // Phase 2
        let files = cancellable(cancel, self.source.section_files(&section)).await??;
        if files.is_empty() {
            return Ok(ResolvedContent::empty(format!("section '{section}' has no files")));
        }

        let request = SelectionRequest::best_of(query, self.namespace.clone(), self.max_urls);
        let response = self
            .selector
            .select(&request, &files, &self.file_prompt, &DefaultChoice::None, cancel)
            .await?;
        if response.is_empty() {
            return Ok(ResolvedContent::empty(response.rationale));
        }

        info!(namespace = %self.namespace, section = %section, urls = response.selected_ids.len(), "Documentation narrowed");
        self.assembler
            .assemble(
                &response.selected_ids,
                &files,
                AssemblyMode::Urls { limit: self.max_urls },
                cancel,
            )
            .await
    }
}

/// Race a loader future against the token.
pub(crate) async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl std::future::Future<Output = T>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        value = fut => Ok(value),
    }
}
