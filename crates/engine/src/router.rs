//! `DocRouter`: the single inbound operation.
//!
//! `route(query, namespace, max_results)` → resolved content. All model
//! uncertainty is absorbed below this point: the caller gets content, URLs,
//! or the empty sentinel. Only cancellation, an unknown namespace and
//! loader faults come back as errors.

use std::sync::Arc;

use docroute_config::OutputKind;
use docroute_core::catalog::Catalog;
use docroute_core::error::{Error, Result, SelectionError};
use docroute_core::selection::{ResolvedContent, SelectionRequest};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::assembler::{AssemblyMode, ContentAssembler};
use crate::narrower::cancellable;
use crate::registry::{NamespaceRegistry, NamespaceSpec};
use crate::selector::Selector;

/// One routing request.
#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub query: String,
    pub namespace: String,
    /// 1 = single-best document; more = best-of-N
    pub max_results: usize,
    /// Rule-fallback hints such as a deployment method and platform
    pub hints: Vec<String>,
}

impl RouteQuery {
    pub fn new(query: impl Into<String>, namespace: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            namespace: namespace.into(),
            max_results,
            hints: Vec::new(),
        }
    }

    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }
}

pub struct DocRouter {
    registry: NamespaceRegistry,
    selector: Arc<Selector>,
    assembler: Arc<ContentAssembler>,
}

impl DocRouter {
    pub fn new(registry: NamespaceRegistry, selector: Arc<Selector>, assembler: Arc<ContentAssembler>) -> Self {
        Self {
            registry,
            selector,
            assembler,
        }
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    /// Convenience form of [`route`](Self::route) without hints or cancellation.
    pub async fn route_query(
        &self,
        query: &str,
        namespace: &str,
        max_results: usize,
    ) -> Result<ResolvedContent> {
        self.route(&RouteQuery::new(query, namespace, max_results), &CancellationToken::new())
            .await
    }

    pub async fn route(&self, query: &RouteQuery, cancel: &CancellationToken) -> Result<ResolvedContent> {
        let spec = self.spec(&query.namespace)?;
        let catalog = self.load_catalog(&spec, cancel).await?;

        if catalog.is_empty() {
            warn!(namespace = %spec.namespace, "Catalog unavailable, returning empty result");
            return Ok(ResolvedContent::empty(
                SelectionError::CatalogUnavailable {
                    namespace: spec.namespace.to_string(),
                }
                .to_string(),
            ));
        }

        let request = if query.max_results <= 1 {
            SelectionRequest::single_best(&query.query, spec.namespace.clone())
        } else {
            SelectionRequest::best_of(&query.query, spec.namespace.clone(), query.max_results)
        }
        .with_hints(query.hints.clone());

        let response = match self
            .selector
            .select(&request, &catalog, &spec.prompt, &spec.default, cancel)
            .await
        {
            Ok(response) => response,
            Err(Error::Selection(e)) => {
                warn!(namespace = %spec.namespace, error = %e, "Nothing selected");
                return Ok(ResolvedContent::empty(e.to_string()));
            }
            Err(e) => return Err(e),
        };

        if response.is_empty() {
            return Ok(ResolvedContent::empty(response.rationale));
        }

        let mode = match spec.output {
            OutputKind::Urls => AssemblyMode::Urls {
                limit: request.limit(),
            },
            OutputKind::Content if response.selected_ids.len() == 1 => AssemblyMode::Single,
            OutputKind::Content => AssemblyMode::Concatenate,
        };

        info!(
            namespace = %spec.namespace,
            outcome = ?response.outcome,
            selected = ?response.selected_ids,
            "Routed query"
        );
        self.assembler
            .assemble(&response.selected_ids, &catalog, mode, cancel)
            .await
    }

    /// Assemble fixed documents of a namespace without asking the model.
    pub async fn resolve_pinned(
        &self,
        namespace: &str,
        ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<ResolvedContent> {
        let spec = self.spec(namespace)?;
        let catalog = self.load_catalog(&spec, cancel).await?;
        let mode = if ids.len() == 1 {
            AssemblyMode::Single
        } else {
            AssemblyMode::Concatenate
        };
        self.assembler.assemble(ids, &catalog, mode, cancel).await
    }

    /// The described catalog of a namespace.
    pub async fn catalog(&self, namespace: &str, cancel: &CancellationToken) -> Result<Arc<Catalog>> {
        let spec = self.spec(namespace)?;
        self.load_catalog(&spec, cancel).await
    }

    fn spec(&self, namespace: &str) -> Result<Arc<NamespaceSpec>> {
        self.registry
            .resolve(namespace)
            .ok_or_else(|| Error::UnknownNamespace(namespace.to_string()))
    }

    async fn load_catalog(&self, spec: &NamespaceSpec, cancel: &CancellationToken) -> Result<Arc<Catalog>> {
        Ok(cancellable(cancel, spec.catalog.catalog()).await??)
    }
}
