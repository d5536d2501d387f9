//! Content Assembler: turns validated identifiers into the final result.

use std::sync::Arc;

use docroute_core::catalog::Catalog;
use docroute_core::error::{Error, LoadError, Result};
use docroute_core::loader::DocumentLoader;
use docroute_core::selection::ResolvedContent;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Joins concatenated documents so each chunk's origin stays visible.
pub const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyMode {
    /// The first identifier's content, verbatim
    Single,
    /// Every identifier's content, in order, joined by [`DOCUMENT_SEPARATOR`]
    Concatenate,
    /// Precomputed URLs, capped at `limit`; no content is fetched
    Urls { limit: usize },
}

pub struct ContentAssembler {
    loader: Arc<dyn DocumentLoader>,
}

impl ContentAssembler {
    pub fn new(loader: Arc<dyn DocumentLoader>) -> Self {
        Self { loader }
    }

    /// Resolve `ids` against `catalog`.
    ///
    /// A document that fails to load is skipped with a warning. When nothing
    /// is left the result is [`ResolvedContent::Empty`].
    pub async fn assemble(
        &self,
        ids: &[String],
        catalog: &Catalog,
        mode: AssemblyMode,
        cancel: &CancellationToken,
    ) -> Result<ResolvedContent> {
        if ids.is_empty() {
            return Ok(ResolvedContent::empty("no documents selected"));
        }

        match mode {
            AssemblyMode::Urls { limit } => Ok(Self::urls(ids, catalog, limit)),
            AssemblyMode::Single => self.concatenate(&ids[..1], catalog, cancel).await,
            AssemblyMode::Concatenate => self.concatenate(ids, catalog, cancel).await,
        }
    }

    fn urls(ids: &[String], catalog: &Catalog, limit: usize) -> ResolvedContent {
        let urls: Vec<String> = ids
            .iter()
            .filter_map(|id| match catalog.find(id).and_then(|e| e.url.clone()) {
                Some(url) => Some(url),
                None => {
                    warn!(namespace = %catalog.namespace(), id = %id, "No URL for selected document");
                    None
                }
            })
            .take(limit)
            .collect();

        if urls.is_empty() {
            ResolvedContent::empty("selected documents have no URLs")
        } else {
            ResolvedContent::Urls { urls }
        }
    }

    async fn concatenate(
        &self,
        ids: &[String],
        catalog: &Catalog,
        cancel: &CancellationToken,
    ) -> Result<ResolvedContent> {
        let mut parts = Vec::with_capacity(ids.len());
        for id in ids {
            let loaded = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                loaded = self.load(id, catalog) => loaded,
            };
            match loaded {
                Ok(content) => parts.push(content),
                Err(e) => {
                    warn!(namespace = %catalog.namespace(), id = %id, error = %e, "Skipping document that failed to load");
                }
            }
        }

        if parts.is_empty() {
            return Ok(ResolvedContent::empty("selected documents could not be loaded"));
        }
        debug!(namespace = %catalog.namespace(), documents = parts.len(), "Assembled content");
        Ok(ResolvedContent::Text {
            content: parts.join(DOCUMENT_SEPARATOR),
        })
    }

    /// Load through the entry's cache when the id is catalogued.
    async fn load(&self, id: &str, catalog: &Catalog) -> std::result::Result<String, LoadError> {
        let namespace = catalog.namespace().as_str();
        match catalog.find(id) {
            Some(entry) => entry
                .content_cell()
                .get_or_try_init(|| self.loader.load_content(namespace, &entry.id))
                .await
                .cloned(),
            None => self.loader.load_content(namespace, id).await,
        }
    }
}
