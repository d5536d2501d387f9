//! Catalog Builder and the once-initialized catalog cache.
//!
//! The builder turns a namespace's declared or discovered documents into a
//! described [`Catalog`]. One bad document never fails the whole catalog:
//! depending on [`EntryFailurePolicy`] it is skipped or described by its id.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use docroute_config::{DocumentConfig, EntryFailurePolicy, NamespaceConfig};
use docroute_core::catalog::{Catalog, CatalogEntry, Namespace, normalize_key};
use docroute_core::error::LoadError;
use docroute_core::loader::DocumentLoader;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::frontmatter;

/// A document declared up front, with optional static metadata.
#[derive(Debug, Clone, Default)]
pub struct StaticEntry {
    pub id: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub url: Option<String>,
}

impl StaticEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn described(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::new(id)
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

impl From<&DocumentConfig> for StaticEntry {
    fn from(doc: &DocumentConfig) -> Self {
        Self {
            id: doc.id.clone(),
            display_name: doc.display_name.clone(),
            description: doc.description.clone(),
            tags: doc.tags.clone(),
            url: doc.url.clone(),
        }
    }
}

/// Where a namespace's identifiers come from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// A fixed list, in declaration order
    Static(Vec<StaticEntry>),
    /// Whatever the loader lists, filtered by extension
    Discover { extension: String },
}

impl CatalogSource {
    pub fn from_config(ns: &NamespaceConfig) -> Self {
        if ns.documents.is_empty() {
            CatalogSource::Discover {
                extension: ns.extension.clone(),
            }
        } else {
            CatalogSource::Static(ns.documents.iter().map(StaticEntry::from).collect())
        }
    }
}

/// Builds described catalogs through a [`DocumentLoader`].
#[derive(Clone)]
pub struct CatalogBuilder {
    loader: Arc<dyn DocumentLoader>,
}

impl CatalogBuilder {
    pub fn new(loader: Arc<dyn DocumentLoader>) -> Self {
        Self { loader }
    }

    /// Build the catalog for one namespace.
    ///
    /// An unknown namespace yields an empty catalog; other listing failures
    /// propagate. Per-entry failures follow `policy`.
    pub async fn build(
        &self,
        namespace: &Namespace,
        source: &CatalogSource,
        policy: EntryFailurePolicy,
    ) -> Result<Catalog, LoadError> {
        let candidates = match source {
            CatalogSource::Static(entries) => entries.clone(),
            CatalogSource::Discover { extension } => {
                match self.loader.list_ids(namespace.as_str()).await {
                    Ok(ids) => ids
                        .into_iter()
                        .filter(|id| has_extension(id, extension))
                        .map(StaticEntry::new)
                        .collect(),
                    Err(LoadError::NamespaceNotFound(_)) => {
                        warn!(namespace = %namespace, loader = self.loader.name(), "Namespace not found, catalog is empty");
                        Vec::new()
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !seen.insert(normalize_key(&candidate.id)) {
                warn!(namespace = %namespace, id = %candidate.id, "Duplicate document id ignored");
                continue;
            }
            if let Some(entry) = self.describe(namespace, candidate, policy).await {
                entries.push(entry);
            }
        }

        info!(namespace = %namespace, entries = entries.len(), "Catalog built");
        Ok(Catalog::new(namespace.clone(), entries))
    }

    async fn describe(
        &self,
        namespace: &Namespace,
        candidate: StaticEntry,
        policy: EntryFailurePolicy,
    ) -> Option<CatalogEntry> {
        let StaticEntry {
            id,
            display_name,
            description,
            tags,
            url,
        } = candidate;

        let mut entry = match description {
            Some(description) => CatalogEntry::new(&id, description),
            None => match self.loader.load_content(namespace.as_str(), &id).await {
                Ok(content) => {
                    let fm = frontmatter::parse(&content);
                    let description = frontmatter::description(&content).unwrap_or_else(|| {
                        debug!(namespace = %namespace, id = %id, "No front-matter description, using id");
                        id.clone()
                    });
                    CatalogEntry::new(&id, description)
                        .with_display_name(fm.name_or_stem(&id))
                        .with_content(content)
                }
                Err(e) => match policy {
                    EntryFailurePolicy::Skip => {
                        warn!(namespace = %namespace, id = %id, error = %e, "Skipping catalog entry");
                        return None;
                    }
                    EntryFailurePolicy::UseId => {
                        warn!(namespace = %namespace, id = %id, error = %e, "Describing catalog entry by id");
                        CatalogEntry::new(&id, &id)
                    }
                },
            },
        };

        if let Some(name) = display_name {
            entry = entry.with_display_name(name);
        }
        if let Some(url) = url {
            entry = entry.with_url(url);
        }
        Some(entry.with_tags(tags))
    }
}

fn has_extension(id: &str, extension: &str) -> bool {
    extension.is_empty() || id.to_lowercase().ends_with(&extension.to_lowercase())
}

/// Something that can hand out a namespace's catalog.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    fn namespace(&self) -> &Namespace;

    async fn catalog(&self) -> Result<Arc<Catalog>, LoadError>;
}

/// Builds its catalog on first use and keeps it for the process lifetime.
///
/// Concurrent first calls share one build. A failed build is not cached.
pub struct CachedCatalog {
    namespace: Namespace,
    source: CatalogSource,
    policy: EntryFailurePolicy,
    builder: CatalogBuilder,
    cell: OnceCell<Arc<Catalog>>,
}

impl CachedCatalog {
    pub fn new(
        namespace: Namespace,
        source: CatalogSource,
        policy: EntryFailurePolicy,
        builder: CatalogBuilder,
    ) -> Self {
        Self {
            namespace,
            source,
            policy,
            builder,
            cell: OnceCell::new(),
        }
    }

    pub fn from_config(ns: &NamespaceConfig, builder: CatalogBuilder) -> Self {
        Self::new(
            Namespace::new(&ns.name),
            CatalogSource::from_config(ns),
            ns.on_entry_failure,
            builder,
        )
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

#[async_trait]
impl CatalogProvider for CachedCatalog {
    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    async fn catalog(&self) -> Result<Arc<Catalog>, LoadError> {
        self.cell
            .get_or_try_init(|| async {
                self.builder
                    .build(&self.namespace, &self.source, self.policy)
                    .await
                    .map(Arc::new)
            })
            .await
            .cloned()
    }
}
