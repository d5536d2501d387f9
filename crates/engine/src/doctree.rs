//! The documentation tree artifact and its catalogs.
//!
//! `docs-tree.json` describes a two-level hierarchy: sections, each with
//! files and one level of subsections. It is loaded once per process and
//! never mutated.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use docroute_core::catalog::{Catalog, CatalogEntry, Namespace, normalize_key};
use docroute_core::error::LoadError;
use docroute_core::loader::{DocumentLoader, load_json};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocTree {
    pub version: String,
    pub generated_at: Option<String>,
    pub description: String,
    pub base_url: String,
    pub sections: Vec<DocSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocSection {
    pub title: String,
    pub path: String,
    pub summary: String,
    pub files: Vec<DocFile>,
    pub subsections: Vec<DocSubsection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocSubsection {
    pub title: String,
    pub path: String,
    pub summary: String,
    pub files: Vec<DocFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocFile {
    pub path: String,
    pub url: String,
    pub full_url: Option<String>,
    pub summary: String,
}

impl DocSection {
    /// The section's identifier in the section catalog.
    pub fn id(&self) -> &str {
        if self.path.trim().is_empty() {
            &self.title
        } else {
            &self.path
        }
    }

    /// Files of the section and of its direct subsections, in tree order.
    pub fn all_files(&self) -> impl Iterator<Item = &DocFile> {
        self.files
            .iter()
            .chain(self.subsections.iter().flat_map(|s| s.files.iter()))
    }
}

impl DocTree {
    /// `fullUrl` when present, else `baseUrl` joined with `url`.
    pub fn absolute_url(&self, file: &DocFile) -> String {
        if let Some(full) = file.full_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return full.to_string();
        }
        if file.url.starts_with("http://") || file.url.starts_with("https://") {
            return file.url.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            file.url.trim_start_matches('/')
        )
    }

    pub fn section(&self, id: &str) -> Option<&DocSection> {
        let key = normalize_key(id);
        self.sections
            .iter()
            .find(|s| normalize_key(s.id()) == key || normalize_key(&s.title) == key)
    }

    /// One entry per section; the description pairs title and summary.
    pub fn section_catalog(&self, namespace: &Namespace) -> Catalog {
        let entries = dedupe(self.sections.iter().map(|s| {
            let description = if s.summary.trim().is_empty() {
                s.title.clone()
            } else {
                format!("{}: {}", s.title, s.summary)
            };
            CatalogEntry::new(s.id(), description).with_display_name(&s.title)
        }));
        Catalog::new(namespace.clone(), entries)
    }

    /// One entry per file under `section`, carrying its absolute URL.
    pub fn file_catalog(&self, namespace: &Namespace, section: &DocSection) -> Catalog {
        let entries = dedupe(section.all_files().map(|f| {
            CatalogEntry::new(&f.path, &f.summary).with_url(self.absolute_url(f))
        }));
        Catalog::new(namespace.clone(), entries)
    }
}

fn dedupe(entries: impl Iterator<Item = CatalogEntry>) -> Vec<CatalogEntry> {
    let mut seen = HashSet::new();
    entries.filter(|e| seen.insert(normalize_key(&e.id))).collect()
}

/// The narrower's view of a documentation tree.
#[async_trait]
pub trait DocTreeSource: Send + Sync {
    /// The top-level sections as a catalog.
    async fn sections(&self) -> Result<Arc<Catalog>, LoadError>;

    /// Every file under one section, including one level of subsections.
    /// An unknown section yields an empty catalog.
    async fn section_files(&self, section_id: &str) -> Result<Catalog, LoadError>;
}

/// A [`DocTreeSource`] backed by a JSON artifact read through a loader.
///
/// The tree is parsed on first use; a failed load is retried next time.
pub struct LoadedDocTree {
    loader: Arc<dyn DocumentLoader>,
    namespace: Namespace,
    file: String,
    tree: OnceCell<Arc<DocTree>>,
    sections: OnceCell<Arc<Catalog>>,
}

impl LoadedDocTree {
    pub fn new(loader: Arc<dyn DocumentLoader>, namespace: Namespace, file: impl Into<String>) -> Self {
        Self {
            loader,
            namespace,
            file: file.into(),
            tree: OnceCell::new(),
            sections: OnceCell::new(),
        }
    }

    pub async fn tree(&self) -> Result<Arc<DocTree>, LoadError> {
        self.tree
            .get_or_try_init(|| async {
                let tree: DocTree =
                    load_json(self.loader.as_ref(), self.namespace.as_str(), &self.file).await?;
                info!(
                    namespace = %self.namespace,
                    version = %tree.version,
                    sections = tree.sections.len(),
                    "Documentation tree loaded"
                );
                Ok::<_, LoadError>(Arc::new(tree))
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl DocTreeSource for LoadedDocTree {
    async fn sections(&self) -> Result<Arc<Catalog>, LoadError> {
        self.sections
            .get_or_try_init(|| async {
                let tree = self.tree().await?;
                Ok::<_, LoadError>(Arc::new(tree.section_catalog(&self.namespace)))
            })
            .await
            .cloned()
    }

    async fn section_files(&self, section_id: &str) -> Result<Catalog, LoadError> {
        let tree = self.tree().await?;
        Ok(match tree.section(section_id) {
            Some(section) => tree.file_catalog(&self.namespace, section),
            None => Catalog::new(self.namespace.clone(), Vec::new()),
        })
    }
}
