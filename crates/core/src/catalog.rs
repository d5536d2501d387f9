//! Catalog domain types.
//!
//! A [`Catalog`] is the enumerated, described set of documents eligible for
//! selection inside one [`Namespace`]. Catalogs are immutable once built; the
//! only interior mutability is the per-entry content cache, which is filled
//! at most once.

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

/// A scope that bounds which catalog entries one selection call can see
/// (e.g. "deployments", "sdks/javascript", "docs").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lookup key: trimmed and lowercased.
    pub fn key(&self) -> String {
        normalize_key(&self.0)
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Namespace {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Normalize a free-form identifier for case-insensitive lookups.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One selectable document.
#[derive(Debug)]
pub struct CatalogEntry {
    /// Stable identifier, case-insensitively unique within the namespace
    pub id: String,

    /// Human-facing name
    pub display_name: String,

    /// Machine-readable description shown to the model; never empty
    pub description: String,

    /// Routing metadata used by the rule fallback (e.g. method, platforms)
    pub tags: Vec<String>,

    /// Precomputed absolute URL, for URL-list routing
    pub url: Option<String>,

    content: OnceCell<String>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        let id = id.into();
        let description = description.into();
        let description = if description.trim().is_empty() {
            id.clone()
        } else {
            description
        };
        Self {
            display_name: id.clone(),
            id,
            description,
            tags: Vec::new(),
            url: None,
            content: OnceCell::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Content pre-populated at build time (e.g. read while extracting the description).
    pub fn with_content(self, content: String) -> Self {
        let _ = self.content.set(content);
        self
    }

    /// Whether this entry's identifier matches `candidate` under [`normalize_key`].
    pub fn matches_id(&self, candidate: &str) -> bool {
        normalize_key(&self.id) == normalize_key(candidate)
    }

    /// The lazily-filled content cell.
    pub fn content_cell(&self) -> &OnceCell<String> {
        &self.content
    }
}

/// The described set of documents for one namespace, in discovery order.
#[derive(Debug)]
pub struct Catalog {
    namespace: Namespace,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(namespace: Namespace, entries: Vec<CatalogEntry>) -> Self {
        Self { namespace, entries }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup by identifier.
    pub fn find(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.matches_id(id))
    }

    /// Case-insensitive lookup by precomputed URL.
    pub fn find_by_url(&self, url: &str) -> Option<&CatalogEntry> {
        let key = normalize_key(url);
        self.entries
            .iter()
            .find(|e| e.url.as_deref().is_some_and(|u| normalize_key(u) == key))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(
            Namespace::new("deployments"),
            vec![
                CatalogEntry::new("HelmDeployment.md", "Deploy on Kubernetes"),
                CatalogEntry::new("DockerComposeDeployment.md", "Local single-server deploy"),
            ],
        )
    }

    #[test]
    fn find_is_case_insensitive() {
        let catalog = sample();
        let entry = catalog.find("helmdeployment.MD").unwrap();
        assert_eq!(entry.id, "HelmDeployment.md");
        assert!(catalog.find(" HelmDeployment.md ").is_some());
        assert!(catalog.find("unknown.md").is_none());
    }

    #[test]
    fn find_folds_non_ascii_case() {
        let catalog = Catalog::new(
            Namespace::new("deployments"),
            vec![CatalogEntry::new("Überblick.md", "Overview")
                .with_url("https://docs.example/Überblick")],
        );
        assert_eq!(catalog.find("ÜBERBLICK.md").unwrap().id, "Überblick.md");
        assert!(catalog.find_by_url("https://docs.example/überblick ").is_some());
    }

    #[test]
    fn find_by_url_matches_precomputed_url() {
        let catalog = Catalog::new(
            Namespace::new("docs"),
            vec![CatalogEntry::new("flags/targeting.md", "Targeting")
                .with_url("https://docs.example/flags/targeting")],
        );
        let entry = catalog.find_by_url("HTTPS://docs.example/flags/targeting").unwrap();
        assert_eq!(entry.id, "flags/targeting.md");
        assert!(catalog.find_by_url("https://docs.example/other").is_none());
    }

    #[test]
    fn blank_description_falls_back_to_id() {
        let entry = CatalogEntry::new("README.md", "   ");
        assert_eq!(entry.description, "README.md");
    }

    #[test]
    fn ids_keep_discovery_order() {
        let catalog = sample();
        assert_eq!(
            catalog.ids(),
            vec!["HelmDeployment.md", "DockerComposeDeployment.md"]
        );
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn namespace_key_is_normalized() {
        assert_eq!(Namespace::new(" SDKs/JavaScript ").key(), "sdks/javascript");
        assert_eq!(Namespace::from("docs").to_string(), "docs");
    }

    #[test]
    fn prefilled_content_is_cached() {
        let entry = CatalogEntry::new("a.md", "A").with_content("# A".into());
        assert_eq!(entry.content_cell().get().map(String::as_str), Some("# A"));
    }
}
