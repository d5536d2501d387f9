//! Document loaders: filesystem and in-memory.
//!
//! Both list identifiers in a stable order and report expected misses as
//! [`LoadError::NotFound`] / [`LoadError::NamespaceNotFound`].

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docroute_core::error::LoadError;
use docroute_core::loader::DocumentLoader;
use tracing::debug;

/// Reads documents from `<root>/<namespace>/<id>`.
///
/// A namespace like `sdks/javascript` maps to the nested directory
/// `<root>/sdks/javascript/`. Identifiers are plain file names.
pub struct FsDocumentLoader {
    root: PathBuf,
}

impl FsDocumentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_dir(&self, namespace: &str) -> Result<PathBuf, LoadError> {
        let relative = Path::new(namespace.trim_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(LoadError::NamespaceNotFound(namespace.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn document_path(&self, namespace: &str, id: &str) -> Result<PathBuf, LoadError> {
        let not_found = || LoadError::NotFound {
            namespace: namespace.to_string(),
            id: id.to_string(),
        };
        let mut components = Path::new(id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(not_found()),
        }
        Ok(self.namespace_dir(namespace).map_err(|_| not_found())?.join(id))
    }
}

#[async_trait]
impl DocumentLoader for FsDocumentLoader {
    fn name(&self) -> &str {
        "fs"
    }

    async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, LoadError> {
        let dir = self.namespace_dir(namespace)?;
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::NamespaceNotFound(namespace.to_string()),
            _ => LoadError::Io {
                path: dir.display().to_string(),
                reason: e.to_string(),
            },
        })?;

        let io_err = |e: std::io::Error| LoadError::Io {
            path: dir.display().to_string(),
            reason: e.to_string(),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            if !entry.file_type().await.map_err(io_err)?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                ids.push(name.to_string());
            }
        }
        ids.sort();

        debug!(namespace, count = ids.len(), "Listed documents");
        Ok(ids)
    }

    async fn load_content(&self, namespace: &str, id: &str) -> Result<String, LoadError> {
        let path = self.document_path(namespace, id)?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => LoadError::NotFound {
                    namespace: namespace.to_string(),
                    id: id.to_string(),
                },
                _ => LoadError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                },
            })
    }
}

/// Documents held in memory, in insertion order per namespace.
///
/// Counts calls so tests can assert which suspension points ran.
#[derive(Default)]
pub struct MemoryDocumentLoader {
    namespaces: HashMap<String, Vec<(String, Option<String>)>>,
    list_calls: AtomicUsize,
    load_calls: AtomicUsize,
}

impl MemoryDocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document.
    pub fn with(mut self, namespace: &str, id: &str, content: &str) -> Self {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .push((id.to_string(), Some(content.to_string())));
        self
    }

    /// Add an identifier that lists but fails to load.
    pub fn with_broken(mut self, namespace: &str, id: &str) -> Self {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .push((id.to_string(), None));
        self
    }

    /// Declare an empty namespace.
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespaces.entry(namespace.to_string()).or_default();
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentLoader for MemoryDocumentLoader {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, LoadError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.namespaces
            .get(namespace)
            .map(|docs| docs.iter().map(|(id, _)| id.clone()).collect())
            .ok_or_else(|| LoadError::NamespaceNotFound(namespace.to_string()))
    }

    async fn load_content(&self, namespace: &str, id: &str) -> Result<String, LoadError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        let doc = self
            .namespaces
            .get(namespace)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id == id));
        match doc {
            Some((_, Some(content))) => Ok(content.clone()),
            Some((_, None)) => Err(LoadError::Io {
                path: format!("{namespace}/{id}"),
                reason: "simulated read failure".into(),
            }),
            None => Err(LoadError::NotFound {
                namespace: namespace.to_string(),
                id: id.to_string(),
            }),
        }
    }
}
