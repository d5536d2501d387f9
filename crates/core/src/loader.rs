//! DocumentLoader trait: the abstraction over where document bytes live.
//!
//! The engine never reads files directly; it asks a loader to enumerate the
//! identifiers in a namespace and to fetch one document's text. Expected
//! misses come back as [`LoadError::NotFound`] rather than as faults.
//!
//! Implementations: filesystem, in-memory maps, object storage.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::LoadError;

#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// A human-readable name for this loader (e.g., "fs", "memory").
    fn name(&self) -> &str;

    /// Enumerate document identifiers in a namespace, in a stable order.
    async fn list_ids(&self, namespace: &str) -> std::result::Result<Vec<String>, LoadError>;

    /// Load one document's raw text.
    async fn load_content(&self, namespace: &str, id: &str) -> std::result::Result<String, LoadError>;
}

/// Load a JSON artifact (e.g. a documentation tree) and deserialize it.
pub async fn load_json<T: DeserializeOwned>(
    loader: &dyn DocumentLoader,
    namespace: &str,
    id: &str,
) -> std::result::Result<T, LoadError> {
    let raw = loader.load_content(namespace, id).await?;
    debug!(loader = loader.name(), namespace, id, bytes = raw.len(), "Loaded JSON artifact");
    serde_json::from_str(&raw).map_err(|e| {
        warn!(namespace, id, error = %e, "Malformed JSON artifact");
        LoadError::Invalid {
            id: id.to_string(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct OneFile;

    #[async_trait]
    impl DocumentLoader for OneFile {
        fn name(&self) -> &str {
            "one"
        }

        async fn list_ids(&self, _namespace: &str) -> Result<Vec<String>, LoadError> {
            Ok(vec!["tree.json".into()])
        }

        async fn load_content(&self, namespace: &str, id: &str) -> Result<String, LoadError> {
            match id {
                "tree.json" => Ok(r#"{"version": "1"}"#.into()),
                "broken.json" => Ok("{not json".into()),
                _ => Err(LoadError::NotFound {
                    namespace: namespace.into(),
                    id: id.into(),
                }),
            }
        }
    }

    #[derive(Deserialize)]
    struct Tree {
        version: String,
    }

    #[tokio::test]
    async fn load_json_deserializes() {
        let tree: Tree = load_json(&OneFile, "docs", "tree.json").await.unwrap();
        assert_eq!(tree.version, "1");
    }

    #[tokio::test]
    async fn load_json_reports_invalid_payload() {
        let err = load_json::<Tree>(&OneFile, "docs", "broken.json")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LoadError::Invalid { .. }));
    }

    #[tokio::test]
    async fn load_json_passes_through_not_found() {
        let err = load_json::<Tree>(&OneFile, "docs", "missing.json")
            .await
            .err()
            .unwrap();
        assert!(err.is_not_found());
    }
}
