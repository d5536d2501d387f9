//! SDK guide: resolve an SDK identifier to its integration documents.
//!
//! Identifiers map through a lookup table built from `[[sdks]]` at startup.
//! An SDK with pinned documents never reaches the model.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::sync::Arc;

use docroute_config::SdkConfig;
use docroute_core::catalog::normalize_key;
use docroute_core::error::Result;
use docroute_core::selection::ResolvedContent;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::router::{DocRouter, RouteQuery};

/// One row of the supported-SDK table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedSdk {
    pub id: String,
    pub language: String,
    pub kind: String,
    pub description: String,
}

pub struct SdkGuide {
    router: Arc<DocRouter>,
    sdks: Vec<SdkConfig>,
    index: HashMap<String, usize>,
}

impl SdkGuide {
    pub fn new(router: Arc<DocRouter>, sdks: Vec<SdkConfig>) -> Self {
        let mut index = HashMap::with_capacity(sdks.len());
        for (slot, sdk) in sdks.iter().enumerate() {
            if index.insert(normalize_key(&sdk.id), slot).is_some() {
                warn!(sdk = %sdk.id, "Duplicate SDK identifier, last one wins");
            }
        }
        Self { router, sdks, index }
    }

    pub fn find(&self, sdk: &str) -> Option<&SdkConfig> {
        self.index.get(&normalize_key(sdk)).map(|&slot| &self.sdks[slot])
    }

    /// Integration documentation for `sdk`, focused on `topic`.
    ///
    /// An unknown identifier is not an error: the result is a help text
    /// listing the supported identifiers.
    pub async fn guide(&self, sdk: &str, topic: &str, cancel: &CancellationToken) -> Result<ResolvedContent> {
        let Some(config) = self.find(sdk) else {
            warn!(sdk, "Unknown SDK identifier");
            return Ok(ResolvedContent::Text {
                content: self.unknown_sdk_message(sdk),
            });
        };

        info!(sdk = %config.id, namespace = %config.namespace, topic, "SDK guide requested");

        if !config.documents.is_empty() {
            return self
                .router
                .resolve_pinned(&config.namespace, &config.documents, cancel)
                .await;
        }

        let query = format!(
            "SDK: {} ({} {})\nUse case: {}\nTopic: {topic}",
            config.id, config.language, config.kind, config.description
        );
        self.router
            .route(&RouteQuery::new(query, &config.namespace, 1), cancel)
            .await
    }

    pub fn supported(&self) -> Vec<SupportedSdk> {
        self.sdks
            .iter()
            .map(|s| SupportedSdk {
                id: s.id.clone(),
                language: s.language.clone(),
                kind: s.kind.clone(),
                description: s.description.clone(),
            })
            .collect()
    }

    fn unknown_sdk_message(&self, sdk: &str) -> String {
        let mut by_language: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for s in &self.sdks {
            by_language.entry(s.language.as_str()).or_default().push(s.id.as_str());
        }

        let mut out = format!("Unknown SDK identifier: '{sdk}'\n\n## Supported SDKs\n");
        for (language, ids) in by_language {
            let _ = write!(out, "\n### {language}\n");
            for id in ids {
                let _ = writeln!(out, "- {id}");
            }
        }
        out.push_str("\nPass one of the identifiers above as the SDK.\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::ContentAssembler;
    use crate::catalog::CatalogBuilder;
    use crate::loader::MemoryDocumentLoader;
    use crate::registry::NamespaceRegistry;
    use crate::selector::Selector;
    use crate::test_helpers::ScriptedProvider;

    fn guide(provider: Arc<ScriptedProvider>) -> SdkGuide {
        let loader = Arc::new(
            MemoryDocumentLoader::new()
                .with("sdks/javascript", "featbit-openfeature-provider-node-server.md", "# OpenFeature Node")
                .with("sdks/javascript", "featbit-node-server-sdk.md", "# Node")
                .with("sdks/javascript", "featbit-react-client-sdk.md", "# React")
                .with("sdks/dotnet", "NetServerSdkAspNetCore.md", "---\ndescription: ASP.NET Core\n---\n# ASP.NET")
                .with("sdks/dotnet", "NetServerSdkConsole.md", "---\ndescription: Console apps\n---\n# Console"),
        );
        let registry = NamespaceRegistry::from_config(
            &docroute_config::builtin_namespaces(),
            &CatalogBuilder::new(loader.clone()),
        )
        .unwrap();
        let router = DocRouter::new(
            registry,
            Arc::new(Selector::new(provider, "mock-model")),
            Arc::new(ContentAssembler::new(loader)),
        );
        SdkGuide::new(Arc::new(router), docroute_config::builtin_sdks())
    }

    #[tokio::test]
    async fn pinned_documents_are_concatenated_without_model() {
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let result = guide(provider.clone())
            .guide("OpenFeature-Node-SDK", "flag evaluation", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.as_text(), Some("# OpenFeature Node\n\n---\n\n# Node"));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn unpinned_sdk_asks_the_model() {
        let provider = Arc::new(ScriptedProvider::new(&[r#"{"Names": ["NetServerSdkConsole.md"]}"#]));
        let result = guide(provider.clone())
            .guide("dotnet-console-sdk", "background worker", &CancellationToken::new())
            .await
            .unwrap();
        assert!(result.as_text().unwrap().ends_with("# Console"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn unknown_sdk_lists_supported_ones() {
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let result = guide(provider.clone())
            .guide("cobol-sdk", "anything", &CancellationToken::new())
            .await
            .unwrap();
        let text = result.as_text().unwrap();
        assert!(text.contains("Unknown SDK identifier: 'cobol-sdk'"));
        assert!(text.contains("### Go\n- go-sdk\n- go-server-sdk"));
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn supported_lists_every_sdk() {
        let sdks = guide(Arc::new(ScriptedProvider::new(&[]))).supported();
        assert_eq!(sdks.len(), 16);
        assert_eq!(sdks[0].id, "dotnet-server-sdk");
        assert_eq!(sdks[0].language, ".NET");
    }
}
