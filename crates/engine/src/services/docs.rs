//! Documentation search over the docs tree.

use std::sync::Arc;

use docroute_core::error::Result;
use tokio_util::sync::CancellationToken;

use crate::narrower::TwoPhaseNarrower;

pub struct DocSearch {
    narrower: Arc<TwoPhaseNarrower>,
}

impl DocSearch {
    pub fn new(narrower: Arc<TwoPhaseNarrower>) -> Self {
        Self { narrower }
    }

    /// Relevant documentation URLs for `topic`, as a JSON array string.
    ///
    /// Finding nothing renders as `[]`.
    pub async fn search(&self, topic: &str, cancel: &CancellationToken) -> Result<String> {
        let result = self.narrower.route(topic, cancel).await?;
        Ok(serde_json::to_string(result.urls())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::ContentAssembler;
    use crate::doctree::LoadedDocTree;
    use crate::loader::MemoryDocumentLoader;
    use crate::selector::Selector;
    use crate::test_helpers::ScriptedProvider;
    use docroute_core::catalog::Namespace;
    use docroute_core::toggle::StaticToggles;

    const TREE: &str = r#"{
        "baseUrl": "https://docs.example",
        "sections": [
            {"title": "Feature Flags", "path": "feature-flags", "summary": "Flags",
             "files": [{"path": "feature-flags/create.md", "url": "/feature-flags/create", "summary": "Create a flag"}]}
        ]
    }"#;

    fn search(provider: Arc<ScriptedProvider>) -> DocSearch {
        let loader = Arc::new(MemoryDocumentLoader::new().with("docs", "docs-tree.json", TREE));
        let narrower = TwoPhaseNarrower::new(
            Arc::new(LoadedDocTree::new(loader.clone(), Namespace::new("docs"), "docs-tree.json")),
            Arc::new(Selector::new(provider, "mock-model")),
            Arc::new(ContentAssembler::new(loader)),
            Arc::new(StaticToggles::default()),
            Namespace::new("docs"),
        );
        DocSearch::new(Arc::new(narrower))
    }

    #[tokio::test]
    async fn urls_render_as_json_array() {
        let provider = Arc::new(ScriptedProvider::new(&[
            r#"{"Names": ["feature-flags"]}"#,
            r#"{"Urls": ["https://docs.example/feature-flags/create"]}"#,
        ]));
        let json = search(provider).search("create a flag", &CancellationToken::new()).await.unwrap();
        assert_eq!(json, r#"["https://docs.example/feature-flags/create"]"#);
    }

    #[tokio::test]
    async fn nothing_found_renders_empty_array() {
        let provider = Arc::new(ScriptedProvider::new(&[
            r#"{"Names": ["feature-flags"]}"#,
            r#"{"Urls": [], "Reason": "unrelated"}"#,
        ]));
        let json = search(provider).search("billing", &CancellationToken::new()).await.unwrap();
        assert_eq!(json, "[]");
    }
}
