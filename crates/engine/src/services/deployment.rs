//! Deployment guide: pick the deployment document for a method and platform.

use std::sync::Arc;

use docroute_core::error::Result;
use docroute_core::selection::ResolvedContent;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::router::{DocRouter, RouteQuery};

pub const DEPLOYMENTS_NAMESPACE: &str = "deployments";

/// One row of "what deployment options exist".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentOption {
    pub id: String,
    pub description: String,
    pub tags: Vec<String>,
}

pub struct DeploymentGuide {
    router: Arc<DocRouter>,
}

impl DeploymentGuide {
    pub fn new(router: Arc<DocRouter>) -> Self {
        Self { router }
    }

    /// The best deployment document for `method` on `platform`.
    ///
    /// Method and platform double as rule hints, so an undecided model
    /// still lands on the matching guide.
    pub async fn guide(
        &self,
        method: &str,
        platform: &str,
        topic: &str,
        cancel: &CancellationToken,
    ) -> Result<ResolvedContent> {
        info!(method, platform, topic, "Deployment guide requested");

        let query = format!(
            "Deployment method: {method}\nTarget platform: {platform}\nTopic: {topic}"
        );
        let hints: Vec<String> = [method, platform]
            .into_iter()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(String::from)
            .collect();

        self.router
            .route(&RouteQuery::new(query, DEPLOYMENTS_NAMESPACE, 1).with_hints(hints), cancel)
            .await
    }

    pub async fn methods(&self, cancel: &CancellationToken) -> Result<Vec<DeploymentOption>> {
        let catalog = self.router.catalog(DEPLOYMENTS_NAMESPACE, cancel).await?;
        Ok(catalog
            .entries()
            .iter()
            .map(|e| DeploymentOption {
                id: e.id.clone(),
                description: e.description.clone(),
                tags: e.tags.clone(),
            })
            .collect())
    }
}
