//! The user-facing services and their wiring.
//!
//! [`Services::from_config`] builds the whole graph once at startup: one
//! selector, one loader, one registry. Every service shares them.

pub mod deployment;
pub mod docs;
pub mod sdk;

use std::sync::Arc;
use std::time::Duration;

use docroute_config::AppConfig;
use docroute_core::catalog::Namespace;
use docroute_core::error::Result;
use docroute_core::loader::DocumentLoader;
use docroute_core::provider::Provider;
use docroute_core::toggle::FeatureToggle;
use tracing::info;

use crate::assembler::ContentAssembler;
use crate::catalog::CatalogBuilder;
use crate::doctree::LoadedDocTree;
use crate::narrower::TwoPhaseNarrower;
use crate::registry::NamespaceRegistry;
use crate::retry::RetryPolicy;
use crate::router::DocRouter;
use crate::selector::Selector;

pub use deployment::{DeploymentGuide, DeploymentOption};
pub use docs::DocSearch;
pub use sdk::{SdkGuide, SupportedSdk};

pub struct Services {
    pub router: Arc<DocRouter>,
    pub deployments: DeploymentGuide,
    pub sdks: SdkGuide,
    pub docs: DocSearch,
}

impl Services {
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        loader: Arc<dyn DocumentLoader>,
        toggles: Arc<dyn FeatureToggle>,
    ) -> Result<Self> {
        let selector = Arc::new(selector_from_config(config, provider));
        let assembler = Arc::new(ContentAssembler::new(loader.clone()));

        let registry = NamespaceRegistry::from_config(&config.namespaces, &CatalogBuilder::new(loader.clone()))?;
        info!(namespaces = ?registry.names(), "Namespaces registered");
        let router = Arc::new(DocRouter::new(registry, selector.clone(), assembler.clone()));

        let tree_namespace = Namespace::new(&config.docs.tree_namespace);
        let tree = LoadedDocTree::new(loader, tree_namespace.clone(), &config.docs.tree_file);
        let narrower = TwoPhaseNarrower::new(Arc::new(tree), selector, assembler, toggles, tree_namespace)
            .with_max_urls(config.docs.max_urls);

        Ok(Self {
            deployments: DeploymentGuide::new(router.clone()),
            sdks: SdkGuide::new(router.clone(), config.sdks.clone()),
            docs: DocSearch::new(Arc::new(narrower)),
            router,
        })
    }
}

fn selector_from_config(config: &AppConfig, provider: Arc<dyn Provider>) -> Selector {
    Selector::new(provider, config.selection_model())
        .with_temperature(config.temperature)
        .with_max_tokens(config.selector.max_tokens)
        .with_retry(RetryPolicy::new(
            config.selector.max_attempts,
            Duration::from_millis(config.selector.backoff_ms),
        ))
        .with_request_timeout(Duration::from_secs(config.selector.request_timeout_secs))
}
