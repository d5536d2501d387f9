//! Namespace registry: normalized name/alias lookup, resolved at startup.

use std::collections::HashMap;
use std::sync::Arc;

use docroute_config::{NamespaceConfig, OutputKind};
use docroute_core::catalog::{Namespace, normalize_key};
use docroute_core::error::{Error, Result};

use crate::catalog::{CachedCatalog, CatalogBuilder, CatalogProvider};
use crate::prompt::{AnswerShape, PromptBuilder};
use crate::rules::DefaultChoice;

/// Everything the router needs to serve one namespace.
pub struct NamespaceSpec {
    pub namespace: Namespace,
    pub catalog: Arc<dyn CatalogProvider>,
    pub output: OutputKind,
    pub default: DefaultChoice,
    pub prompt: PromptBuilder,
}

impl NamespaceSpec {
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self {
            namespace: catalog.namespace().clone(),
            catalog,
            output: OutputKind::Content,
            default: DefaultChoice::None,
            prompt: PromptBuilder::default(),
        }
    }

    pub fn with_output(mut self, output: OutputKind) -> Self {
        self.output = output;
        self.prompt = PromptBuilder::new(shape_for(output));
        self
    }

    pub fn with_default(mut self, default: DefaultChoice) -> Self {
        self.default = default;
        self
    }

    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn from_config(ns: &NamespaceConfig, builder: CatalogBuilder) -> Self {
        let mut prompt = PromptBuilder::new(shape_for(ns.output)).with_guidelines(ns.guidelines.clone());
        if let Some(role) = &ns.role {
            prompt = prompt.with_role(role);
        }
        Self::new(Arc::new(CachedCatalog::from_config(ns, builder)))
            .with_output(ns.output)
            .with_default(DefaultChoice::from_config(
                ns.default_document.as_deref(),
                ns.default_to_first,
            ))
            .with_prompt(prompt)
    }
}

fn shape_for(output: OutputKind) -> AnswerShape {
    match output {
        OutputKind::Content => AnswerShape::Names,
        OutputKind::Urls => AnswerShape::Urls,
    }
}

#[derive(Default)]
pub struct NamespaceRegistry {
    specs: Vec<Arc<NamespaceSpec>>,
    index: HashMap<String, usize>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace under its own name and any aliases.
    ///
    /// Keys are case-insensitive; a key already taken is a configuration error.
    pub fn register(&mut self, spec: NamespaceSpec, aliases: &[String]) -> Result<()> {
        let keys: Vec<String> = std::iter::once(spec.namespace.key())
            .chain(aliases.iter().map(|a| normalize_key(a)))
            .collect();

        if let Some(taken) = keys.iter().find(|k| self.index.contains_key(*k)) {
            return Err(Error::Config {
                message: format!("namespace key '{taken}' is registered twice"),
            });
        }

        let slot = self.specs.len();
        self.specs.push(Arc::new(spec));
        for key in keys {
            self.index.insert(key, slot);
        }
        Ok(())
    }

    pub fn from_config(namespaces: &[NamespaceConfig], builder: &CatalogBuilder) -> Result<Self> {
        let mut registry = Self::new();
        for ns in namespaces {
            registry.register(NamespaceSpec::from_config(ns, builder.clone()), &ns.aliases)?;
        }
        Ok(registry)
    }

    pub fn resolve(&self, hint: &str) -> Option<Arc<NamespaceSpec>> {
        self.index
            .get(&normalize_key(hint))
            .map(|&slot| self.specs[slot].clone())
    }

    /// Registered namespace names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|s| s.namespace.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryDocumentLoader;

    fn builder() -> CatalogBuilder {
        CatalogBuilder::new(Arc::new(MemoryDocumentLoader::new()))
    }

    #[test]
    fn resolves_names_and_aliases_case_insensitively() {
        let registry = NamespaceRegistry::from_config(&docroute_config::builtin_namespaces(), &builder()).unwrap();

        assert_eq!(registry.resolve(" Deployments ").unwrap().namespace.as_str(), "deployments");
        assert_eq!(registry.resolve("DEPLOY").unwrap().namespace.as_str(), "deployments");
        assert_eq!(registry.resolve("javascript").unwrap().namespace.as_str(), "sdks/javascript");
        assert!(registry.resolve("sdks/rust").is_none());
        assert_eq!(registry.names()[0], "deployments");
    }

    #[test]
    fn config_drives_defaults_and_output() {
        let registry = NamespaceRegistry::from_config(&docroute_config::builtin_namespaces(), &builder()).unwrap();

        let deployments = registry.resolve("deployments").unwrap();
        assert_eq!(deployments.default, DefaultChoice::Id("README.md".into()));
        assert_eq!(deployments.output, OutputKind::Content);
        assert_eq!(deployments.prompt.shape(), AnswerShape::Names);

        assert_eq!(registry.resolve("sdks/go").unwrap().default, DefaultChoice::First);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut registry = NamespaceRegistry::new();
        let spec = |name: &str| {
            NamespaceSpec::new(Arc::new(CachedCatalog::new(
                Namespace::new(name),
                crate::catalog::CatalogSource::Static(vec![]),
                Default::default(),
                builder(),
            )))
        };
        registry.register(spec("guides"), &["howto".into()]).unwrap();
        let err = registry.register(spec("HowTo"), &[]).unwrap_err();
        assert!(err.to_string().contains("howto"));
    }
}
