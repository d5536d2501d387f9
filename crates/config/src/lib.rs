//! Configuration loading, validation, and management for docroute.
//!
//! Loads configuration from `~/.docroute/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! Namespaces and SDK identifiers are data, not code: the built-in tables
//! below are the defaults, and a config file can replace them wholesale.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.docroute/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Sampling temperature for selection calls
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Root directory the filesystem loader reads namespaces from
    #[serde(default = "default_docs_root")]
    pub docs_root: PathBuf,

    /// Selector retry and timeout settings
    #[serde(default)]
    pub selector: SelectorConfig,

    /// Two-phase documentation search settings
    #[serde(default)]
    pub docs: DocsConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Selectable document namespaces
    #[serde(default = "builtin_namespaces")]
    pub namespaces: Vec<NamespaceConfig>,

    /// SDK identifier → namespace routing table
    #[serde(default = "builtin_sdks")]
    pub sdks: Vec<SdkConfig>,

    /// Feature toggles (key → enabled)
    #[serde(default)]
    pub flags: HashMap<String, bool>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_docs_root() -> PathBuf {
    AppConfig::config_dir().join("resources")
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("temperature", &self.temperature)
            .field("docs_root", &self.docs_root)
            .field("selector", &self.selector)
            .field("docs", &self.docs)
            .field("providers", &self.providers)
            .field("namespaces", &self.namespaces)
            .field("sdks", &self.sdks)
            .field("flags", &self.flags)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// LLM attempts per selection before falling back
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff unit; attempt `n` waits `n * backoff_ms` before retrying
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Upper bound on a single provider call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Token cap for selection answers
    #[serde(default = "default_selector_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_attempts() -> u32 {
    3
}
fn default_backoff_ms() -> u64 {
    500
}
fn default_request_timeout() -> u64 {
    60
}
fn default_selector_max_tokens() -> u32 {
    512
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            request_timeout_secs: default_request_timeout(),
            max_tokens: default_selector_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Namespace holding the documentation tree artifact
    #[serde(default = "default_tree_namespace")]
    pub tree_namespace: String,

    #[serde(default = "default_tree_file")]
    pub tree_file: String,

    /// Maximum URLs returned per search
    #[serde(default = "default_max_urls")]
    pub max_urls: usize,
}

fn default_tree_namespace() -> String {
    "docs".into()
}
fn default_tree_file() -> String {
    "docs-tree.json".into()
}
fn default_max_urls() -> usize {
    3
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            tree_namespace: default_tree_namespace(),
            tree_file: default_tree_file(),
            max_urls: default_max_urls(),
        }
    }
}

/// What to do when one entry's description can't be extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryFailurePolicy {
    /// Keep the entry, describing it by its identifier
    #[default]
    UseId,
    /// Leave the entry out of the catalog
    Skip,
}

/// What a namespace resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Document bodies
    #[default]
    Content,
    /// Precomputed absolute URLs
    Urls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Namespace name (e.g. "deployments", "sdks/javascript")
    pub name: String,

    /// Alternate lookup keys
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Statically declared documents; empty = discover through the loader
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentConfig>,

    /// Extension filter for discovered documents
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default)]
    pub on_entry_failure: EntryFailurePolicy,

    #[serde(default)]
    pub output: OutputKind,

    /// Ultimate single-best fallback document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_document: Option<String>,

    /// Fall back to the first catalog entry when nothing else matches
    #[serde(default)]
    pub default_to_first: bool,

    /// Role framing for the selection prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Extra selection guidelines appended to the prompt
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guidelines: Vec<String>,
}

fn default_extension() -> String {
    ".md".into()
}

impl NamespaceConfig {
    fn discovered(name: &str) -> Self {
        Self {
            name: name.into(),
            aliases: vec![],
            documents: vec![],
            extension: default_extension(),
            on_entry_failure: EntryFailurePolicy::UseId,
            output: OutputKind::Content,
            default_document: None,
            default_to_first: false,
            role: None,
            guidelines: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Static description; when absent, front matter is consulted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DocumentConfig {
    fn tagged(id: &str, tags: &[&str], description: &str) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            description: Some(description.into()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    /// SDK identifier callers pass (e.g. "react-webapp-sdk")
    pub id: String,

    pub language: String,

    /// "Server" or "Client"
    pub kind: String,

    pub description: String,

    /// Namespace the SDK's documents live in
    pub namespace: String,

    /// Documents always returned for this SDK; empty = let the model choose
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<String>,
}

impl SdkConfig {
    fn new(id: &str, language: &str, kind: &str, description: &str, namespace: &str, documents: &[&str]) -> Self {
        Self {
            id: id.into(),
            language: language.into(),
            kind: kind.into(),
            description: description.into(),
            namespace: namespace.into(),
            documents: documents.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// The namespaces shipped with the default configuration.
pub fn builtin_namespaces() -> Vec<NamespaceConfig> {
    let deployments = NamespaceConfig {
        aliases: vec!["deployment".into(), "deploy".into()],
        documents: vec![
            DocumentConfig::tagged(
                "AspireAzureDeployment.md",
                &["aspire", "azure"],
                "Deploy FeatBit to Azure using .NET Aspire with Azure Container Apps, including infrastructure provisioning",
            ),
            DocumentConfig::tagged(
                "HelmDeployment.md",
                &["helm-charts", "helm", "kubernetes", "azure", "aws", "gcp", "on-premises"],
                "Deploy FeatBit on Kubernetes clusters using Helm charts for orchestration",
            ),
            DocumentConfig::tagged(
                "TerraformAzureDeployment.md",
                &["terraform", "azure"],
                "Infrastructure as Code deployment to Azure using Terraform",
            ),
            DocumentConfig::tagged(
                "DockerComposeDeployment.md",
                &["docker-compose", "on-premises"],
                "Local or on-premises deployment using Docker Compose",
            ),
            DocumentConfig::tagged(
                "README.md",
                &["all"],
                "Overview of all deployment methods and general deployment guidance",
            ),
        ],
        default_document: Some("README.md".into()),
        role: Some(
            "You are an expert DevOps engineer helping to select the most appropriate FeatBit deployment documentation."
                .into(),
        ),
        guidelines: vec![
            "Match the deployment method first (aspire, helm-charts, terraform, docker-compose)".into(),
            "Consider the target platform (azure, aws, gcp, kubernetes, on-premises)".into(),
            "If multiple documents match, choose the most specific one".into(),
            "If uncertain or if method/platform is \"all\" or \"others\", choose README.md for an overview".into(),
        ],
        ..NamespaceConfig::discovered("deployments")
    };

    let dotnet = NamespaceConfig {
        aliases: vec!["dotnet".into()],
        default_to_first: true,
        role: Some(
            "You are an expert .NET developer assistant helping to select the most appropriate FeatBit SDK documentation."
                .into(),
        ),
        guidelines: vec![
            "Choose ASP.NET Core for web applications, REST APIs, GraphQL, hosted web services and middleware scenarios".into(),
            "Choose Console for background workers, scheduled jobs, CLI tools, non-web services and batch processing".into(),
            "If ambiguous, prefer ASP.NET Core as it is more commonly used".into(),
        ],
        ..NamespaceConfig::discovered("sdks/dotnet")
    };

    let mut namespaces = vec![deployments, dotnet];
    for (name, alias) in [
        ("sdks/javascript", "javascript"),
        ("sdks/java", "java"),
        ("sdks/python", "python"),
        ("sdks/go", "go"),
    ] {
        namespaces.push(NamespaceConfig {
            aliases: vec![alias.into()],
            default_to_first: true,
            ..NamespaceConfig::discovered(name)
        });
    }
    namespaces
}

/// The SDK identifiers shipped with the default configuration.
pub fn builtin_sdks() -> Vec<SdkConfig> {
    vec![
        SdkConfig::new("dotnet-server-sdk", ".NET", "Server", "ASP.NET Core, Web APIs, Background Services", "sdks/dotnet", &[]),
        SdkConfig::new("dotnet-console-sdk", ".NET", "Server", "Console Applications, CLI Tools", "sdks/dotnet", &[]),
        SdkConfig::new("dotnet-client-sdk", ".NET", "Client", "Desktop, Mobile (MAUI, Xamarin)", "sdks/dotnet", &[]),
        SdkConfig::new("javascript-client-sdk", "JavaScript", "Client", "Vanilla JavaScript for Web", "sdks/javascript", &["featbit-js-client-sdk.md"]),
        SdkConfig::new("typescript-client-sdk", "TypeScript", "Client", "TypeScript for Web", "sdks/javascript", &["featbit-js-client-sdk.md"]),
        SdkConfig::new("react-webapp-sdk", "React", "Client", "React Web Applications", "sdks/javascript", &["featbit-react-client-sdk.md"]),
        SdkConfig::new("react-native-sdk", "React Native", "Client", "React Native Mobile Apps", "sdks/javascript", &["featbit-react-native-client-sdk.md"]),
        SdkConfig::new("node-sdk", "Node.js", "Server", "Node.js Backend Services", "sdks/javascript", &["featbit-node-server-sdk.md"]),
        SdkConfig::new(
            "openfeature-node-sdk", "Node.js", "Server", "OpenFeature Node.js Provider", "sdks/javascript",
            &["featbit-openfeature-provider-node-server.md", "featbit-node-server-sdk.md"],
        ),
        SdkConfig::new(
            "openfeature-js-client-sdk", "JavaScript", "Client", "OpenFeature JavaScript Provider", "sdks/javascript",
            &["featbit-openfeature-provider-js-client.md", "featbit-js-client-sdk.md"],
        ),
        SdkConfig::new("java-sdk", "Java", "Server", "Java Backend Services", "sdks/java", &["featbit-java-sdk.md"]),
        SdkConfig::new("java-server-sdk", "Java", "Server", "Java Backend Services", "sdks/java", &["featbit-java-sdk.md"]),
        SdkConfig::new("python-sdk", "Python", "Server", "Python Backend Services", "sdks/python", &["featbit-python-sdk.md"]),
        SdkConfig::new("python-server-sdk", "Python", "Server", "Python Backend Services", "sdks/python", &["featbit-python-sdk.md"]),
        SdkConfig::new("go-sdk", "Go", "Server", "Go Backend Services", "sdks/go", &["featbit-go-sdk.md"]),
        SdkConfig::new("go-server-sdk", "Go", "Server", "Go Backend Services", "sdks/go", &["featbit-go-sdk.md"]),
    ]
}

impl AppConfig {
    /// Load configuration from the default path (~/.docroute/config.toml).
    ///
    /// Also checks environment variables:
    /// - `DOCROUTE_API_KEY` (highest priority), `OPENAI_API_KEY`, `OPENROUTER_API_KEY`
    /// - `DOCROUTE_PROVIDER`, `DOCROUTE_MODEL`, `DOCROUTE_DOCS_ROOT`
    ///
    /// `DOCROUTE_MODEL` beats both `default_model` and the active provider's
    /// `default_model`.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides read through `var`.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = var("DOCROUTE_API_KEY")
                .or_else(|| var("OPENAI_API_KEY"))
                .or_else(|| var("OPENROUTER_API_KEY"));
        }

        if let Some(provider) = var("DOCROUTE_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = var("DOCROUTE_MODEL") {
            if let Some(provider) = self.providers.get_mut(&self.default_provider) {
                provider.default_model = Some(model.clone());
            }
            self.default_model = model;
        }

        if let Some(root) = var("DOCROUTE_DOCS_ROOT") {
            self.docs_root = PathBuf::from(root);
        }
    }

    /// The model used for selection: the active provider's `default_model`,
    /// else the top-level `default_model`.
    pub fn selection_model(&self) -> &str {
        self.providers
            .get(&self.default_provider)
            .and_then(|p| p.default_model.as_deref())
            .unwrap_or(self.default_model.as_str())
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".docroute")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.selector.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "selector.max_attempts must be at least 1".into(),
            ));
        }

        if self.docs.max_urls == 0 {
            return Err(ConfigError::ValidationError(
                "docs.max_urls must be at least 1".into(),
            ));
        }

        let mut keys = HashSet::new();
        for ns in &self.namespaces {
            for key in std::iter::once(&ns.name).chain(ns.aliases.iter()) {
                if !keys.insert(key.trim().to_lowercase()) {
                    return Err(ConfigError::ValidationError(format!(
                        "namespace name or alias '{key}' is declared more than once"
                    )));
                }
            }

            let mut ids = HashSet::new();
            for doc in &ns.documents {
                if !ids.insert(doc.id.to_lowercase()) {
                    return Err(ConfigError::ValidationError(format!(
                        "document '{}' is declared more than once in namespace '{}'",
                        doc.id, ns.name
                    )));
                }
            }
        }

        for sdk in &self.sdks {
            if !keys.contains(&sdk.namespace.trim().to_lowercase()) {
                return Err(ConfigError::ValidationError(format!(
                    "sdk '{}' references unknown namespace '{}'",
                    sdk.id, sdk.namespace
                )));
            }
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            docs_root: default_docs_root(),
            selector: SelectorConfig::default(),
            docs: DocsConfig::default(),
            providers: HashMap::new(),
            namespaces: builtin_namespaces(),
            sdks: builtin_sdks(),
            flags: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_env_override_beats_provider_model() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                default_model: Some("gpt-4o".into()),
                ..Default::default()
            },
        );
        assert_eq!(config.selection_model(), "gpt-4o");

        config.apply_env(|key| (key == "DOCROUTE_MODEL").then(|| "gpt-4.1-mini".to_string()));
        assert_eq!(config.selection_model(), "gpt-4.1-mini");
        assert_eq!(config.default_model, "gpt-4.1-mini");
    }

    #[test]
    fn env_overrides_provider_key_and_root() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            "OPENAI_API_KEY" => Some("sk-env".into()),
            "DOCROUTE_PROVIDER" => Some("openrouter".into()),
            "DOCROUTE_DOCS_ROOT" => Some("/srv/docs".into()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.default_provider, "openrouter");
        assert_eq!(config.docs_root, PathBuf::from("/srv/docs"));
        assert_eq!(config.selection_model(), config.default_model);
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.selector.max_attempts, 3);
        assert_eq!(config.selector.backoff_ms, 500);
        assert_eq!(config.docs.max_urls, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_model, config.default_model);
        assert_eq!(parsed.namespaces.len(), config.namespaces.len());
        assert_eq!(parsed.sdks.len(), config.sdks.len());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_attempts_rejected() {
        let mut config = AppConfig::default();
        config.selector.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn duplicate_namespace_alias_rejected() {
        let mut config = AppConfig::default();
        config.namespaces[1].aliases.push("Deployments".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Deployments"));
    }

    #[test]
    fn duplicate_document_ids_rejected_case_insensitively() {
        let mut config = AppConfig::default();
        let extra = DocumentConfig::tagged("readme.MD", &[], "dup");
        config.namespaces[0].documents.push(extra);
        assert!(config.validate().is_err());
    }

    #[test]
    fn sdk_with_unknown_namespace_rejected() {
        let mut config = AppConfig::default();
        config.sdks.push(SdkConfig::new("rust-sdk", "Rust", "Server", "", "sdks/rust", &[]));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sdks/rust"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().default_provider, "openai");
    }

    #[test]
    fn file_overrides_selector_and_namespaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_model = "gpt-4o"

[selector]
max_attempts = 5

[flags]
doc-not-found = true

[[namespaces]]
name = "guides"
on_entry_failure = "skip"
output = "urls"
default_to_first = true

[[namespaces.documents]]
id = "intro.md"
url = "https://docs.example/intro"
"#,
        )
        .unwrap();

        // SDK table still defaults to built-ins that point at namespaces this
        // file no longer declares.
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        std::fs::write(
            &path,
            format!("sdks = []\n{}", std::fs::read_to_string(&path).unwrap()),
        )
        .unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.default_model, "gpt-4o");
        assert_eq!(config.selector.max_attempts, 5);
        assert_eq!(config.selector.backoff_ms, 500);
        assert_eq!(config.flags.get("doc-not-found"), Some(&true));
        assert_eq!(config.namespaces.len(), 1);
        let ns = &config.namespaces[0];
        assert_eq!(ns.on_entry_failure, EntryFailurePolicy::Skip);
        assert_eq!(ns.output, OutputKind::Urls);
        assert_eq!(ns.extension, ".md");
        assert_eq!(ns.documents[0].url.as_deref(), Some("https://docs.example/intro"));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn builtin_tables_are_consistent() {
        let namespaces = builtin_namespaces();
        let deployments = namespaces.iter().find(|n| n.name == "deployments").unwrap();
        assert_eq!(deployments.default_document.as_deref(), Some("README.md"));
        assert_eq!(deployments.documents.len(), 5);

        let sdks = builtin_sdks();
        let openfeature = sdks.iter().find(|s| s.id == "openfeature-node-sdk").unwrap();
        assert_eq!(openfeature.documents.len(), 2);
        assert!(sdks.iter().filter(|s| s.namespace == "sdks/dotnet").all(|s| s.documents.is_empty()));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gpt-4o-mini"));
        assert!(toml_str.contains("HelmDeployment.md"));
    }
}
