//! Error types for the docroute domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all docroute operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Document loading ---
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    // --- Selection ---
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    /// The caller asked for a namespace nobody registered.
    #[error("Unknown namespace: {0}")]
    UnknownNamespace(String),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The caller cancelled the request; no partial result is produced.
    #[error("Request cancelled")]
    Cancelled,

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Failures of the document loader collaborator.
///
/// `NotFound` and `NamespaceNotFound` are expected misses, not faults.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("Document not found: {namespace}/{id}")]
    NotFound { namespace: String, id: String },

    #[error("Namespace not found: {0}")]
    NamespaceNotFound(String),

    #[error("I/O error reading {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid document {id}: {reason}")]
    Invalid { id: String, reason: String },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. } | LoadError::NamespaceNotFound(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum SelectionError {
    /// The namespace has zero candidate documents.
    #[error("Catalog unavailable: namespace '{namespace}' has no documents")]
    CatalogUnavailable { namespace: String },

    /// No attempt produced a usable identifier and no fallback applied.
    #[error("No document selected in '{namespace}' after {attempts} attempt(s)")]
    EmptySelection { namespace: String, attempts: u32 },

    /// The model answered with something that is not a selection.
    #[error("Invalid selection response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn load_error_not_found_is_expected_miss() {
        let err = LoadError::NotFound {
            namespace: "deployments".into(),
            id: "HelmDeployment.md".into(),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("deployments/HelmDeployment.md"));

        let io = LoadError::Io {
            path: "/tmp/x".into(),
            reason: "permission denied".into(),
        };
        assert!(!io.is_not_found());
    }

    #[test]
    fn selection_error_converts_to_top_level() {
        let err: Error = SelectionError::EmptySelection {
            namespace: "sdks/dotnet".into(),
            attempts: 3,
        }
        .into();
        assert!(err.to_string().contains("sdks/dotnet"));
        assert!(err.to_string().contains("3 attempt"));
        assert!(!err.is_cancelled());
        assert!(Error::Cancelled.is_cancelled());
    }
}
