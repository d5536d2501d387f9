//! The routing engine: the heart of docroute.
//!
//! A query flows through the engine like this:
//!
//! 1. **Resolve** the namespace through the [`NamespaceRegistry`]
//! 2. **Catalog** the namespace's documents (built once, then cached)
//! 3. **Select** identifiers with one bounded, retried model call
//! 4. **Fall back** to deterministic rules when the model can't decide
//! 5. **Assemble** the chosen documents into content or URLs
//!
//! Documentation search runs the same selector twice through the
//! [`TwoPhaseNarrower`]: once over sections, once over the chosen
//! section's files.

pub mod assembler;
pub mod catalog;
pub mod doctree;
pub mod frontmatter;
pub mod loader;
pub mod narrower;
pub mod prompt;
pub mod registry;
pub mod retry;
pub mod router;
pub mod rules;
pub mod selector;
pub mod services;

#[cfg(test)]
mod test_helpers;

pub use assembler::{AssemblyMode, ContentAssembler, DOCUMENT_SEPARATOR};
pub use catalog::{CachedCatalog, CatalogBuilder, CatalogProvider, CatalogSource, StaticEntry};
pub use doctree::{DocTree, DocTreeSource, LoadedDocTree};
pub use loader::{FsDocumentLoader, MemoryDocumentLoader};
pub use narrower::TwoPhaseNarrower;
pub use prompt::{AnswerShape, PromptBuilder};
pub use registry::{NamespaceRegistry, NamespaceSpec};
pub use retry::RetryPolicy;
pub use router::{DocRouter, RouteQuery};
pub use rules::DefaultChoice;
pub use selector::Selector;
pub use services::{DeploymentGuide, DeploymentOption, DocSearch, SdkGuide, Services, SupportedSdk};
