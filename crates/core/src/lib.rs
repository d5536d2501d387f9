//! # docroute Core
//!
//! Domain types, collaborator traits, and error definitions for the docroute
//! document selection engine. This crate does no I/O: it defines the model
//! that the engine and the collaborator implementations are written against.
//!
//! ## Collaborators
//!
//! The engine talks to the outside world through three traits defined here:
//! - [`Provider`]: one chat-completion round trip
//! - [`DocumentLoader`]: enumerate and load documents
//! - [`FeatureToggle`]: read-only side-effect switches

pub mod catalog;
pub mod error;
pub mod loader;
pub mod message;
pub mod provider;
pub mod selection;
pub mod toggle;

// Re-export key types at crate root for ergonomics
pub use catalog::{Catalog, CatalogEntry, Namespace};
pub use error::{Error, LoadError, ProviderError, Result, SelectionError};
pub use loader::DocumentLoader;
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ResponseFormat};
pub use selection::{
    ResolvedContent, SelectionMode, SelectionOutcome, SelectionRequest, SelectionResponse,
};
pub use toggle::{FeatureFlag, FeatureToggle, StaticToggles};
