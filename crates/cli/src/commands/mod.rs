//! Subcommands and the wiring they share.

pub mod catalog;
pub mod deploy;
pub mod docs;
pub mod doctor;
pub mod onboard;
pub mod route;
pub mod sdk;
pub mod sdks;

use std::sync::Arc;

use docroute_config::AppConfig;
use docroute_core::selection::ResolvedContent;
use docroute_core::toggle::StaticToggles;
use docroute_engine::{FsDocumentLoader, Services};
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Build every service from config, reading documents under `docs_root`.
pub fn build_services(config: &AppConfig) -> Result<Services, Box<dyn std::error::Error>> {
    let router = docroute_providers::build_from_config(config);
    let provider = router.default().ok_or("No default provider configured")?;
    let loader = Arc::new(FsDocumentLoader::new(config.docs_root.clone()));
    let toggles = Arc::new(StaticToggles::new(config.flags.clone()));
    Ok(Services::from_config(config, provider, loader, toggles)?)
}

/// Fail early with setup instructions when no API key is configured.
pub fn require_api_key(config: &AppConfig) -> CmdResult {
    if config.has_api_key() {
        return Ok(());
    }
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    DOCROUTE_API_KEY    (generic)");
    eprintln!("    OPENAI_API_KEY      (for OpenAI direct)");
    eprintln!("    OPENROUTER_API_KEY  (for OpenRouter)");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
    Err("No API key found. See above for setup instructions.".into())
}

/// A token cancelled by the first Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            token.cancel();
        }
    });
    cancel
}

pub fn print_content(result: &ResolvedContent) {
    match result {
        ResolvedContent::Text { content } => println!("{content}"),
        ResolvedContent::Urls { urls } => {
            for url in urls {
                println!("{url}");
            }
        }
        ResolvedContent::Empty { reason } => {
            eprintln!("No matching document found ({reason}).");
        }
    }
}
