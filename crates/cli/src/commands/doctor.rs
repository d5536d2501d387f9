//! `docroute doctor`: Diagnose configuration, documents and provider.

use docroute_config::AppConfig;
use tokio_util::sync::CancellationToken;

use super::{CmdResult, build_services};

pub async fn run() -> CmdResult {
    println!("🩺 docroute doctor");
    println!("==================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults. Run `docroute onboard` to create one");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            return Err(e.to_string().into());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else {
        println!("  ⚠️  No API key configured. Set DOCROUTE_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    if config.docs_root.is_dir() {
        println!("  ✅ Documents root: {}", config.docs_root.display());
    } else {
        println!("  ❌ Documents root missing: {}", config.docs_root.display());
        issues += 1;
    }

    let services = build_services(&config)?;
    let cancel = CancellationToken::new();
    for name in services.router.registry().names() {
        match services.router.catalog(name, &cancel).await {
            Ok(catalog) if catalog.is_empty() => {
                println!("  ⚠️  {name}: no documents");
                issues += 1;
            }
            Ok(catalog) => println!("  ✅ {name}: {} document(s)", catalog.len()),
            Err(e) => {
                println!("  ❌ {name}: {e}");
                issues += 1;
            }
        }
    }

    if config.has_api_key() {
        let router = docroute_providers::build_from_config(&config);
        match router.default() {
            Some(provider) => match provider.health_check().await {
                Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
                Ok(false) => {
                    println!("  ❌ Provider '{}' rejected the health check", provider.name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
                    issues += 1;
                }
            },
            None => {
                println!("  ❌ No default provider configured");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
