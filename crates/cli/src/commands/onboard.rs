//! `docroute onboard`: First-time setup.

use docroute_config::AppConfig;

use super::CmdResult;

pub async fn run() -> CmdResult {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("📚 docroute — First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    let docs_root = AppConfig::default().docs_root;
    if !docs_root.exists() {
        std::fs::create_dir_all(&docs_root)?;
        println!("✅ Created documents directory: {}", docs_root.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Edit {} and add your API key", config_path.display());
        println!("   2. Put your documents under {}", docs_root.display());
        println!("   3. Run: docroute deploy --method helm-charts --platform kubernetes\n");
    }

    Ok(())
}
