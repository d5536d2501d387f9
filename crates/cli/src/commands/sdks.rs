//! `docroute sdks`: List supported SDK identifiers.

use super::{CmdResult, build_services, load_config};

pub async fn run() -> CmdResult {
    let config = load_config()?;
    let services = build_services(&config)?;

    println!("🧩 Supported SDKs");
    println!("=================");
    println!();
    println!("  {:<28} {:<14} {:<8} Use case", "Identifier", "Language", "Kind");
    for sdk in services.sdks.supported() {
        println!(
            "  {:<28} {:<14} {:<8} {}",
            sdk.id, sdk.language, sdk.kind, sdk.description
        );
    }

    Ok(())
}
