//! `docroute catalog`: Show the described catalog of a namespace.

use super::{CmdResult, build_services, cancel_on_ctrl_c, load_config};

pub async fn run(namespace: String) -> CmdResult {
    let config = load_config()?;
    let services = build_services(&config)?;

    let catalog = services.router.catalog(&namespace, &cancel_on_ctrl_c()).await?;

    println!("📚 Catalog: {}", catalog.namespace());
    println!("  Root: {}", config.docs_root.display());
    println!();
    if catalog.is_empty() {
        println!("  (no documents found)");
        return Ok(());
    }
    for entry in catalog.entries() {
        println!("  {}", entry.id);
        if entry.display_name != entry.id {
            println!("    Name:        {}", entry.display_name);
        }
        println!("    Description: {}", entry.description);
        if !entry.tags.is_empty() {
            println!("    Tags:        {}", entry.tags.join(", "));
        }
        if let Some(url) = &entry.url {
            println!("    URL:         {url}");
        }
    }

    Ok(())
}
