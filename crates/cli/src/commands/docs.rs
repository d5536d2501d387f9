//! `docroute docs`: Documentation URLs for a topic, as a JSON array.

use super::{CmdResult, build_services, cancel_on_ctrl_c, load_config, require_api_key};

pub async fn run(topic: String) -> CmdResult {
    let config = load_config()?;
    require_api_key(&config)?;
    let services = build_services(&config)?;

    let cancel = cancel_on_ctrl_c();
    let urls = services.docs.search(&topic, &cancel).await?;

    println!("{urls}");
    Ok(())
}
