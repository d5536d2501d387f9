//! `docroute deploy`: Deployment guide for a method and platform.

use super::{CmdResult, build_services, cancel_on_ctrl_c, load_config, print_content, require_api_key};

pub async fn run(method: String, platform: String, topic: String) -> CmdResult {
    let config = load_config()?;
    require_api_key(&config)?;
    let services = build_services(&config)?;

    let cancel = cancel_on_ctrl_c();
    let result = services
        .deployments
        .guide(&method, &platform, &topic, &cancel)
        .await?;

    print_content(&result);
    Ok(())
}
