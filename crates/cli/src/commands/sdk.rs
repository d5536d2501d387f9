//! `docroute sdk`: SDK integration guide.

use super::{CmdResult, build_services, cancel_on_ctrl_c, load_config, print_content, require_api_key};

pub async fn run(sdk: String, topic: String) -> CmdResult {
    let config = load_config()?;
    let services = build_services(&config)?;

    // Pinned and unknown SDKs never reach the model
    let needs_model = services.sdks.find(&sdk).is_some_and(|s| s.documents.is_empty());
    if needs_model {
        require_api_key(&config)?;
    }

    let cancel = cancel_on_ctrl_c();
    let result = services.sdks.guide(&sdk, &topic, &cancel).await?;

    print_content(&result);
    Ok(())
}
