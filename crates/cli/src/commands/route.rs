//! `docroute route`: Route a query over any namespace.

use docroute_engine::RouteQuery;

use super::{CmdResult, build_services, cancel_on_ctrl_c, load_config, print_content, require_api_key};

pub async fn run(query: String, namespace: String, max: usize) -> CmdResult {
    let config = load_config()?;
    require_api_key(&config)?;
    let services = build_services(&config)?;

    let cancel = cancel_on_ctrl_c();
    let result = services
        .router
        .route(&RouteQuery::new(query, namespace, max.max(1)), &cancel)
        .await?;

    print_content(&result);
    Ok(())
}
