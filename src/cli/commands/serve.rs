//! Serve command - run the HTTP cache server

use crate::api;
use crate::cli::args::ServeArgs;
use crate::cli::commands::build_app_state;
use crate::config::Config;
use crate::error::{ImgcacheError, ImgcacheResult};
use tracing::info;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: &Config) -> ImgcacheResult<()> {
    if config.source.base_url.is_none() {
        return Err(ImgcacheError::ConfigValue(
            "source.base_url must be set before serving".to_string(),
        ));
    }

    let state = build_app_state(config)?;
    let bind = args.bind.as_deref().unwrap_or(&config.server.bind);
    info!(
        profiles = state.catalog.len(),
        storage = %config.storage.url,
        "starting imgcache server"
    );

    api::serve(bind, state).await
}
