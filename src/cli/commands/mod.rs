//! CLI command implementations

pub mod fetch;
pub mod flush;
pub mod profiles;
pub mod serve;

pub use fetch::execute as fetch;
pub use flush::execute as flush;
pub use profiles::execute as profiles;
pub use serve::execute as serve;

use crate::api::AppState;
use crate::config::Config;
use crate::error::ImgcacheResult;
use crate::loader::{HttpImageLoader, ImageLoader, NoOriginLoader};
use crate::profile::ProfileCatalog;
use crate::service::ImageService;
use crate::storage::{ObjectFileStore, RetryPolicy};
use crate::transform::Transformer;
use crate::validate::RequestValidator;
use std::sync::Arc;
use std::time::Duration;

/// Wire catalog, store, loader, and service from configuration.
///
/// Commands that never reach the origin (flush, cache-hit fetches) work
/// without `source.base_url`; a cold fetch through [`NoOriginLoader`]
/// reports the missing setting instead.
pub(crate) fn build_app_state(config: &Config) -> ImgcacheResult<AppState> {
    let catalog = Arc::new(ProfileCatalog::builtin()?);

    let retry = RetryPolicy::new(
        config.storage.retry.max_attempts,
        Duration::from_millis(config.storage.retry.delay_ms),
    );
    let store = Arc::new(ObjectFileStore::from_url(&config.storage.url, retry)?);

    let loader: Arc<dyn ImageLoader> = match &config.source.base_url {
        Some(base_url) => Arc::new(HttpImageLoader::new(
            base_url.clone(),
            Duration::from_secs(config.source.timeout_secs),
        )?),
        None => Arc::new(NoOriginLoader),
    };

    let service = Arc::new(ImageService::new(
        store,
        Arc::new(Transformer::new(Arc::clone(&catalog))),
        loader,
    ));

    Ok(AppState {
        service,
        validator: Arc::new(RequestValidator::new(Arc::clone(&catalog))),
        catalog,
    })
}
