//! Origin image loading
//!
//! When neither cache tier has an image, the raw bytes are fetched from
//! the configured origin. Origins are addressed by the logical image name
//! exactly as the client sent it, never by storage key.

use crate::error::{ImgcacheError, ImgcacheResult};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Capability to fetch raw image bytes for a logical name
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Fetch one image. Fails with `NotFoundInSource` when the origin
    /// does not know the name, and `Loader` when the origin is broken or
    /// unreachable — distinct kinds so callers can tell the two apart.
    async fn fetch(&self, name: &str) -> ImgcacheResult<Bytes>;
}

/// [`ImageLoader`] over plain HTTP GET against a base URL
pub struct HttpImageLoader {
    client: reqwest::Client,
    base_url: String,
}

impl HttpImageLoader {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ImgcacheResult<Self> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImgcacheError::Loader {
                detail: "failed to build HTTP client".to_string(),
                source: Some(e),
            })?;
        debug!(base_url, "origin loader initialized");
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn fetch(&self, name: &str) -> ImgcacheResult<Bytes> {
        let url = format!("{}/{}", self.base_url, name);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ImgcacheError::Loader {
                detail: format!("GET {url} failed"),
                source: Some(e),
            })?;
        match response.status() {
            StatusCode::OK => response.bytes().await.map_err(|e| ImgcacheError::Loader {
                detail: format!("reading body of GET {url} failed"),
                source: Some(e),
            }),
            StatusCode::NOT_FOUND => Err(ImgcacheError::NotFoundInSource {
                name: name.to_string(),
            }),
            status => Err(ImgcacheError::loader(format!(
                "GET {url} returned {status}"
            ))),
        }
    }
}

/// Loader used when no origin is configured. Cache hits never reach it;
/// a cold miss reports the missing setting instead of guessing a URL.
pub struct NoOriginLoader;

#[async_trait]
impl ImageLoader for NoOriginLoader {
    async fn fetch(&self, _name: &str) -> ImgcacheResult<Bytes> {
        Err(ImgcacheError::ConfigValue(
            "source.base_url is not set, cannot fetch from origin".to_string(),
        ))
    }
}
