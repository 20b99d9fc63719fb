//! Object-store backed implementation of [`FileStore`]
//!
//! The backend is selected by URL: `file:///path` for a local tree,
//! `s3://bucket/prefix` for a production bucket, `memory:///` for tests.
//! Everything behind the URL is `object_store`'s problem (credentials,
//! timeouts, multipart); this layer maps its errors onto the imgcache
//! taxonomy and applies the write retry policy.

use crate::error::{ImgcacheError, ImgcacheResult};
use crate::storage::retry::{self, RetryPolicy};
use crate::storage::FileStore;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use object_store::path::Path as StorePath;
use object_store::ObjectStore;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// [`FileStore`] over any `object_store` backend
pub struct ObjectFileStore {
    store: Arc<dyn ObjectStore>,
    base: StorePath,
    retry: RetryPolicy,
}

impl ObjectFileStore {
    /// Build a store from a backend URL, e.g. `file:///var/cache/imgcache`
    /// or `s3://images-bucket/cache`.
    pub fn from_url(url_str: &str, retry: RetryPolicy) -> ImgcacheResult<Self> {
        let url = Url::parse(url_str).map_err(|e| {
            ImgcacheError::ConfigValue(format!("invalid storage url {url_str}: {e}"))
        })?;
        let (store, base) = object_store::parse_url(&url).map_err(|e| {
            ImgcacheError::ConfigValue(format!("unsupported storage url {url_str}: {e}"))
        })?;
        debug!(url = url_str, "object store initialized");
        Ok(Self {
            store: Arc::from(store),
            base,
            retry,
        })
    }

    fn location(&self, key: &str) -> StorePath {
        if self.base.as_ref().is_empty() {
            StorePath::from(key)
        } else {
            StorePath::from(format!("{}/{}", self.base, key))
        }
    }

    /// Map a backend error onto the taxonomy. Misses become `NotFound`;
    /// everything else is split into client-class (never retried) and
    /// transient (retried on the write path).
    fn classify(key: &str, error: object_store::Error) -> ImgcacheError {
        use object_store::Error as StoreError;
        match error {
            StoreError::NotFound { .. } => ImgcacheError::NotFound {
                key: key.to_string(),
            },
            e @ (StoreError::InvalidPath { .. }
            | StoreError::NotSupported { .. }
            | StoreError::AlreadyExists { .. }
            | StoreError::Precondition { .. }
            | StoreError::NotModified { .. }
            | StoreError::NotImplemented
            | StoreError::PermissionDenied { .. }
            | StoreError::Unauthenticated { .. }
            | StoreError::UnknownConfigurationKey { .. }) => ImgcacheError::StorageRejected {
                key: key.to_string(),
                source: e,
            },
            e => ImgcacheError::StorageUnavailable {
                key: key.to_string(),
                source: e,
            },
        }
    }
}

#[async_trait]
impl FileStore for ObjectFileStore {
    async fn get(&self, key: &str) -> ImgcacheResult<Bytes> {
        let result = self
            .store
            .get(&self.location(key))
            .await
            .map_err(|e| Self::classify(key, e))?;
        result.bytes().await.map_err(|e| Self::classify(key, e))
    }

    async fn put(&self, data: Bytes, key: &str) -> ImgcacheResult<()> {
        let location = self.location(key);
        retry::retry_put(&self.retry, key, || {
            let store = Arc::clone(&self.store);
            let location = location.clone();
            let payload = data.clone();
            async move {
                store
                    .put(&location, payload.into())
                    .await
                    .map(|_| ())
                    .map_err(|e| Self::classify(key, e))
            }
        })
        .await
    }

    async fn delete_one(&self, key: &str) -> ImgcacheResult<()> {
        match self.store.delete(&self.location(key)).await {
            Ok(()) => Ok(()),
            // deleting an absent key is a no-op, matching bucket semantics
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(Self::classify(key, e)),
        }
    }

    async fn delete_many(&self, keys: &[String]) -> ImgcacheResult<()> {
        let locations = stream::iter(keys.iter().map(|k| Ok(self.location(k)))).boxed();
        let results: Vec<_> = self.store.delete_stream(locations).collect().await;
        for result in results {
            match result {
                Ok(_) | Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => warn!(error = %e, "delete failed for one key in batch"),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn memory_store() -> ObjectFileStore {
        ObjectFileStore::from_url("memory:///", RetryPolicy::default()).unwrap()
    }

    #[tokio::test]
    async fn put_get_roundtrip() {
        let store = memory_store();
        store
            .put(Bytes::from_static(b"pixels"), "thumbnail/abcd/abcdef.jpg")
            .await
            .unwrap();
        let data = store.get("thumbnail/abcd/abcdef.jpg").await.unwrap();
        assert_eq!(data.as_ref(), b"pixels");
    }

    #[tokio::test]
    async fn missing_key_maps_to_not_found() {
        let store = memory_store();
        let err = store.get("original/nothing.jpg").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_one_tolerates_absent_key() {
        let store = memory_store();
        store.delete_one("original/nothing.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn delete_many_removes_present_keys() {
        let store = memory_store();
        store.put(Bytes::from_static(b"a"), "t1/x.jpg").await.unwrap();
        store.put(Bytes::from_static(b"b"), "t2/x.jpg").await.unwrap();
        store
            .delete_many(&[
                "t1/x.jpg".to_string(),
                "t2/x.jpg".to_string(),
                "t3/x.jpg".to_string(),
            ])
            .await
            .unwrap();
        assert!(store.get("t1/x.jpg").await.unwrap_err().is_not_found());
        assert!(store.get("t2/x.jpg").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn file_backend_persists_under_prefix() {
        let dir = TempDir::new().unwrap();
        let url = format!("file://{}", dir.path().display());
        let store = ObjectFileStore::from_url(&url, RetryPolicy::default()).unwrap();
        store
            .put(Bytes::from_static(b"raw"), "original/abcd/abcdef.jpg")
            .await
            .unwrap();
        let on_disk = dir.path().join("original/abcd/abcdef.jpg");
        assert!(on_disk.exists());
        let data = store.get("original/abcd/abcdef.jpg").await.unwrap();
        assert_eq!(data.as_ref(), b"raw");
    }

    #[test]
    fn bad_url_is_config_error() {
        let result = ObjectFileStore::from_url("not a url", RetryPolicy::default());
        assert!(matches!(result, Err(ImgcacheError::ConfigValue(_))));
    }
}
