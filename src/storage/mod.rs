//! Durable blob storage
//!
//! All cache state lives here: raw originals under the `original/` tier
//! and processed variants under one tier per profile. Keys are plain
//! slash-delimited paths of the form `<tier><shard><name>` with the shard
//! computed by [`location::shard_path`].
//!
//! The [`FileStore`] trait is the capability seam; [`ObjectFileStore`] is
//! the production implementation over any `object_store` URL. Writes get
//! an at-least-once retry policy ([`retry`]); reads and deletes do not —
//! a failed read on the miss path is just a miss that falls through.

pub mod location;
pub mod object;
pub mod retry;

pub use location::shard_path;
pub use object::ObjectFileStore;
pub use retry::RetryPolicy;

use crate::error::ImgcacheResult;
use async_trait::async_trait;
use bytes::Bytes;

/// CRUD operations over opaque byte blobs keyed by path
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Read one item. Fails with `NotFound` when the key has no data.
    async fn get(&self, key: &str) -> ImgcacheResult<Bytes>;

    /// Create or overwrite one item. Implementations retry transient
    /// failures per their configured policy.
    async fn put(&self, data: Bytes, key: &str) -> ImgcacheResult<()>;

    /// Delete one item. Deleting an absent key is not an error.
    async fn delete_one(&self, key: &str) -> ImgcacheResult<()>;

    /// Delete many items, best-effort: per-key failures are logged and do
    /// not abort the batch.
    async fn delete_many(&self, keys: &[String]) -> ImgcacheResult<()>;
}
