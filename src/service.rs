//! Tiered image resolution and invalidation
//!
//! The resolver answers a (name, tier) request from the cheapest tier
//! that has it: the processed-variant store first, the raw-original store
//! next, the remote origin last. Every fallback immediately repairs the
//! cheaper tiers (write-through), so the next request for the same key is
//! a single lookup.
//!
//! The resolver holds no state of its own; all state lives in the durable
//! store and the read-only catalog, so concurrent requests are safe
//! without locks. Concurrent cold-cache requests for the same key may
//! race through fetch-and-transform and issue duplicate writes; the store
//! gives last-writer-wins over deterministically derived bytes, so the
//! races are wasteful but harmless.

use crate::error::ImgcacheResult;
use crate::loader::ImageLoader;
use crate::profile::ORIGINAL_TIER;
use crate::storage::{shard_path, FileStore};
use crate::transform::ImageProcessor;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves and invalidates cached image variants
pub struct ImageService {
    store: Arc<dyn FileStore>,
    processor: Arc<dyn ImageProcessor>,
    loader: Arc<dyn ImageLoader>,
}

impl ImageService {
    pub fn new(
        store: Arc<dyn FileStore>,
        processor: Arc<dyn ImageProcessor>,
        loader: Arc<dyn ImageLoader>,
    ) -> Self {
        Self {
            store,
            processor,
            loader,
        }
    }

    /// Resolve the bytes for `name` rendered under `tier_name`.
    ///
    /// Lookup order is processed variant, raw original, origin; each
    /// successful fallback writes the missing tiers back before
    /// returning. Only a storage miss falls through to the next tier —
    /// any other storage error is fatal for the request, as is a repair
    /// write that still fails after retries.
    pub async fn resolve(&self, name: &str, tier_name: &str) -> ImgcacheResult<Bytes> {
        let safe_name = sanitize(name);
        let shard = shard_path(&safe_name);

        let processed_key = format!("{tier_name}{shard}{safe_name}");
        match self.store.get(&processed_key).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) if e.is_not_found() => {
                debug!(key = %processed_key, "no processed variant cached")
            }
            Err(e) => return Err(e),
        }

        let raw_key = format!("{ORIGINAL_TIER}{shard}{safe_name}");
        match self.store.get(&raw_key).await {
            Ok(raw) => {
                let processed = self.processor.process(&raw, tier_name)?;
                self.store.put(processed.clone(), &processed_key).await?;
                info!(key = %processed_key, "processed variant rendered from cached original");
                return Ok(processed);
            }
            Err(e) if e.is_not_found() => debug!(key = %raw_key, "no original cached"),
            Err(e) => return Err(e),
        }

        // the origin is addressed by logical name, not by storage key
        let raw = self.loader.fetch(name).await?;
        self.store.put(raw.clone(), &raw_key).await?;
        let processed = self.processor.process(&raw, tier_name)?;
        self.store.put(processed.clone(), &processed_key).await?;
        info!(key = %processed_key, "image fetched from origin and cached");
        Ok(processed)
    }

    /// Remove cached data for `name` under `tier_name`.
    ///
    /// Flushing a variant tier removes that one key. Flushing the
    /// reserved `original` tier removes the raw copy and every variant in
    /// one best-effort batch, since all derivatives become stale with it.
    pub async fn invalidate(&self, name: &str, tier_name: &str) -> ImgcacheResult<()> {
        let safe_name = sanitize(name);
        let shard = shard_path(&safe_name);

        if tier_name != ORIGINAL_TIER {
            let key = format!("{tier_name}{shard}{safe_name}");
            self.store.delete_one(&key).await?;
            info!(key, "variant flushed");
            return Ok(());
        }

        let mut keys: Vec<String> = self
            .processor
            .profile_names()
            .into_iter()
            .map(|profile| format!("{profile}{shard}{safe_name}"))
            .collect();
        keys.push(format!("{ORIGINAL_TIER}{shard}{safe_name}"));
        self.store.delete_many(&keys).await?;
        info!(name = safe_name, count = keys.len(), "original and all variants flushed");
        Ok(())
    }
}

/// Path separators in a logical name would nest storage keys and open
/// traversal tricks; flatten them before any key is derived.
fn sanitize(name: &str) -> String {
    name.replace('/', "_")
}
