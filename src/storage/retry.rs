//! Write-path retry policy
//!
//! Repairing a cache tier is the one storage operation worth retrying:
//! skipping a failed write would make every later request redo the same
//! fetch and transform. Client-class failures propagate immediately;
//! transient failures are retried with a fixed inter-attempt delay until
//! the attempt budget is spent.

use crate::error::ImgcacheResult;
use std::future::Future;
use std::time::Duration;
use tracing::info;

/// Fixed-delay retry policy for storage writes
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first try
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            // zero attempts would mean never trying at all
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}

/// Run a storage write, retrying transient failures per the policy.
///
/// Only errors classified transient ([`crate::ImgcacheError::is_transient_storage`])
/// are retried; anything else, and the last failure once attempts are
/// exhausted, propagates to the caller.
pub async fn retry_put<F, Fut>(policy: &RetryPolicy, key: &str, mut op: F) -> ImgcacheResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ImgcacheResult<()>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient_storage() && attempt < policy.max_attempts => {
                info!(key, attempt, error = %e, "storage put failed, retrying");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
