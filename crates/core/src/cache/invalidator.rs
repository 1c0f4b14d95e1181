//! Invalidation coordinator.
//!
//! Every account or flow mutation routes through here before the change
//! notification goes out. Invalidation is unconditional and coarse: all
//! cached metrics of an affected account are dropped and the next read
//! recomputes lazily. A failed delete is logged and swallowed - it leaves a
//! transient staleness risk, not a broken mutation.

use std::sync::Arc;

use log::{debug, error};

use super::cache_store::{account_key_prefix, CacheStoreTrait};
use crate::flows::Flow;

pub struct InvalidationCoordinator {
    cache: Arc<dyn CacheStoreTrait>,
}

impl InvalidationCoordinator {
    pub fn new(cache: Arc<dyn CacheStoreTrait>) -> Self {
        Self { cache }
    }

    /// Drops every cached metric of one account. Returns the number of
    /// entries removed (0 when nothing was cached or the delete failed).
    pub async fn invalidate_account(&self, account_id: &str) -> usize {
        let prefix = account_key_prefix(account_id);
        match self.cache.delete_matching(&prefix).await {
            Ok(removed) => {
                debug!("invalidated {removed} cached metrics for account {account_id}");
                removed
            }
            Err(e) => {
                error!("cache invalidation for account {account_id} failed: {e}");
                0
            }
        }
    }

    /// Drops the cached metrics of both endpoints of a flow. A missing
    /// endpoint reference is skipped; the two deletes are not atomic with
    /// respect to each other.
    pub async fn invalidate_flow_endpoints(&self, flow: &Flow) -> usize {
        let mut removed = 0;
        if let Some(account_id) = flow.to_account_id.as_deref() {
            removed += self.invalidate_account(account_id).await;
        }
        if let Some(account_id) = flow.from_account_id.as_deref() {
            removed += self.invalidate_account(account_id).await;
        }
        removed
    }
}
