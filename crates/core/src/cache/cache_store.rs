//! Cache store adapter and key grammar.
//!
//! Derived balances are cached under `account:<accountId>:<metric>` keys
//! with decimal text values. Entries carry no TTL: they live until a
//! mutation-triggered invalidation deletes them. The adapter only needs
//! point get/set and a prefix-scoped bulk delete, so a redis-style store,
//! an embedded KV, or the in-memory map below can all sit behind it.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::constants::{
    ACCOUNT_CACHE_NAMESPACE, METRIC_ACCRUED_BALANCE, METRIC_ACTUAL_BALANCE,
    METRIC_PLANNED_BALANCE,
};
use crate::errors::Result;

/// Builds the cache key for one account metric.
pub fn account_metric_key(account_id: &str, metric: &str) -> String {
    format!("{ACCOUNT_CACHE_NAMESPACE}:{account_id}:{metric}")
}

/// Prefix matching every cached metric of an account. The trailing
/// delimiter is part of the prefix so `account:a` never matches keys of
/// `account:ab`.
pub fn account_key_prefix(account_id: &str) -> String {
    format!("{ACCOUNT_CACHE_NAMESPACE}:{account_id}:")
}

/// All metric names an account may have cached.
pub const ACCOUNT_METRICS: [&str; 3] = [
    METRIC_ACTUAL_BALANCE,
    METRIC_ACCRUED_BALANCE,
    METRIC_PLANNED_BALANCE,
];

/// Trait defining the contract for the derived-balance cache store.
///
/// Implementations must make `delete_matching` idempotent: deleting keys
/// that are already absent is a no-op, so invalidation can always be
/// retried safely.
#[async_trait]
pub trait CacheStoreTrait: Send + Sync {
    /// Reads a value, `None` on miss.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value, overwriting any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes every key starting with `key_prefix`.
    ///
    /// Returns the number of keys actually removed.
    async fn delete_matching(&self, key_prefix: &str) -> Result<usize>;
}

/// In-memory cache store on a concurrent map.
///
/// Backs tests and single-process deployments; production deployments
/// substitute a shared store behind the same trait.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, String>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries, for inspection in tests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStoreTrait for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_matching(&self, key_prefix: &str) -> Result<usize> {
        let matched: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(key_prefix))
            .map(|entry| entry.key().clone())
            .collect();
        let mut removed = 0;
        for key in matched {
            if self.entries.remove(&key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
