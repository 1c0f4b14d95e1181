//! Balance enrichment service: cache read-through over the pure
//! calculator.
//!
//! Each derived metric is cached under its own key and recomputed lazily
//! on miss. Entries carry no TTL, so a cached accrued/planned figure can go
//! stale purely because the clock crossed a due date; it stays stale until
//! the next mutation-triggered invalidation clears it. That window is a
//! known, accepted trade (see the design notes) - the cache is consistent
//! with the ledger under every mutation path, just not under the passage
//! of time alone.
//!
//! A cache outage never fails a read: the service degrades to always-miss
//! and returns freshly computed values, logging the store errors.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use super::balances_calculator::calculate_balances;
use super::balances_model::AccountBalances;
use crate::accounts::{Account, AccountRepositoryTrait};
use crate::cache::{account_metric_key, CacheStoreTrait};
use crate::constants::{
    METRIC_ACCRUED_BALANCE, METRIC_ACTUAL_BALANCE, METRIC_PLANNED_BALANCE,
};
use crate::errors::Result;
use crate::flows::{FlowFilter, FlowRepositoryTrait};
use crate::utils::time_utils;

/// Trait defining the contract for balance enrichment.
#[async_trait]
pub trait BalanceServiceTrait: Send + Sync {
    /// Populates the derived balance fields of one account.
    async fn enrich_account(&self, account: &mut Account) -> Result<()>;

    /// Populates the derived balance fields of a batch of accounts.
    ///
    /// Fails the whole batch on the first computation error rather than
    /// leaving a mixed enriched/unenriched view.
    async fn enrich_accounts(&self, accounts: &mut [Account]) -> Result<()>;
}

pub struct BalanceService {
    accounts: Arc<dyn AccountRepositoryTrait>,
    flows: Arc<dyn FlowRepositoryTrait>,
    cache: Arc<dyn CacheStoreTrait>,
}

impl BalanceService {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        flows: Arc<dyn FlowRepositoryTrait>,
        cache: Arc<dyn CacheStoreTrait>,
    ) -> Self {
        Self {
            accounts,
            flows,
            cache,
        }
    }

    /// Ids of every virtual account in the owner's ledger, for the
    /// virtual-linked accrual exception.
    fn virtual_account_ids(&self, owner_id: &str) -> Result<HashSet<String>> {
        Ok(self
            .accounts
            .list_by_owner(owner_id)?
            .into_iter()
            .filter(|a| a.is_virtual())
            .map(|a| a.resource.id)
            .collect())
    }

    /// Populates the derived fields from the cache where possible. The
    /// flow set is loaded and the calculator runs only when at least one
    /// metric misses; a read whose metrics are all cached never touches
    /// the ledger.
    async fn enrich_with(
        &self,
        account: &mut Account,
        virtual_accounts: &HashSet<String>,
        as_of: NaiveDate,
    ) -> Result<()> {
        let account_id = account.id().to_string();

        if account.is_virtual() {
            let actual = self.cached_metric(&account_id, METRIC_ACTUAL_BALANCE).await;
            let accrued = self.cached_metric(&account_id, METRIC_ACCRUED_BALANCE).await;
            let planned = self.cached_metric(&account_id, METRIC_PLANNED_BALANCE).await;

            if let (Some(actual), Some(accrued), Some(planned)) = (actual, accrued, planned) {
                account.actual_balance = actual;
                account.accrued_balance = Some(accrued);
                account.planned_balance = Some(planned);
                return Ok(());
            }

            let computed = self.compute(account, virtual_accounts, as_of)?;
            account.actual_balance = match actual {
                Some(value) => value,
                None => {
                    self.write_back(&account_id, METRIC_ACTUAL_BALANCE, computed.actual)
                        .await
                }
            };
            account.accrued_balance = Some(match accrued {
                Some(value) => value,
                None => {
                    self.write_back(&account_id, METRIC_ACCRUED_BALANCE, computed.accrued)
                        .await
                }
            });
            account.planned_balance = Some(match planned {
                Some(value) => value,
                None => {
                    self.write_back(
                        &account_id,
                        METRIC_PLANNED_BALANCE,
                        computed.planned.unwrap_or_default(),
                    )
                    .await
                }
            });
        } else {
            if let Some(accrued) = self.cached_metric(&account_id, METRIC_ACCRUED_BALANCE).await {
                account.accrued_balance = Some(accrued);
                account.planned_balance = None;
                return Ok(());
            }

            let computed = self.compute(account, virtual_accounts, as_of)?;
            account.accrued_balance = Some(
                self.write_back(&account_id, METRIC_ACCRUED_BALANCE, computed.accrued)
                    .await,
            );
            account.planned_balance = None;
        }
        Ok(())
    }

    /// Loads the account's flow sets and runs the calculator.
    fn compute(
        &self,
        account: &Account,
        virtual_accounts: &HashSet<String>,
        as_of: NaiveDate,
    ) -> Result<AccountBalances> {
        let inflows = self.flows.find(
            &FlowFilter::for_owner(account.owner_id()).into_account(account.id()),
        )?;
        let outflows = self.flows.find(
            &FlowFilter::for_owner(account.owner_id()).out_of_account(account.id()),
        )?;
        calculate_balances(account, &inflows, &outflows, virtual_accounts, as_of)
    }

    /// Reads one cached metric. An unparsable entry is discarded and a
    /// store failure degrades to a miss; both are logged.
    async fn cached_metric(&self, account_id: &str, metric: &str) -> Option<Decimal> {
        let key = account_metric_key(account_id, metric);
        match self.cache.get(&key).await {
            Ok(Some(raw)) => match raw.parse::<Decimal>() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("discarding unparsable cache entry {key} ({raw:?}): {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("cache read for {key} failed, recomputing: {e}");
                None
            }
        }
    }

    /// Writes a freshly computed metric back, best-effort. A failed write
    /// is logged and the value is returned regardless.
    async fn write_back(&self, account_id: &str, metric: &str, value: Decimal) -> Decimal {
        let key = account_metric_key(account_id, metric);
        if let Err(e) = self.cache.set(&key, &value.to_string()).await {
            warn!("failed to write {key} back to cache: {e}");
        }
        value
    }
}

#[async_trait]
impl BalanceServiceTrait for BalanceService {
    async fn enrich_account(&self, account: &mut Account) -> Result<()> {
        let virtual_accounts = self.virtual_account_ids(account.owner_id())?;
        self.enrich_with(account, &virtual_accounts, time_utils::today())
            .await
    }

    async fn enrich_accounts(&self, accounts: &mut [Account]) -> Result<()> {
        let Some(first) = accounts.first() else {
            return Ok(());
        };
        let virtual_accounts = self.virtual_account_ids(first.owner_id())?;
        let as_of = time_utils::today();

        for account in accounts.iter_mut() {
            self.enrich_with(account, &virtual_accounts, as_of).await?;
        }
        Ok(())
    }
}
