//! Shared fakes and builders for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::broadcast;

use crate::accounts::{Account, AccountRepositoryTrait, AccountType};
use crate::cache::CacheStoreTrait;
use crate::errors::{Error, Result};
use crate::events::PubSubTrait;
use crate::flows::{Flow, FlowFilter, FlowRepositoryTrait};
use crate::resource::OwnedResource;
use crate::utils::time_utils;

// --- Builders ---

pub(crate) fn account(
    id: &str,
    owner_id: &str,
    account_type: AccountType,
    actual_balance: Decimal,
) -> Account {
    Account {
        resource: OwnedResource::new(Some(id.to_string()), owner_id),
        name: format!("Account {id}"),
        account_type,
        is_principal: false,
        actual_balance,
        goal_balance: None,
        accrued_balance: None,
        planned_balance: None,
    }
}

pub(crate) fn flow_between(owner_id: &str, from: &str, to: &str) -> Flow {
    Flow {
        resource: OwnedResource::new(None, owner_id),
        description: format!("{from} -> {to}"),
        amount: Decimal::TEN,
        paid: false,
        scheduled: false,
        from_account_id: Some(from.to_string()),
        to_account_id: Some(to.to_string()),
        date_due: time_utils::today(),
        date_cancelled: None,
        parent_flow_id: None,
    }
}

pub(crate) fn flow_due(
    owner_id: &str,
    from: &str,
    to: &str,
    amount: Decimal,
    date_due: NaiveDate,
) -> Flow {
    Flow {
        amount,
        date_due,
        ..flow_between(owner_id, from, to)
    }
}

// --- In-memory account repository ---

#[derive(Default)]
pub(crate) struct MemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryAccountRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, account: Account) {
        self.accounts.lock().unwrap().push(account);
    }

    /// Owner-agnostic lookup, for filter matching on account type.
    pub(crate) fn get_any(&self, account_id: &str) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id() == account_id)
            .cloned()
    }
}

#[async_trait]
impl AccountRepositoryTrait for MemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account> {
        self.insert(account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        let slot = accounts
            .iter_mut()
            .find(|a| a.id() == account.id())
            .ok_or_else(|| Error::Repository(format!("no account {}", account.id())))?;
        *slot = account.clone();
        Ok(account)
    }

    async fn delete(&self, account_id: &str) -> Result<usize> {
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| a.id() != account_id);
        Ok(before - accounts.len())
    }

    fn find_by_id(&self, account_id: &str, owner_id: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id() == account_id && a.owner_id() == owner_id)
            .cloned())
    }

    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.owner_id() == owner_id)
            .cloned()
            .collect())
    }
}

// --- In-memory flow repository ---

pub(crate) struct MemoryFlowRepository {
    flows: Mutex<Vec<Flow>>,
    accounts: Arc<MemoryAccountRepository>,
}

impl MemoryFlowRepository {
    pub(crate) fn new(accounts: Arc<MemoryAccountRepository>) -> Self {
        Self {
            flows: Mutex::new(Vec::new()),
            accounts,
        }
    }

    pub(crate) fn insert(&self, flow: Flow) {
        self.flows.lock().unwrap().push(flow);
    }

    fn matches(&self, flow: &Flow, filter: &FlowFilter) -> bool {
        if let Some(owner_id) = &filter.owner_id {
            if flow.owner_id() != owner_id {
                return false;
            }
        }
        if let Some(from) = &filter.from_account_id {
            if flow.from_account_id.as_deref() != Some(from.as_str()) {
                return false;
            }
        }
        if let Some(to) = &filter.to_account_id {
            if flow.to_account_id.as_deref() != Some(to.as_str()) {
                return false;
            }
        }
        if let Some(parent) = &filter.parent_flow_id {
            if flow.parent_flow_id.as_deref() != Some(parent.as_str()) {
                return false;
            }
        }
        if let Some(account_type) = filter.to_account_type {
            let linked_type = flow
                .to_account_id
                .as_deref()
                .and_then(|id| self.accounts.get_any(id))
                .map(|a| a.account_type);
            if linked_type != Some(account_type) {
                return false;
            }
        }
        if let Some((start, end)) = filter.due_between {
            if flow.date_due < start || flow.date_due > end {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl FlowRepositoryTrait for MemoryFlowRepository {
    async fn create(&self, flow: Flow) -> Result<Flow> {
        self.insert(flow.clone());
        Ok(flow)
    }

    async fn update(&self, flow: Flow) -> Result<Flow> {
        let mut flows = self.flows.lock().unwrap();
        let slot = flows
            .iter_mut()
            .find(|f| f.id() == flow.id())
            .ok_or_else(|| Error::Repository(format!("no flow {}", flow.id())))?;
        *slot = flow.clone();
        Ok(flow)
    }

    async fn delete(&self, flow_id: &str) -> Result<usize> {
        let mut flows = self.flows.lock().unwrap();
        let before = flows.len();
        flows.retain(|f| f.id() != flow_id);
        Ok(before - flows.len())
    }

    fn find_by_id(&self, flow_id: &str, owner_id: &str) -> Result<Option<Flow>> {
        Ok(self
            .flows
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id() == flow_id && f.owner_id() == owner_id)
            .cloned())
    }

    fn find(&self, filter: &FlowFilter) -> Result<Vec<Flow>> {
        Ok(self
            .flows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| self.matches(f, filter))
            .cloned()
            .collect())
    }
}

// --- Side-effect recording fakes ---

/// Append-only log shared between fakes, to assert cross-component
/// ordering (invalidate before notify).
pub(crate) type SideEffectLog = Arc<Mutex<Vec<String>>>;

pub(crate) struct RecordingCacheStore {
    pub(crate) log: SideEffectLog,
}

#[async_trait]
impl CacheStoreTrait for RecordingCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.log.lock().unwrap().push(format!("cache.get {key}"));
        Ok(None)
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        self.log.lock().unwrap().push(format!("cache.set {key}"));
        Ok(())
    }

    async fn delete_matching(&self, key_prefix: &str) -> Result<usize> {
        self.log
            .lock()
            .unwrap()
            .push(format!("cache.delete {key_prefix}"));
        Ok(0)
    }
}

pub(crate) struct RecordingPubSub {
    pub(crate) log: SideEffectLog,
}

#[async_trait]
impl PubSubTrait for RecordingPubSub {
    async fn publish(&self, channel: &str, payload: &str) -> Result<usize> {
        self.log
            .lock()
            .unwrap()
            .push(format!("pubsub.publish {channel} {payload}"));
        Ok(0)
    }

    fn subscribe(&self, _channel: &str) -> broadcast::Receiver<String> {
        broadcast::channel(1).1
    }
}

/// Cache store whose every operation fails, to exercise the degraded
/// always-recompute path.
pub(crate) struct FailingCacheStore;

#[async_trait]
impl CacheStoreTrait for FailingCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::CacheUnavailable("store offline".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::CacheUnavailable("store offline".to_string()))
    }

    async fn delete_matching(&self, _key_prefix: &str) -> Result<usize> {
        Err(Error::CacheUnavailable("store offline".to_string()))
    }
}
