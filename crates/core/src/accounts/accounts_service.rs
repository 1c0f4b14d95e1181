//! Account service.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::balances::BalanceServiceTrait;
use crate::cache::InvalidationCoordinator;
use crate::errors::{Error, Result};
use crate::events::{ChangeEvent, ChangeNotifier};
use crate::resource::OwnedResource;

/// Service for managing accounts.
///
/// Mutations follow a fixed order: ledger write, cache invalidation,
/// change notification. Reads enrich the account with its derived balance
/// fields before returning it.
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
    balances: Arc<dyn BalanceServiceTrait>,
    invalidator: Arc<InvalidationCoordinator>,
    notifier: Arc<ChangeNotifier>,
}

impl AccountService {
    pub fn new(
        repository: Arc<dyn AccountRepositoryTrait>,
        balances: Arc<dyn BalanceServiceTrait>,
        invalidator: Arc<InvalidationCoordinator>,
        notifier: Arc<ChangeNotifier>,
    ) -> Self {
        Self {
            repository,
            balances,
            invalidator,
            notifier,
        }
    }

    async fn after_mutation(&self, account_id: &str, event: ChangeEvent) {
        self.invalidator.invalidate_account(account_id).await;
        self.notifier.notify(event).await;
    }
}

#[async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, owner_id: &str, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        debug!("Creating account '{}' for owner {owner_id}", new_account.name);

        let account = Account {
            resource: OwnedResource::new(new_account.id, owner_id),
            name: new_account.name,
            account_type: new_account.account_type,
            is_principal: new_account.is_principal,
            actual_balance: new_account.actual_balance,
            goal_balance: new_account.goal_balance,
            accrued_balance: None,
            planned_balance: None,
        };

        let mut saved = self.repository.create(account).await?;
        let account_id = saved.id().to_string();
        self.after_mutation(&account_id, ChangeEvent::account_saved(owner_id, account_id.as_str()))
            .await;

        self.balances.enrich_account(&mut saved).await?;
        Ok(saved)
    }

    async fn update_account(&self, owner_id: &str, update: AccountUpdate) -> Result<Account> {
        update.validate()?;
        let account_id = update.id.as_deref().unwrap_or_default();

        let mut account = self
            .repository
            .find_by_id(account_id, owner_id)?
            .ok_or_else(|| Error::NotFound(format!("Account {account_id}")))?;

        account.name = update.name;
        account.account_type = update.account_type;
        account.is_principal = update.is_principal;
        account.actual_balance = update.actual_balance;
        account.goal_balance = update.goal_balance;
        account.resource.touch();

        let mut saved = self.repository.update(account).await?;
        self.after_mutation(account_id, ChangeEvent::account_saved(owner_id, account_id))
            .await;

        self.balances.enrich_account(&mut saved).await?;
        Ok(saved)
    }

    async fn delete_account(&self, owner_id: &str, account_id: &str) -> Result<()> {
        self.repository
            .find_by_id(account_id, owner_id)?
            .ok_or_else(|| Error::NotFound(format!("Account {account_id}")))?;

        self.repository.delete(account_id).await?;
        self.after_mutation(account_id, ChangeEvent::account_deleted(owner_id, account_id))
            .await;
        Ok(())
    }

    async fn get_account(&self, owner_id: &str, account_id: &str) -> Result<Account> {
        let mut account = self
            .repository
            .find_by_id(account_id, owner_id)?
            .ok_or_else(|| Error::NotFound(format!("Account {account_id}")))?;

        self.balances.enrich_account(&mut account).await?;
        Ok(account)
    }

    async fn list_accounts(&self, owner_id: &str) -> Result<Vec<Account>> {
        let mut accounts = self.repository.list_by_owner(owner_id)?;
        self.balances.enrich_accounts(&mut accounts).await?;
        Ok(accounts)
    }
}
