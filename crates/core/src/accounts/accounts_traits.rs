//! Account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use crate::errors::Result;

/// Trait defining the contract for account persistence.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Persists a fully-built account record.
    async fn create(&self, account: Account) -> Result<Account>;

    /// Replaces an existing account record.
    async fn update(&self, account: Account) -> Result<Account>;

    /// Deletes an account by id. Returns the number of deleted records.
    async fn delete(&self, account_id: &str) -> Result<usize>;

    /// Retrieves an account by id within the owner's scope.
    fn find_by_id(&self, account_id: &str, owner_id: &str) -> Result<Option<Account>>;

    /// Lists all accounts of an owner.
    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Account>>;
}

/// Trait defining the contract for account operations.
///
/// Reads return enriched accounts (derived balance fields populated);
/// mutations invalidate the account's cached metrics and then publish a
/// change event.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Creates a new account and returns it enriched.
    async fn create_account(&self, owner_id: &str, new_account: NewAccount) -> Result<Account>;

    /// Updates an existing account and returns it enriched.
    async fn update_account(&self, owner_id: &str, update: AccountUpdate) -> Result<Account>;

    /// Deletes an account and clears its cached metrics.
    async fn delete_account(&self, owner_id: &str, account_id: &str) -> Result<()>;

    /// Retrieves an enriched account by id.
    async fn get_account(&self, owner_id: &str, account_id: &str) -> Result<Account>;

    /// Lists all accounts of an owner, enriched as one batch.
    async fn list_accounts(&self, owner_id: &str) -> Result<Vec<Account>>;
}
