//! Account domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_ACCOUNT_NAME_LEN;
use crate::errors::ValidationError;
use crate::resource::OwnedResource;
use crate::{Error, Result};

/// Kind of account. Virtual accounts hold no real money: their actual
/// balance is derived entirely from the flows referencing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
    #[default]
    External,
    Virtual,
}

impl AccountType {
    pub fn is_virtual(self) -> bool {
        matches!(self, AccountType::Virtual)
    }
}

/// Domain model representing a money account.
///
/// `actual_balance` is authoritative for non-virtual accounts. The derived
/// fields (`accrued_balance`, `planned_balance`, and `actual_balance` for
/// virtual accounts) are never persisted - enrichment populates them on
/// read, backed by the derived-balance cache.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(flatten)]
    pub resource: OwnedResource,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub is_principal: bool,
    pub actual_balance: Decimal,
    pub goal_balance: Option<Decimal>,
    /// Derived: actual balance adjusted for flows due but not settled.
    pub accrued_balance: Option<Decimal>,
    /// Derived: eventual balance if every scheduled flow clears.
    /// Computed for virtual accounts only.
    pub planned_balance: Option<Decimal>,
}

impl Account {
    pub fn id(&self) -> &str {
        &self.resource.id
    }

    pub fn owner_id(&self) -> &str {
        &self.resource.owner_id
    }

    pub fn is_virtual(&self) -> bool {
        self.account_type.is_virtual()
    }
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub is_principal: bool,
    #[serde(default)]
    pub actual_balance: Decimal,
    pub goal_balance: Option<Decimal>,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// Input model for updating an existing account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub is_principal: bool,
    pub actual_balance: Decimal,
    pub goal_balance: Option<Decimal>,
}

impl AccountUpdate {
    /// Validates the account update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account ID is required for updates".to_string(),
            )));
        }
        validate_name(&self.name)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Account name cannot be empty".to_string(),
        )));
    }
    if name.len() > MAX_ACCOUNT_NAME_LEN {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Account name cannot exceed {MAX_ACCOUNT_NAME_LEN} characters"
        ))));
    }
    Ok(())
}
