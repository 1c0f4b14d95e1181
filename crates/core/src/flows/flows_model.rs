//! Flow domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::AccountType;
use crate::constants::MAX_FLOW_DESCRIPTION_LEN;
use crate::errors::ValidationError;
use crate::resource::OwnedResource;
use crate::{Error, Result};

/// A dated, signed money movement from one account to another.
///
/// The amount is always interpreted as moving from `from_account_id` to
/// `to_account_id`. Due-date comparisons are day-granular. Both account
/// references are required for a well-formed flow; the model keeps them
/// optional so malformed records surface as computation errors instead of
/// being unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    #[serde(flatten)]
    pub resource: OwnedResource,
    pub description: String,
    pub amount: Decimal,
    pub paid: bool,
    pub scheduled: bool,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub date_due: NaiveDate,
    pub date_cancelled: Option<NaiveDate>,
    /// Installment chains: a flow may be one of several payments against a
    /// parent flow. Reverse lookup only, nothing in the engine walks the
    /// chain.
    pub parent_flow_id: Option<String>,
}

impl Flow {
    pub fn id(&self) -> &str {
        &self.resource.id
    }

    pub fn owner_id(&self) -> &str {
        &self.resource.owner_id
    }

    /// A flow is due once its due date is on or before `as_of`.
    pub fn is_due(&self, as_of: NaiveDate) -> bool {
        self.date_due <= as_of
    }
}

/// Input model for creating a new flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub scheduled: bool,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub date_due: NaiveDate,
    pub date_cancelled: Option<NaiveDate>,
    pub parent_flow_id: Option<String>,
}

impl NewFlow {
    /// Validates the new flow data.
    pub fn validate(&self) -> Result<()> {
        validate_description(&self.description)?;
        if self.from_account_id.is_none() {
            return Err(Error::Validation(ValidationError::MissingField(
                "fromAccountId".to_string(),
            )));
        }
        if self.to_account_id.is_none() {
            return Err(Error::Validation(ValidationError::MissingField(
                "toAccountId".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for updating an existing flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowUpdate {
    pub id: Option<String>,
    pub description: String,
    pub amount: Decimal,
    pub paid: bool,
    pub scheduled: bool,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub date_due: NaiveDate,
    pub date_cancelled: Option<NaiveDate>,
    pub parent_flow_id: Option<String>,
}

impl FlowUpdate {
    /// Validates the flow update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Flow ID is required for updates".to_string(),
            )));
        }
        validate_description(&self.description)
    }
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Flow description cannot be empty".to_string(),
        )));
    }
    if description.len() > MAX_FLOW_DESCRIPTION_LEN {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Flow description cannot exceed {MAX_FLOW_DESCRIPTION_LEN} characters"
        ))));
    }
    Ok(())
}

/// Filter for flow lookups. All set fields must match; `due_between` is an
/// inclusive date range on the due date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowFilter {
    pub owner_id: Option<String>,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub parent_flow_id: Option<String>,
    /// Matches on the type of the destination account. Needed for the
    /// virtual-linked outflow union in balance projections.
    pub to_account_type: Option<AccountType>,
    pub due_between: Option<(NaiveDate, NaiveDate)>,
}

impl FlowFilter {
    pub fn for_owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            ..Self::default()
        }
    }

    /// Restricts to inflows of the given account.
    pub fn into_account(mut self, account_id: impl Into<String>) -> Self {
        self.to_account_id = Some(account_id.into());
        self
    }

    /// Restricts to outflows of the given account.
    pub fn out_of_account(mut self, account_id: impl Into<String>) -> Self {
        self.from_account_id = Some(account_id.into());
        self
    }

    pub fn due_between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.due_between = Some((start, end));
        self
    }

    pub fn to_account_type(mut self, account_type: AccountType) -> Self {
        self.to_account_type = Some(account_type);
        self
    }

    pub fn payments_of(mut self, parent_flow_id: impl Into<String>) -> Self {
        self.parent_flow_id = Some(parent_flow_id.into());
        self
    }
}
