//! Flow repository and service traits.
//!
//! The repository trait is the ledger-store seam: implementations persist
//! flows in whatever relational store the deployment uses. The engine only
//! relies on key lookups and the filter defined in the model.

use async_trait::async_trait;

use super::flows_model::{Flow, FlowFilter, FlowUpdate, NewFlow};
use crate::errors::Result;

/// Trait defining the contract for flow persistence.
#[async_trait]
pub trait FlowRepositoryTrait: Send + Sync {
    /// Persists a fully-built flow record.
    async fn create(&self, flow: Flow) -> Result<Flow>;

    /// Replaces an existing flow record.
    async fn update(&self, flow: Flow) -> Result<Flow>;

    /// Deletes a flow by id. Returns the number of deleted records.
    async fn delete(&self, flow_id: &str) -> Result<usize>;

    /// Retrieves a flow by id within the owner's scope.
    fn find_by_id(&self, flow_id: &str, owner_id: &str) -> Result<Option<Flow>>;

    /// Lists flows matching the filter, in stable storage order.
    fn find(&self, filter: &FlowFilter) -> Result<Vec<Flow>>;
}

/// Trait defining the contract for flow operations.
///
/// Every mutation invalidates the cached metrics of both endpoint accounts
/// and then publishes a change event.
#[async_trait]
pub trait FlowServiceTrait: Send + Sync {
    /// Creates a new flow.
    async fn create_flow(&self, owner_id: &str, new_flow: NewFlow) -> Result<Flow>;

    /// Updates an existing flow within the owner's scope.
    async fn update_flow(&self, owner_id: &str, update: FlowUpdate) -> Result<Flow>;

    /// Deletes a flow within the owner's scope.
    async fn delete_flow(&self, owner_id: &str, flow_id: &str) -> Result<()>;

    /// Retrieves a flow by id within the owner's scope.
    fn get_flow(&self, owner_id: &str, flow_id: &str) -> Result<Flow>;

    /// Lists all flows of an owner.
    fn list_flows(&self, owner_id: &str) -> Result<Vec<Flow>>;

    /// Lists flows into the given account.
    fn get_inflows(&self, owner_id: &str, account_id: &str) -> Result<Vec<Flow>>;

    /// Lists flows out of the given account.
    fn get_outflows(&self, owner_id: &str, account_id: &str) -> Result<Vec<Flow>>;

    /// Lists the installment payments recorded against a parent flow.
    fn get_payments(&self, owner_id: &str, parent_flow_id: &str) -> Result<Vec<Flow>>;
}
