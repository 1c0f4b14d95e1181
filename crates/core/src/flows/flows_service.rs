//! Flow service.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::flows_model::{Flow, FlowFilter, FlowUpdate, NewFlow};
use super::flows_traits::{FlowRepositoryTrait, FlowServiceTrait};
use crate::cache::InvalidationCoordinator;
use crate::errors::{Error, Result};
use crate::events::{ChangeEvent, ChangeNotifier};
use crate::resource::OwnedResource;

/// Service for managing flows.
///
/// A flow concerns exactly two accounts, so every mutation invalidates the
/// cached metrics of both endpoints before the change event goes out. The
/// two invalidations are not atomic with respect to each other or to the
/// ledger write; the next mutation-triggered invalidation bounds any
/// staleness this leaves behind.
pub struct FlowService {
    repository: Arc<dyn FlowRepositoryTrait>,
    invalidator: Arc<InvalidationCoordinator>,
    notifier: Arc<ChangeNotifier>,
}

impl FlowService {
    pub fn new(
        repository: Arc<dyn FlowRepositoryTrait>,
        invalidator: Arc<InvalidationCoordinator>,
        notifier: Arc<ChangeNotifier>,
    ) -> Self {
        Self {
            repository,
            invalidator,
            notifier,
        }
    }

    /// Invalidate both endpoints, then notify. Ordering matters: a
    /// subscriber that re-reads on receipt must observe already-cleared
    /// cache state.
    async fn after_mutation(&self, flow: &Flow, event: ChangeEvent) {
        self.invalidator.invalidate_flow_endpoints(flow).await;
        self.notifier.notify(event).await;
    }
}

#[async_trait]
impl FlowServiceTrait for FlowService {
    async fn create_flow(&self, owner_id: &str, new_flow: NewFlow) -> Result<Flow> {
        new_flow.validate()?;
        debug!("Creating flow '{}' for owner {owner_id}", new_flow.description);

        let flow = Flow {
            resource: OwnedResource::new(new_flow.id, owner_id),
            description: new_flow.description,
            amount: new_flow.amount,
            paid: new_flow.paid,
            scheduled: new_flow.scheduled,
            from_account_id: new_flow.from_account_id,
            to_account_id: new_flow.to_account_id,
            date_due: new_flow.date_due,
            date_cancelled: new_flow.date_cancelled,
            parent_flow_id: new_flow.parent_flow_id,
        };

        let saved = self.repository.create(flow).await?;
        self.after_mutation(&saved, ChangeEvent::flow_saved(owner_id, saved.id()))
            .await;
        Ok(saved)
    }

    async fn update_flow(&self, owner_id: &str, update: FlowUpdate) -> Result<Flow> {
        update.validate()?;
        let flow_id = update.id.as_deref().unwrap_or_default();

        let mut flow = self
            .repository
            .find_by_id(flow_id, owner_id)?
            .ok_or_else(|| Error::NotFound(format!("Flow {flow_id}")))?;
        let previous = flow.clone();

        flow.description = update.description;
        flow.amount = update.amount;
        flow.paid = update.paid;
        flow.scheduled = update.scheduled;
        flow.from_account_id = update.from_account_id;
        flow.to_account_id = update.to_account_id;
        flow.date_due = update.date_due;
        flow.date_cancelled = update.date_cancelled;
        flow.parent_flow_id = update.parent_flow_id;
        flow.resource.touch();

        let saved = self.repository.update(flow).await?;
        // An update may re-point the flow; the accounts it used to touch
        // hold stale cached metrics too.
        if previous.from_account_id != saved.from_account_id
            || previous.to_account_id != saved.to_account_id
        {
            self.invalidator.invalidate_flow_endpoints(&previous).await;
        }
        self.after_mutation(&saved, ChangeEvent::flow_saved(owner_id, saved.id()))
            .await;
        Ok(saved)
    }

    async fn delete_flow(&self, owner_id: &str, flow_id: &str) -> Result<()> {
        let flow = self
            .repository
            .find_by_id(flow_id, owner_id)?
            .ok_or_else(|| Error::NotFound(format!("Flow {flow_id}")))?;

        self.repository.delete(flow_id).await?;
        self.after_mutation(&flow, ChangeEvent::flow_deleted(owner_id, flow_id))
            .await;
        Ok(())
    }

    fn get_flow(&self, owner_id: &str, flow_id: &str) -> Result<Flow> {
        self.repository
            .find_by_id(flow_id, owner_id)?
            .ok_or_else(|| Error::NotFound(format!("Flow {flow_id}")))
    }

    fn list_flows(&self, owner_id: &str) -> Result<Vec<Flow>> {
        self.repository.find(&FlowFilter::for_owner(owner_id))
    }

    fn get_inflows(&self, owner_id: &str, account_id: &str) -> Result<Vec<Flow>> {
        self.repository
            .find(&FlowFilter::for_owner(owner_id).into_account(account_id))
    }

    fn get_outflows(&self, owner_id: &str, account_id: &str) -> Result<Vec<Flow>> {
        self.repository
            .find(&FlowFilter::for_owner(owner_id).out_of_account(account_id))
    }

    fn get_payments(&self, owner_id: &str, parent_flow_id: &str) -> Result<Vec<Flow>> {
        self.repository
            .find(&FlowFilter::for_owner(owner_id).payments_of(parent_flow_id))
    }
}
