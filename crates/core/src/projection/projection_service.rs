//! Balance projection service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::projection_model::{BalanceTimeline, DailyBalanceProjection};
use crate::accounts::{AccountRepositoryTrait, AccountType};
use crate::errors::{Error, Result};
use crate::flows::{Flow, FlowFilter, FlowRepositoryTrait};
use crate::utils::time_utils;

/// Trait defining the contract for balance projections.
#[async_trait]
pub trait ProjectionServiceTrait: Send + Sync {
    /// Builds the forward balance timeline for an account from today
    /// through `end_date` (inclusive).
    async fn project(
        &self,
        owner_id: &str,
        account_id: &str,
        end_date: NaiveDate,
    ) -> Result<BalanceTimeline>;
}

/// Builds per-day running balances from the account's scheduled flows.
///
/// The window is [today, end_date], with one exception: outflows into a
/// virtual account are loaded regardless of due date. Those represent
/// immediate internal transfers rather than scheduled external payments,
/// so a projection must show them even when they fall past the window -
/// their due day simply becomes an extra timeline entry.
pub struct ProjectionService {
    accounts: Arc<dyn AccountRepositoryTrait>,
    flows: Arc<dyn FlowRepositoryTrait>,
}

impl ProjectionService {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        flows: Arc<dyn FlowRepositoryTrait>,
    ) -> Self {
        Self { accounts, flows }
    }

    /// In-window outflows plus virtual-linked outflows of any date,
    /// deduplicated by id with insertion order preserved.
    fn load_outflows(
        &self,
        owner_id: &str,
        account_id: &str,
        today: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Flow>> {
        let mut outflows = self.flows.find(
            &FlowFilter::for_owner(owner_id)
                .out_of_account(account_id)
                .due_between(today, end_date),
        )?;

        let virtual_linked = self.flows.find(
            &FlowFilter::for_owner(owner_id)
                .out_of_account(account_id)
                .to_account_type(AccountType::Virtual),
        )?;
        for flow in virtual_linked {
            if !outflows.iter().any(|f| f.id() == flow.id()) {
                outflows.push(flow);
            }
        }
        Ok(outflows)
    }
}

#[async_trait]
impl ProjectionServiceTrait for ProjectionService {
    async fn project(
        &self,
        owner_id: &str,
        account_id: &str,
        end_date: NaiveDate,
    ) -> Result<BalanceTimeline> {
        let account = self
            .accounts
            .find_by_id(account_id, owner_id)?
            .ok_or_else(|| Error::NotFound(format!("Account {account_id}")))?;

        let today = time_utils::today();
        let mut timeline = BalanceTimeline::new();
        timeline.insert(
            today,
            DailyBalanceProjection::seed(today, account.actual_balance),
        );

        // Degenerate window: just today with the stored balance.
        if end_date < today {
            return Ok(timeline);
        }

        let inflows = self.flows.find(
            &FlowFilter::for_owner(owner_id)
                .into_account(account_id)
                .due_between(today, end_date),
        )?;
        let outflows = self.load_outflows(owner_id, account_id, today, end_date)?;

        // One timeline entry per calendar day a loaded flow falls due on.
        for flow in inflows.iter().chain(outflows.iter()) {
            if flow.date_due < today {
                continue;
            }
            timeline
                .entry(flow.date_due)
                .or_insert_with(|| DailyBalanceProjection::seed(flow.date_due, account.actual_balance));
        }

        // Each day is computed independently: balance as of that day if
        // every flow due on or before it has settled; due-lists hold only
        // the flows falling due exactly that day.
        for (date, entry) in timeline.iter_mut() {
            let accrued_in: Decimal = inflows
                .iter()
                .filter(|f| f.date_due <= *date)
                .map(|f| f.amount)
                .sum();
            let accrued_out: Decimal = outflows
                .iter()
                .filter(|f| f.date_due <= *date)
                .map(|f| f.amount)
                .sum();

            entry.balance = account.actual_balance + accrued_in - accrued_out;
            entry.inflows_due = inflows
                .iter()
                .filter(|f| f.date_due == *date)
                .cloned()
                .collect();
            entry.outflows_due = outflows
                .iter()
                .filter(|f| f.date_due == *date)
                .cloned()
                .collect();
        }

        Ok(timeline)
    }
}
