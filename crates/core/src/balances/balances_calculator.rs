//! Pure balance derivation.
//!
//! Turns an account and its partitioned flow sets into the three derived
//! figures. No I/O and no clock access: the caller supplies `as_of` (the
//! current calendar date) and the set of virtual account ids, so results
//! are fully deterministic.
//!
//! Formulas:
//!
//! Virtual account (a "set aside" bucket fed by inflows, no stored value):
//! - actual  = Σ due inflows − Σ due outflows
//! - accrued = Σ due inflows (not netted against outflow)
//! - planned = Σ all inflows, due or not
//!
//! Non-virtual account (stored actual balance is authoritative):
//! - actual  = stored value, passed through
//! - accrued = actual + Σ due unpaid inflows − Σ due unpaid outflows,
//!   where a flow whose counterpart account is virtual counts regardless
//!   of its paid flag (the virtual bucket, not payment status, is the
//!   accrual trigger)
//! - planned = absent
//!
//! Each aggregate is rounded to 2 decimal places, half-up.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::balances_model::AccountBalances;
use crate::accounts::Account;
use crate::constants::BALANCE_DECIMAL_PRECISION;
use crate::errors::{ComputationError, FlowSide, Result};
use crate::flows::Flow;

/// Rounds a balance aggregate to 2 decimal places, half-up.
pub fn round_balance(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        BALANCE_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Derives the balance figures for `account` from its inflow and outflow
/// sets as of the given date.
///
/// `virtual_accounts` holds the ids of every virtual-type account in the
/// owner's ledger; it drives the virtual-linked accrual exception on
/// non-virtual accounts. Absent flow collections are simply empty slices.
pub fn calculate_balances(
    account: &Account,
    inflows: &[Flow],
    outflows: &[Flow],
    virtual_accounts: &HashSet<String>,
    as_of: NaiveDate,
) -> Result<AccountBalances> {
    if account.is_virtual() {
        Ok(calculate_virtual_balances(inflows, outflows, as_of))
    } else {
        calculate_real_balances(account, inflows, outflows, virtual_accounts, as_of)
    }
}

fn calculate_virtual_balances(inflows: &[Flow], outflows: &[Flow], as_of: NaiveDate) -> AccountBalances {
    let due_inflow_total: Decimal = inflows
        .iter()
        .filter(|f| f.is_due(as_of))
        .map(|f| f.amount)
        .sum();
    let due_outflow_total: Decimal = outflows
        .iter()
        .filter(|f| f.is_due(as_of))
        .map(|f| f.amount)
        .sum();
    let planned_total: Decimal = inflows.iter().map(|f| f.amount).sum();

    AccountBalances {
        actual: round_balance(due_inflow_total - due_outflow_total),
        accrued: round_balance(due_inflow_total),
        planned: Some(round_balance(planned_total)),
    }
}

fn calculate_real_balances(
    account: &Account,
    inflows: &[Flow],
    outflows: &[Flow],
    virtual_accounts: &HashSet<String>,
    as_of: NaiveDate,
) -> Result<AccountBalances> {
    let mut accrued = account.actual_balance;

    for flow in inflows.iter().filter(|f| f.is_due(as_of)) {
        if !flow.paid || is_virtual_linked(flow, virtual_accounts)? {
            accrued += flow.amount;
        }
    }
    for flow in outflows.iter().filter(|f| f.is_due(as_of)) {
        if !flow.paid || is_virtual_linked(flow, virtual_accounts)? {
            accrued -= flow.amount;
        }
    }

    Ok(AccountBalances {
        actual: account.actual_balance,
        accrued: round_balance(accrued),
        planned: None,
    })
}

/// A flow is virtual-linked when either endpoint account is virtual.
/// A missing endpoint reference is a malformed flow: classification is
/// impossible, so the whole aggregation fails rather than guessing.
fn is_virtual_linked(flow: &Flow, virtual_accounts: &HashSet<String>) -> Result<bool> {
    let from = flow.from_account_id.as_deref().ok_or_else(|| {
        ComputationError::MissingAccountRef {
            flow_id: flow.id().to_string(),
            side: FlowSide::From,
        }
    })?;
    let to = flow.to_account_id.as_deref().ok_or_else(|| {
        ComputationError::MissingAccountRef {
            flow_id: flow.id().to_string(),
            side: FlowSide::To,
        }
    })?;
    Ok(virtual_accounts.contains(from) || virtual_accounts.contains(to))
}
