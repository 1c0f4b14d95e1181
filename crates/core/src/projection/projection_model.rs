//! Projection timeline models.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::flows::Flow;

/// One day of an account's forward balance timeline: the balance the
/// account would hold if every flow due on or before that day had settled,
/// plus the flows falling due exactly on that day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyBalanceProjection {
    pub date: NaiveDate,
    pub balance: Decimal,
    pub inflows_due: Vec<Flow>,
    pub outflows_due: Vec<Flow>,
}

impl DailyBalanceProjection {
    pub(crate) fn seed(date: NaiveDate, balance: Decimal) -> Self {
        Self {
            date,
            balance,
            inflows_due: Vec::new(),
            outflows_due: Vec::new(),
        }
    }
}

/// Date-ordered timeline, keyed by calendar day.
pub type BalanceTimeline = BTreeMap<NaiveDate, DailyBalanceProjection>;
