//! Derived balance figures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The three derived balance figures of one account.
///
/// For non-virtual accounts `actual` is the stored, authoritative value
/// passed through unchanged and `planned` is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalances {
    pub actual: Decimal,
    pub accrued: Decimal,
    pub planned: Option<Decimal>,
}
