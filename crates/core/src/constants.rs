//! Crate-wide constants.

/// Namespace prefix for every account-derived cache key.
pub const ACCOUNT_CACHE_NAMESPACE: &str = "account";

/// Cache metric name for the derived actual balance (virtual accounts only).
pub const METRIC_ACTUAL_BALANCE: &str = "actual-balance";

/// Cache metric name for the accrued balance.
pub const METRIC_ACCRUED_BALANCE: &str = "accrued-balance";

/// Cache metric name for the planned balance (virtual accounts only).
pub const METRIC_PLANNED_BALANCE: &str = "planned-balance";

/// Decimal precision for balance figures.
pub const BALANCE_DECIMAL_PRECISION: u32 = 2;

/// Maximum length of an account name.
pub const MAX_ACCOUNT_NAME_LEN: usize = 50;

/// Maximum length of a flow description.
pub const MAX_FLOW_DESCRIPTION_LEN: usize = 100;
