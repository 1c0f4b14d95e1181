//! Balance engine: derivation of actual/accrued/planned balances from a
//! flow set, and the cache-consistency protocol around it.

mod balances_calculator;
mod balances_model;
mod balances_service;

pub use balances_calculator::*;
pub use balances_model::*;
pub use balances_service::*;
