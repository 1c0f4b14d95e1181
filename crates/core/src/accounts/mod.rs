//! Accounts module: money accounts and their derived balance fields.

mod accounts_model;
mod accounts_service;
mod accounts_traits;

pub use accounts_model::*;
pub use accounts_service::*;
pub use accounts_traits::*;
