//! Moneyflow Core - Domain entities, services, and traits.
//!
//! This crate contains the balance-derivation engine and its
//! cache-consistency protocol. It is storage-agnostic: durable persistence
//! of accounts and flows sits behind repository traits that a storage crate
//! (or a test fake) implements.

pub mod accounts;
pub mod balances;
pub mod cache;
pub mod constants;
pub mod errors;
pub mod events;
pub mod flows;
pub mod projection;
pub mod resource;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export common types
pub use resource::OwnedResource;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
