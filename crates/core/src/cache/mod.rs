//! Derived-balance cache: store adapter, key grammar, and the
//! invalidation coordinator.

mod cache_store;
mod invalidator;

pub use cache_store::*;
pub use invalidator::*;
