//! Change notification module.
//!
//! Services publish a change event after every successful mutation, once
//! invalidation has been issued. An external subscription relay forwards
//! the per-user channels to live client connections; inside this crate the
//! relay is represented only by the [`PubSubTrait`] seam and an in-process
//! broadcast implementation.

mod change_event;
mod notifier;
mod pubsub;

pub use change_event::*;
pub use notifier::*;
pub use pubsub::*;
