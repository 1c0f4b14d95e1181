//! Balance projection: the forward, date-indexed balance timeline.

mod projection_model;
mod projection_service;

pub use projection_model::*;
pub use projection_service::*;
