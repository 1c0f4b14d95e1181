//! Flows module: scheduled money movements between accounts.

mod flows_model;
mod flows_service;
mod flows_traits;

pub use flows_model::*;
pub use flows_service::*;
pub use flows_traits::*;

#[cfg(test)]
mod flows_service_tests;
