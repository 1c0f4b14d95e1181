//! Core error types for the moneyflow engine.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from whatever relational or key/value store backs the traits) are
//! converted to these types by the adapter that implements the trait.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger engine.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested record does not exist or is outside the caller's
    /// owner scope. Surfaced directly, never retried.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The cache store is unreachable. Swallowed at the balance engine
    /// boundary (reads degrade to recomputation); fatal nowhere.
    #[error("Cache store unavailable: {0}")]
    CacheUnavailable(String),

    /// A malformed flow was encountered during balance aggregation.
    /// Fails the whole enrichment batch rather than returning a mixed view.
    #[error("Balance computation failed: {0}")]
    Computation(#[from] ComputationError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Wrapped storage-layer failure, kept as a string to stay
    /// storage-agnostic.
    #[error("Repository error: {0}")]
    Repository(String),

    /// The change-notification channel rejected a publish. Callers treat
    /// delivery as best-effort and log rather than propagate this.
    #[error("Event publish failed: {0}")]
    Publish(String),
}

/// Errors that occur while deriving balances from a flow set.
#[derive(Error, Debug)]
pub enum ComputationError {
    #[error("Flow {flow_id} is missing its {side} account reference")]
    MissingAccountRef { flow_id: String, side: FlowSide },
}

/// Which endpoint of a flow a computation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSide {
    From,
    To,
}

impl std::fmt::Display for FlowSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowSide::From => write!(f, "from"),
            FlowSide::To => write!(f, "to"),
        }
    }
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}
