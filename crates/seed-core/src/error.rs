//! Error types for the seeding engine.

use crate::label::NodeLabel;
use thiserror::Error;

/// Errors raised by a graph store gateway.
///
/// Any of these escaping a session or transaction call is treated as a
/// connectivity-class failure by the callers.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or a session could not be opened
    #[error("Graph store unavailable: {0}")]
    Unavailable(String),

    /// A transaction could not be opened, committed or rolled back
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// A single statement failed
    #[error("Statement failed: {0}")]
    Statement(String),

    /// A statement returned something the engine cannot read
    #[error("Unexpected result: {0}")]
    Result(String),
}

/// Errors raised by the engine.
#[derive(Error, Debug)]
pub enum SeedError {
    /// Store failure that prevents further progress
    #[error("Graph store error: {0}")]
    Store(#[from] StoreError),

    /// A second loader was registered for a label
    #[error("Loader for {label} already registered")]
    DuplicateRegistration { label: NodeLabel },

    /// A uniqueness constraint could not be ensured
    #[error("Failed to ensure uniqueness constraint on {label}.{property}: {source}")]
    Constraint {
        label: NodeLabel,
        property: &'static str,
        #[source]
        source: StoreError,
    },

    /// Chunk size must be positive
    #[error("Invalid batch size: {0}")]
    InvalidBatchSize(usize),
}
