//! Error types for the Neo4j gateway.

use seed_core::StoreError;
use thiserror::Error;

/// Errors that can occur while setting up the Neo4j gateway.
#[derive(Error, Debug)]
pub enum Neo4jGatewayError {
    /// Neo4j database error
    #[error("Neo4j error: {0}")]
    Neo4j(#[from] neo4rs::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<Neo4jGatewayError> for StoreError {
    fn from(err: Neo4jGatewayError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}
