//! Neo4j gateway for the framework seeding engine.
//!
//! Implements the engine's gateway traits over a `neo4rs` connection pool.
//! Every statement is sent with bound parameters; write counters are read from
//! the columns the merge statements return.
//!
//! # Example
//!
//! ```ignore
//! use seed_neo4j::Neo4jGateway;
//!
//! let gateway = Neo4jGateway::new("bolt://localhost:7687", "neo4j", "password", "neo4j")?;
//! let mut orchestrator = seed_core::LoadOrchestrator::new(std::sync::Arc::new(gateway));
//! ```

mod args;
mod error;
mod gateway;

pub use args::Neo4jArgs;
pub use error::Neo4jGatewayError;
pub use gateway::{to_bolt, Neo4jGateway};
