//! Seeding and verification engine for reference-taxonomy property graphs.
//!
//! Each taxonomy is written by a [`FrameworkLoader`] as a sequence of merges
//! keyed on a natural key, optionally linking each node to an existing parent.
//! A [`LoadOrchestrator`] ensures uniqueness constraints, runs the loaders in
//! registration order and then has each one re-count the store.
//!
//! # Example
//!
//! ```ignore
//! use seed_core::{LoadOrchestrator, MemoryGraph};
//! use std::sync::Arc;
//!
//! let graph = Arc::new(MemoryGraph::new());
//! let mut orchestrator = LoadOrchestrator::new(graph);
//! orchestrator.register_loader(loader)?;
//!
//! let report = orchestrator.run().await?;
//! println!("{}", report.summary());
//! ```

mod batch;
mod constraints;
mod error;
mod graph;
mod item;
mod label;
mod loader;
mod memory;
mod orchestrator;
mod report;
mod template;
mod verify;

pub use batch::{BatchLoader, BatchOutcome, LoadBatch, DEFAULT_CHUNK_SIZE};
pub use constraints::ConstraintInitializer;
pub use error::{SeedError, StoreError};
pub use graph::{GraphGateway, GraphSession, QueryResult, Record, WriteCounters, WriteTransaction};
pub use item::{FrameworkItem, KeyValue, PropertyValue};
pub use label::{Framework, KeyKind, NodeLabel, RelationshipType};
pub use loader::FrameworkLoader;
pub use memory::MemoryGraph;
pub use orchestrator::{LoadOrchestrator, LoaderPhase};
pub use report::{
    LoadResult, NodeError, RunReport, VerificationResult, ORCHESTRATOR_ERROR_KEY, UNVERIFIED,
};
pub use template::{Link, LinkDirection, MergeTemplate, Params, Statement};
pub use verify::{count_nodes, LabelExpectation, OrphanCheck, VerificationPlan};
