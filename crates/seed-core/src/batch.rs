//! Chunked, transactional merge of framework items.

use crate::error::SeedError;
use crate::graph::{GraphGateway, GraphSession};
use crate::item::{FrameworkItem, KeyValue};
use crate::label::NodeLabel;
use crate::report::NodeError;
use crate::template::{MergeTemplate, Statement};
use std::sync::Arc;
use tracing::{debug, warn};

/// Items written per session and transaction.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// One label's items and the template that writes them.
#[derive(Debug, Clone, Copy)]
pub struct LoadBatch<'a> {
    pub template: &'a MergeTemplate,
    pub items: &'a [FrameworkItem],
}

impl<'a> LoadBatch<'a> {
    pub fn new(template: &'a MergeTemplate, items: &'a [FrameworkItem]) -> Self {
        Self { template, items }
    }

    pub fn label(&self) -> NodeLabel {
        self.template.label
    }
}

/// Counters and per-item errors of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub nodes_created: u64,
    pub nodes_updated: u64,
    pub relationships_created: u64,
    pub errors: Vec<NodeError>,
}

impl BatchOutcome {
    pub fn merge(&mut self, other: BatchOutcome) {
        self.nodes_created += other.nodes_created;
        self.nodes_updated += other.nodes_updated;
        self.relationships_created += other.relationships_created;
        self.errors.extend(other.errors);
    }
}

/// Writes items in chunks, each chunk in its own session and write transaction.
///
/// A failing item is recorded and does not abort its chunk. Failures to open
/// a session or transaction, or to commit, are returned to the caller.
#[derive(Clone)]
pub struct BatchLoader {
    graph: Arc<dyn GraphGateway>,
    chunk_size: usize,
}

impl BatchLoader {
    pub fn new(graph: Arc<dyn GraphGateway>) -> Self {
        Self {
            graph,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the number of items per chunk. Zero is rejected.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self, SeedError> {
        if chunk_size == 0 {
            return Err(SeedError::InvalidBatchSize(chunk_size));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn graph(&self) -> &Arc<dyn GraphGateway> {
        &self.graph
    }

    /// Merge every item of the batch.
    pub async fn execute_batch(&self, batch: LoadBatch<'_>) -> Result<BatchOutcome, SeedError> {
        let mut outcome = BatchOutcome::default();
        let label = batch.label();

        for (index, chunk) in batch.items.chunks(self.chunk_size).enumerate() {
            let mut session = self.graph.session().await?;
            let written = write_chunk(session.as_mut(), batch.template, chunk).await;
            let closed = session.close().await;
            let chunk_outcome = written?;
            closed?;

            debug!(
                "Chunk {} of {}: {} items, {} created, {} updated, {} errors",
                index + 1,
                label,
                chunk.len(),
                chunk_outcome.nodes_created,
                chunk_outcome.nodes_updated,
                chunk_outcome.errors.len()
            );
            outcome.merge(chunk_outcome);
        }

        Ok(outcome)
    }
}

async fn write_chunk(
    session: &mut dyn GraphSession,
    template: &MergeTemplate,
    chunk: &[FrameworkItem],
) -> Result<BatchOutcome, SeedError> {
    let label = template.label;
    let mut outcome = BatchOutcome::default();
    let mut tx = session.begin_write().await?;

    for item in chunk {
        let statement = Statement::merge(template, item);
        match tx.run(&statement).await {
            Ok(result) => {
                if let (true, Some(link)) = (result.rows.is_empty(), &template.link) {
                    let target = statement
                        .params()
                        .and_then(|params| params.get(link.param))
                        .and_then(KeyValue::from_property)
                        .map(|key| key.to_string())
                        .unwrap_or_else(|| "null".to_string());
                    warn!("{} {}: no {} {} to link", label, item.key, link.target, target);
                    outcome.errors.push(NodeError::new(
                        item.key.to_string(),
                        label,
                        format!(
                            "{} node with {} = {} not found for {}",
                            link.target,
                            link.target.key_property(),
                            target,
                            link.relationship
                        ),
                    ));
                    continue;
                }
                let counters = result.counters;
                outcome.nodes_created += counters.nodes_created;
                if counters.nodes_created == 0 && counters.properties_set > 0 {
                    outcome.nodes_updated += 1;
                }
                outcome.relationships_created += counters.relationships_created;
            }
            Err(e) => {
                warn!("Failed to merge {} {}: {}", label, item.key, e);
                outcome
                    .errors
                    .push(NodeError::new(item.key.to_string(), label, e.to_string()));
            }
        }
    }

    if let Err(e) = tx.commit().await {
        if let Err(rollback_err) = tx.rollback().await {
            warn!("Rollback after failed commit also failed: {}", rollback_err);
        }
        return Err(e.into());
    }

    Ok(outcome)
}
