//! Natural-key uniqueness constraints.

use crate::error::SeedError;
use crate::graph::{GraphGateway, GraphSession};
use crate::label::NodeLabel;
use crate::template::Statement;
use tracing::{debug, info};

/// Declares one uniqueness constraint per label on its natural key.
///
/// Statements are `IF NOT EXISTS`, so running this again is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintInitializer {
    labels: Vec<NodeLabel>,
}

impl Default for ConstraintInitializer {
    fn default() -> Self {
        Self {
            labels: NodeLabel::ALL.to_vec(),
        }
    }
}

impl ConstraintInitializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> &[NodeLabel] {
        &self.labels
    }

    pub fn statements(&self) -> Vec<Statement<'static>> {
        self.labels
            .iter()
            .map(|&label| Statement::EnsureConstraint { label })
            .collect()
    }

    /// Ensure every constraint exists. Any failure is fatal to the run.
    pub async fn ensure(&self, graph: &dyn GraphGateway) -> Result<usize, SeedError> {
        let mut session = graph.session().await?;
        let ensured = self.run_all(session.as_mut()).await;
        let closed = session.close().await;
        let count = ensured?;
        closed?;

        info!("Ensured {} uniqueness constraints", count);
        Ok(count)
    }

    async fn run_all(&self, session: &mut dyn GraphSession) -> Result<usize, SeedError> {
        for &label in &self.labels {
            let property = label.key_property();
            debug!("Ensuring constraint on {}.{}", label, property);
            session
                .run(&Statement::EnsureConstraint { label })
                .await
                .map_err(|source| SeedError::Constraint {
                    label,
                    property,
                    source,
                })?;
        }
        Ok(self.labels.len())
    }
}
