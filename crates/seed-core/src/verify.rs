//! Post-load verification by live counts and orphan scans.

use crate::error::{SeedError, StoreError};
use crate::graph::{GraphGateway, GraphSession};
use crate::label::{Framework, NodeLabel, RelationshipType};
use crate::report::VerificationResult;
use crate::template::{Statement, COUNT, ORPHAN_COUNT};
use tracing::debug;

/// Expected node count of one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelExpectation {
    pub label: NodeLabel,
    /// Operator-facing name used in the detail lines, e.g. `Standards`.
    pub caption: &'static str,
    pub expected: u64,
}

/// Children of `child` label must each have an inbound `relationship` from a `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrphanCheck {
    pub child: NodeLabel,
    pub parent: NodeLabel,
    pub relationship: RelationshipType,
}

/// What a framework's verification counts and what it expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationPlan {
    pub framework: Framework,
    /// Primary label, reported on the result.
    pub label: NodeLabel,
    pub expectations: Vec<LabelExpectation>,
    pub orphan_checks: Vec<OrphanCheck>,
}

impl VerificationPlan {
    pub fn expected_total(&self) -> u64 {
        self.expectations.iter().map(|e| e.expected).sum()
    }

    /// Count every expected label and scan for orphans in one session.
    ///
    /// Passes only when every label count matches and no orphan exists.
    pub async fn verify(&self, graph: &dyn GraphGateway) -> Result<VerificationResult, SeedError> {
        let mut session = graph.session().await?;
        let counted = self.count(session.as_mut()).await;
        let closed = session.close().await;
        let (actuals, orphan_count) = counted?;
        closed?;

        let mut details = Vec::with_capacity(self.expectations.len() + 2);
        let mut counts_match = true;
        for (expectation, actual) in self.expectations.iter().zip(&actuals) {
            counts_match &= *actual == expectation.expected as i64;
            details.push(format!(
                "{}: {}/{}",
                expectation.caption, actual, expectation.expected
            ));
        }

        let actual_count: i64 = actuals.iter().sum();
        let expected_count = self.expected_total() as i64;
        if !self.orphan_checks.is_empty() {
            details.push(format!("Orphans: {orphan_count}"));
        }
        details.push(format!("Total: {actual_count}/{expected_count}"));

        let passed = counts_match && orphan_count == 0;
        debug!(
            "Verified {}: {}/{} nodes, {} orphans, passed={}",
            self.framework, actual_count, expected_count, orphan_count, passed
        );

        Ok(VerificationResult {
            framework: self.framework,
            label: self.label,
            expected_count,
            actual_count,
            passed,
            orphan_count,
            details: details.join("\n"),
        })
    }

    async fn count(&self, session: &mut dyn GraphSession) -> Result<(Vec<i64>, i64), StoreError> {
        let mut actuals = Vec::with_capacity(self.expectations.len());
        for expectation in &self.expectations {
            actuals.push(count_nodes(session, expectation.label).await?);
        }

        let mut orphans = 0;
        for check in &self.orphan_checks {
            let result = session
                .run(&Statement::CountOrphans {
                    child: check.child,
                    parent: check.parent,
                    relationship: check.relationship,
                })
                .await?;
            orphans += result.single(ORPHAN_COUNT)?;
        }

        Ok((actuals, orphans))
    }
}

/// Count live nodes of a label.
pub async fn count_nodes(session: &mut dyn GraphSession, label: NodeLabel) -> Result<i64, StoreError> {
    let result = session.run(&Statement::CountNodes { label }).await?;
    result.single(COUNT)
}
