//! Generic loader driven by a per-framework plan.

use crate::dataset::{Dataset, DatasetError};
use async_trait::async_trait;
use seed_core::{
    BatchLoader, Framework, FrameworkLoader, LabelExpectation, LoadBatch, LoadResult,
    MergeTemplate, NodeLabel, OrphanCheck, SeedError, VerificationPlan, VerificationResult,
};
use std::time::Instant;
use tracing::info;

/// One label of a framework and how it is written.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelPlan {
    pub label: NodeLabel,
    /// Operator-facing name used in verification details.
    pub caption: &'static str,
    pub expected: u64,
    pub template: MergeTemplate,
}

impl LevelPlan {
    pub fn new(caption: &'static str, expected: u64, template: MergeTemplate) -> Self {
        Self {
            label: template.label,
            caption,
            expected,
            template,
        }
    }
}

/// The levels of a framework, in load order, and its orphan checks.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyPlan {
    pub framework: Framework,
    /// Primary label, identifying the loader.
    pub label: NodeLabel,
    pub levels: Vec<LevelPlan>,
    pub orphan_checks: Vec<OrphanCheck>,
}

impl TaxonomyPlan {
    pub fn expected_total(&self) -> u64 {
        self.levels.iter().map(|l| l.expected).sum()
    }

    pub fn verification(&self) -> VerificationPlan {
        VerificationPlan {
            framework: self.framework,
            label: self.label,
            expectations: self
                .levels
                .iter()
                .map(|level| LabelExpectation {
                    label: level.label,
                    caption: level.caption,
                    expected: level.expected,
                })
                .collect(),
            orphan_checks: self.orphan_checks.clone(),
        }
    }
}

/// Loads a dataset level by level through the injected batch loader.
pub struct TaxonomyLoader {
    plan: TaxonomyPlan,
    dataset: Dataset,
    batch: BatchLoader,
}

impl TaxonomyLoader {
    /// Create a loader. The dataset is validated against the plan.
    pub fn new(plan: TaxonomyPlan, dataset: Dataset, batch: BatchLoader) -> Result<Self, DatasetError> {
        dataset.validate(&plan)?;
        Ok(Self {
            plan,
            dataset,
            batch,
        })
    }

    pub fn plan(&self) -> &TaxonomyPlan {
        &self.plan
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[async_trait]
impl FrameworkLoader for TaxonomyLoader {
    fn framework(&self) -> Framework {
        self.plan.framework
    }

    fn label(&self) -> NodeLabel {
        self.plan.label
    }

    async fn load(&self) -> Result<LoadResult, SeedError> {
        let started = Instant::now();
        let mut result = LoadResult::new(self.plan.framework, self.plan.label);

        for level in &self.plan.levels {
            let items = self.dataset.items(level.label);
            let outcome = self
                .batch
                .execute_batch(LoadBatch::new(&level.template, items))
                .await?;
            info!(
                "[{}] {}: {} created, {} updated, {} relationships, {} errors",
                self.plan.framework,
                level.label,
                outcome.nodes_created,
                outcome.nodes_updated,
                outcome.relationships_created,
                outcome.errors.len()
            );
            result.nodes_created += outcome.nodes_created;
            result.nodes_updated += outcome.nodes_updated;
            result.relationships_created += outcome.relationships_created;
            result.errors.extend(outcome.errors);
        }

        result.duration = started.elapsed();
        Ok(result)
    }

    async fn verify(&self) -> Result<VerificationResult, SeedError> {
        self.plan.verification().verify(self.batch.graph().as_ref()).await
    }
}
