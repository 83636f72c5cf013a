//! Miller's pyramid of clinical competence.

use crate::dataset::{Dataset, DatasetError};
use crate::taxonomy::{LevelPlan, TaxonomyLoader, TaxonomyPlan};
use seed_core::{BatchLoader, Framework, MergeTemplate, NodeLabel};

pub const EXPECTED_LEVELS: u64 = 4;

const DATA: &str = include_str!("../data/miller.yaml");

pub fn plan() -> TaxonomyPlan {
    TaxonomyPlan {
        framework: Framework::Miller,
        label: NodeLabel::MillerLevel,
        levels: vec![LevelPlan::new(
            "Levels",
            EXPECTED_LEVELS,
            MergeTemplate::new(
                NodeLabel::MillerLevel,
                &["id", "name", "description", "framework", "assessment_methods"],
            ),
        )],
        orphan_checks: Vec::new(),
    }
}

pub fn dataset() -> Result<Dataset, DatasetError> {
    Dataset::from_yaml(DATA)
}

pub fn loader(batch: BatchLoader) -> Result<TaxonomyLoader, DatasetError> {
    TaxonomyLoader::new(plan(), dataset()?, batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{batch_loader, load_and_verify};
    use seed_core::{MemoryGraph, PropertyValue};

    #[tokio::test]
    async fn test_load_and_verify() {
        let graph = MemoryGraph::new();
        let loader = loader(batch_loader(&graph)).unwrap();

        let (result, verification) = load_and_verify(&loader).await;

        assert_eq!(result.nodes_created, 4);
        assert!(verification.passed);
        assert_eq!(
            graph.property(NodeLabel::MillerLevel, 4_i64, "name"),
            Some(PropertyValue::Text("Does".into()))
        );
        assert!(matches!(
            graph.property(NodeLabel::MillerLevel, 4_i64, "assessment_methods"),
            Some(PropertyValue::TextList(_))
        ));
    }
}
