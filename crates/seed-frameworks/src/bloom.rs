//! Bloom's revised taxonomy of cognitive levels.

use crate::dataset::{Dataset, DatasetError};
use crate::taxonomy::{LevelPlan, TaxonomyLoader, TaxonomyPlan};
use seed_core::{BatchLoader, Framework, MergeTemplate, NodeLabel};

pub const EXPECTED_LEVELS: u64 = 6;

const DATA: &str = include_str!("../data/bloom.yaml");

pub fn plan() -> TaxonomyPlan {
    TaxonomyPlan {
        framework: Framework::Bloom,
        label: NodeLabel::BloomLevel,
        levels: vec![LevelPlan::new(
            "Levels",
            EXPECTED_LEVELS,
            MergeTemplate::new(
                NodeLabel::BloomLevel,
                &["id", "name", "description", "framework", "action_verbs"],
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
    async fn test_action_verbs_stored_as_list() {
        let graph = MemoryGraph::new();
        let loader = loader(batch_loader(&graph)).unwrap();

        let (result, verification) = load_and_verify(&loader).await;

        assert_eq!(result.nodes_created, 6);
        assert!(verification.passed);
        match graph.property(NodeLabel::BloomLevel, 1_i64, "action_verbs") {
            Some(PropertyValue::TextList(verbs)) => assert!(verbs.contains(&"define".to_string())),
            other => panic!("unexpected action_verbs: {other:?}"),
        }
    }
}
