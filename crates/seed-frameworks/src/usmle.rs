//! USMLE content outline: organ systems with their topics, disciplines and
//! physician tasks.

use crate::dataset::{Dataset, DatasetError};
use crate::taxonomy::{LevelPlan, TaxonomyLoader, TaxonomyPlan};
use seed_core::{BatchLoader, Framework, MergeTemplate, NodeLabel, OrphanCheck, RelationshipType};

pub const EXPECTED_SYSTEMS: u64 = 16;
pub const EXPECTED_DISCIPLINES: u64 = 7;
pub const EXPECTED_TASKS: u64 = 4;
pub const EXPECTED_TOPICS: u64 = 200;

const DATA: &str = include_str!("../data/usmle.yaml");

pub fn plan() -> TaxonomyPlan {
    let flat = |label| {
        MergeTemplate::new(label, &["id", "name", "description", "framework", "sort_order"])
    };
    TaxonomyPlan {
        framework: Framework::Usmle,
        label: NodeLabel::UsmleSystem,
        levels: vec![
            LevelPlan::new("Systems", EXPECTED_SYSTEMS, flat(NodeLabel::UsmleSystem)),
            LevelPlan::new("Disciplines", EXPECTED_DISCIPLINES, flat(NodeLabel::UsmleDiscipline)),
            LevelPlan::new("Tasks", EXPECTED_TASKS, flat(NodeLabel::UsmleTask)),
            LevelPlan::new(
                "Topics",
                EXPECTED_TOPICS,
                MergeTemplate::new(
                    NodeLabel::UsmleTopic,
                    &["id", "name", "description", "framework", "sort_order", "parent_system"],
                )
                .contained_in(NodeLabel::UsmleSystem, RelationshipType::HasTopic, "parent_system"),
            ),
        ],
        orphan_checks: vec![OrphanCheck {
            child: NodeLabel::UsmleTopic,
            parent: NodeLabel::UsmleSystem,
            relationship: RelationshipType::HasTopic,
        }],
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

    #[test]
    fn test_expected_total() {
        assert_eq!(plan().expected_total(), 227);
    }

    #[tokio::test]
    async fn test_load_and_verify() {
        let graph = MemoryGraph::new();
        let loader = loader(batch_loader(&graph)).unwrap();

        let (result, verification) = load_and_verify(&loader).await;

        assert_eq!(result.nodes_created, 227);
        assert_eq!(result.relationships_created, 200);
        assert!(result.errors.is_empty());
        assert!(verification.passed, "{}", verification.details);
        assert_eq!(
            verification.details,
            "Systems: 16/16\nDisciplines: 7/7\nTasks: 4/4\nTopics: 200/200\nOrphans: 0\nTotal: 227/227"
        );
        assert_eq!(
            graph.property(NodeLabel::UsmleTopic, "TOPIC-GEN-001", "parent_system"),
            Some(PropertyValue::Text("SYS-GEN".into()))
        );
    }
}
