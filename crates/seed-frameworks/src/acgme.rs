//! ACGME core competency domains and their subdomains.

use crate::dataset::{Dataset, DatasetError};
use crate::taxonomy::{LevelPlan, TaxonomyLoader, TaxonomyPlan};
use seed_core::{BatchLoader, Framework, MergeTemplate, NodeLabel, OrphanCheck, RelationshipType};

pub const EXPECTED_DOMAINS: u64 = 6;
pub const EXPECTED_SUBDOMAINS: u64 = 30;

const DATA: &str = include_str!("../data/acgme.yaml");

pub fn plan() -> TaxonomyPlan {
    TaxonomyPlan {
        framework: Framework::Acgme,
        label: NodeLabel::AcgmeDomain,
        levels: vec![
            LevelPlan::new(
                "Domains",
                EXPECTED_DOMAINS,
                MergeTemplate::new(
                    NodeLabel::AcgmeDomain,
                    &["id", "name", "description", "framework", "sort_order"],
                ),
            ),
            LevelPlan::new(
                "Subdomains",
                EXPECTED_SUBDOMAINS,
                MergeTemplate::new(
                    NodeLabel::AcgmeSubdomain,
                    &["id", "name", "description", "framework", "sort_order", "parent_domain"],
                )
                .contained_in(NodeLabel::AcgmeDomain, RelationshipType::HasSubdomain, "parent_domain"),
            ),
        ],
        orphan_checks: vec![OrphanCheck {
            child: NodeLabel::AcgmeSubdomain,
            parent: NodeLabel::AcgmeDomain,
            relationship: RelationshipType::HasSubdomain,
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
    use seed_core::MemoryGraph;

    #[tokio::test]
    async fn test_load_and_verify() {
        let graph = MemoryGraph::new();
        let loader = loader(batch_loader(&graph)).unwrap();

        let (result, verification) = load_and_verify(&loader).await;

        assert_eq!(result.nodes_created, 36);
        assert_eq!(result.relationships_created, 30);
        assert!(verification.passed, "{}", verification.details);
        assert_eq!(
            verification.details,
            "Domains: 6/6\nSubdomains: 30/30\nOrphans: 0\nTotal: 36/36"
        );
    }

    #[tokio::test]
    async fn test_reload_updates_without_new_edges() {
        let graph = MemoryGraph::new();
        let loader = loader(batch_loader(&graph)).unwrap();
        load_and_verify(&loader).await;

        let (second, verification) = load_and_verify(&loader).await;

        assert_eq!(second.nodes_created, 0);
        assert_eq!(second.nodes_updated, 36);
        assert_eq!(second.relationships_created, 0);
        assert!(verification.passed);
        assert_eq!(graph.node_count(NodeLabel::AcgmeDomain), 6);
    }
}
