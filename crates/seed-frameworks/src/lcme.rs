//! LCME accreditation standards and their elements.

use crate::dataset::{Dataset, DatasetError};
use crate::taxonomy::{LevelPlan, TaxonomyLoader, TaxonomyPlan};
use seed_core::{BatchLoader, Framework, MergeTemplate, NodeLabel, OrphanCheck, RelationshipType};

pub const EXPECTED_STANDARDS: u64 = 12;
pub const EXPECTED_ELEMENTS: u64 = 93;

const DATA: &str = include_str!("../data/lcme.yaml");

pub fn plan() -> TaxonomyPlan {
    TaxonomyPlan {
        framework: Framework::Lcme,
        label: NodeLabel::LcmeStandard,
        levels: vec![
            LevelPlan::new(
                "Standards",
                EXPECTED_STANDARDS,
                MergeTemplate::new(
                    NodeLabel::LcmeStandard,
                    &["id", "name", "title", "description", "framework"],
                ),
            ),
            LevelPlan::new(
                "Elements",
                EXPECTED_ELEMENTS,
                MergeTemplate::new(
                    NodeLabel::LcmeElement,
                    &["id", "name", "title", "description", "framework", "standard_number"],
                )
                .contained_in(NodeLabel::LcmeStandard, RelationshipType::HasElement, "standard_number"),
            ),
        ],
        orphan_checks: vec![OrphanCheck {
            child: NodeLabel::LcmeElement,
            parent: NodeLabel::LcmeStandard,
            relationship: RelationshipType::HasElement,
        }],
    }
}

pub fn dataset() -> Result<Dataset, DatasetError> {
    Dataset::from_yaml(DATA)
}

pub fn loader(batch: BatchLoader) -> Result<TaxonomyLoader, DatasetError> {
    TaxonomyLoader::new(plan(), dataset()?, batch)
}
