//! UME competencies and subcompetencies.
//!
//! Each competency aligns with an ACGME domain, so ACGME must be loaded first.

use crate::dataset::{Dataset, DatasetError};
use crate::taxonomy::{LevelPlan, TaxonomyLoader, TaxonomyPlan};
use seed_core::{BatchLoader, Framework, MergeTemplate, NodeLabel, OrphanCheck, RelationshipType};

pub const EXPECTED_COMPETENCIES: u64 = 6;
pub const EXPECTED_SUBCOMPETENCIES: u64 = 49;

const DATA: &str = include_str!("../data/ume.yaml");

pub fn plan() -> TaxonomyPlan {
    TaxonomyPlan {
        framework: Framework::Ume,
        label: NodeLabel::UmeCompetency,
        levels: vec![
            LevelPlan::new(
                "Competencies",
                EXPECTED_COMPETENCIES,
                MergeTemplate::new(
                    NodeLabel::UmeCompetency,
                    &["id", "name", "description", "framework", "aligns_with"],
                )
                .bridged_to(NodeLabel::AcgmeDomain, RelationshipType::AlignsWith, "aligns_with"),
            ),
            LevelPlan::new(
                "Subcompetencies",
                EXPECTED_SUBCOMPETENCIES,
                MergeTemplate::new(
                    NodeLabel::UmeSubcompetency,
                    &["id", "name", "description", "framework", "parent_code"],
                )
                .contained_in(NodeLabel::UmeCompetency, RelationshipType::HasSubcompetency, "parent_code"),
            ),
        ],
        orphan_checks: vec![OrphanCheck {
            child: NodeLabel::UmeSubcompetency,
            parent: NodeLabel::UmeCompetency,
            relationship: RelationshipType::HasSubcompetency,
        }],
    }
}

pub fn dataset() -> Result<Dataset, DatasetError> {
    Dataset::from_yaml(DATA)
}

pub fn loader(batch: BatchLoader) -> Result<TaxonomyLoader, DatasetError> {
    TaxonomyLoader::new(plan(), dataset()?, batch)
}
