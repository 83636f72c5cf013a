//! AAMC physician competency domains.

use crate::dataset::{Dataset, DatasetError};
use crate::taxonomy::{LevelPlan, TaxonomyLoader, TaxonomyPlan};
use seed_core::{BatchLoader, Framework, MergeTemplate, NodeLabel};

pub const EXPECTED_DOMAINS: u64 = 8;

const DATA: &str = include_str!("../data/aamc.yaml");

pub fn plan() -> TaxonomyPlan {
    TaxonomyPlan {
        framework: Framework::Aamc,
        label: NodeLabel::AamcDomain,
        levels: vec![LevelPlan::new(
            "Domains",
            EXPECTED_DOMAINS,
            MergeTemplate::new(
                NodeLabel::AamcDomain,
                &["id", "name", "description", "framework", "sort_order"],
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
