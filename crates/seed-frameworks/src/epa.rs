//! AAMC Core Entrustable Professional Activities, keyed by number.

use crate::dataset::{Dataset, DatasetError};
use crate::taxonomy::{LevelPlan, TaxonomyLoader, TaxonomyPlan};
use seed_core::{BatchLoader, Framework, MergeTemplate, NodeLabel};

pub const EXPECTED_EPAS: u64 = 13;

const DATA: &str = include_str!("../data/epa.yaml");

pub fn plan() -> TaxonomyPlan {
    TaxonomyPlan {
        framework: Framework::Epa,
        label: NodeLabel::Epa,
        levels: vec![LevelPlan::new(
            "EPAs",
            EXPECTED_EPAS,
            MergeTemplate::new(
                NodeLabel::Epa,
                &["id", "name", "title", "description", "framework"],
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
