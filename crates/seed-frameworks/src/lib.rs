//! Reference medical-education taxonomies and their loaders.
//!
//! Each module holds one framework's plan (levels, expected counts, merge
//! templates, orphan checks) and its dataset, embedded from `data/` at compile
//! time. [`default_loaders`] returns all eight in dependency order.
//!
//! # Example
//!
//! ```ignore
//! use seed_core::{BatchLoader, LoadOrchestrator, MemoryGraph};
//! use std::sync::Arc;
//!
//! let graph = Arc::new(MemoryGraph::new());
//! let batch = BatchLoader::new(graph.clone());
//! let mut orchestrator = LoadOrchestrator::new(graph);
//! for loader in seed_frameworks::default_loaders(&batch)? {
//!     orchestrator.register_loader(loader)?;
//! }
//! ```

pub mod aamc;
pub mod acgme;
pub mod bloom;
mod dataset;
pub mod epa;
pub mod lcme;
pub mod miller;
mod taxonomy;
pub mod ume;
pub mod usmle;

pub use dataset::{Dataset, DatasetError};
pub use taxonomy::{LevelPlan, TaxonomyLoader, TaxonomyPlan};

use seed_core::{BatchLoader, Framework, FrameworkLoader};

/// Registration order. UME links to ACGME domains, so ACGME precedes it.
pub const LOAD_ORDER: [Framework; 8] = [
    Framework::Usmle,
    Framework::Lcme,
    Framework::Acgme,
    Framework::Aamc,
    Framework::Ume,
    Framework::Epa,
    Framework::Bloom,
    Framework::Miller,
];

/// Build the loader of one framework.
pub fn loader_for(framework: Framework, batch: &BatchLoader) -> Result<TaxonomyLoader, DatasetError> {
    let batch = batch.clone();
    match framework {
        Framework::Usmle => usmle::loader(batch),
        Framework::Lcme => lcme::loader(batch),
        Framework::Acgme => acgme::loader(batch),
        Framework::Aamc => aamc::loader(batch),
        Framework::Ume => ume::loader(batch),
        Framework::Epa => epa::loader(batch),
        Framework::Bloom => bloom::loader(batch),
        Framework::Miller => miller::loader(batch),
    }
}

/// Loaders for the selected frameworks, in [`LOAD_ORDER`] regardless of the
/// order they were selected in.
pub fn loaders(
    selected: &[Framework],
    batch: &BatchLoader,
) -> Result<Vec<Box<dyn FrameworkLoader>>, DatasetError> {
    LOAD_ORDER
        .iter()
        .filter(|framework| selected.contains(*framework))
        .map(|&framework| {
            loader_for(framework, batch).map(|loader| Box::new(loader) as Box<dyn FrameworkLoader>)
        })
        .collect()
}

/// All eight loaders in [`LOAD_ORDER`].
pub fn default_loaders(batch: &BatchLoader) -> Result<Vec<Box<dyn FrameworkLoader>>, DatasetError> {
    loaders(&LOAD_ORDER, batch)
}

#[cfg(test)]
pub(crate) mod testing {
    use seed_core::{
        BatchLoader, FrameworkLoader, LoadResult, MemoryGraph, VerificationResult,
    };
    use std::sync::Arc;

    pub fn batch_loader(graph: &MemoryGraph) -> BatchLoader {
        BatchLoader::new(Arc::new(graph.clone()))
    }

    pub async fn load_and_verify(loader: &dyn FrameworkLoader) -> (LoadResult, VerificationResult) {
        let result = loader.load().await.unwrap();
        let verification = loader.verify().await.unwrap();
        (result, verification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_core::{MemoryGraph, NodeLabel};
    use std::collections::BTreeSet;

    #[test]
    fn test_default_loaders_in_dependency_order() {
        let graph = MemoryGraph::new();
        let loaders = default_loaders(&testing::batch_loader(&graph)).unwrap();
        let frameworks: Vec<Framework> = loaders.iter().map(|l| l.framework()).collect();

        assert_eq!(frameworks, LOAD_ORDER.to_vec());
        let acgme = frameworks.iter().position(|f| *f == Framework::Acgme);
        let ume = frameworks.iter().position(|f| *f == Framework::Ume);
        assert!(acgme < ume);
    }

    #[test]
    fn test_selection_keeps_dependency_order() {
        let graph = MemoryGraph::new();
        let loaders = loaders(
            &[Framework::Ume, Framework::Bloom, Framework::Acgme],
            &testing::batch_loader(&graph),
        )
        .unwrap();
        let frameworks: Vec<Framework> = loaders.iter().map(|l| l.framework()).collect();

        assert_eq!(frameworks, vec![Framework::Acgme, Framework::Ume, Framework::Bloom]);
    }

    #[test]
    fn test_primary_labels_are_distinct() {
        let graph = MemoryGraph::new();
        let loaders = default_loaders(&testing::batch_loader(&graph)).unwrap();
        let labels: BTreeSet<NodeLabel> = loaders.iter().map(|l| l.label()).collect();

        assert_eq!(labels.len(), 8);
    }

    #[test]
    fn test_expected_totals() {
        let totals: Vec<u64> = LOAD_ORDER
            .iter()
            .map(|&f| loader_for(f, &testing::batch_loader(&MemoryGraph::new())).unwrap().plan().expected_total())
            .collect();

        assert_eq!(totals, vec![227, 105, 36, 8, 55, 13, 6, 4]);
    }

    #[test]
    fn test_ume_alignments_name_existing_acgme_domains() {
        let acgme = acgme::dataset().unwrap();
        let domains: BTreeSet<String> = acgme
            .items(NodeLabel::AcgmeDomain)
            .iter()
            .map(|d| d.key.to_string())
            .collect();
        let ume = ume::dataset().unwrap();

        for competency in ume.items(NodeLabel::UmeCompetency) {
            let aligned = competency
                .attributes
                .get("aligns_with")
                .and_then(|v| v.as_text())
                .unwrap();
            assert!(domains.contains(aligned), "{aligned} is not an ACGME domain");
        }
    }

    #[test]
    fn test_ids_unique_across_datasets() {
        let mut ids = BTreeSet::new();
        for framework in LOAD_ORDER {
            let loader = loader_for(framework, &testing::batch_loader(&MemoryGraph::new())).unwrap();
            for label in loader.dataset().labels() {
                for item in loader.dataset().items(label) {
                    assert!(ids.insert(item.id.clone()), "duplicate id {}", item.id);
                }
            }
        }
    }
}
