//! Runs registered loaders: constraints, then loads, then verifications.

use crate::constraints::ConstraintInitializer;
use crate::error::SeedError;
use crate::graph::GraphGateway;
use crate::label::NodeLabel;
use crate::loader::FrameworkLoader;
use crate::report::{LoadResult, RunReport, VerificationResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Lifecycle of a registered loader within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase {
    Registered,
    Loaded,
    Verified,
}

struct Registration {
    loader: Box<dyn FrameworkLoader>,
    phase: LoaderPhase,
}

impl Registration {
    async fn load(&mut self) -> LoadResult {
        let framework = self.loader.framework();
        let label = self.loader.label();
        let started = Instant::now();
        info!("[{}] Loading {}...", framework, label);

        let result = match self.loader.load().await {
            Ok(result) => {
                info!(
                    "[{}] {}: {} created, {} updated ({}ms)",
                    framework,
                    label,
                    result.nodes_created,
                    result.nodes_updated,
                    result.duration.as_millis()
                );
                result
            }
            Err(e) => {
                error!("[{}] FAILED: {}", framework, e);
                LoadResult::failed(framework, label, e.to_string(), started.elapsed())
            }
        };
        self.phase = LoaderPhase::Loaded;
        result
    }

    async fn verify(&mut self) -> VerificationResult {
        let framework = self.loader.framework();
        let label = self.loader.label();

        let result = match self.loader.verify().await {
            Ok(result) => result,
            Err(e) => {
                error!("[{}] Verification failed: {}", framework, e);
                VerificationResult::failed(framework, label, e)
            }
        };
        if result.passed {
            debug!("[{}] verified", framework);
        } else {
            warn!("[{}] verification FAILED:\n{}", framework, result.details);
        }
        self.phase = LoaderPhase::Verified;
        result
    }
}

/// Drives a set of framework loaders against one graph store.
///
/// Loaders run in registration order, so a loader whose merges link to
/// another framework's nodes must be registered after it.
pub struct LoadOrchestrator {
    graph: Arc<dyn GraphGateway>,
    constraints: ConstraintInitializer,
    registrations: Vec<Registration>,
}

impl LoadOrchestrator {
    pub fn new(graph: Arc<dyn GraphGateway>) -> Self {
        Self {
            graph,
            constraints: ConstraintInitializer::new(),
            registrations: Vec::new(),
        }
    }

    pub fn with_constraints(mut self, constraints: ConstraintInitializer) -> Self {
        self.constraints = constraints;
        self
    }

    /// Register a loader. Fails if one is already registered for its label.
    pub fn register_loader(&mut self, loader: Box<dyn FrameworkLoader>) -> Result<(), SeedError> {
        let label = loader.label();
        if self.registrations.iter().any(|r| r.loader.label() == label) {
            return Err(SeedError::DuplicateRegistration { label });
        }
        debug!("Registered loader for {}", label);
        self.registrations.push(Registration {
            loader,
            phase: LoaderPhase::Registered,
        });
        Ok(())
    }

    pub fn labels(&self) -> Vec<NodeLabel> {
        self.registrations.iter().map(|r| r.loader.label()).collect()
    }

    pub fn phases(&self) -> Vec<(NodeLabel, LoaderPhase)> {
        self.registrations
            .iter()
            .map(|r| (r.loader.label(), r.phase))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Ensure constraints, load every framework, then verify every framework.
    ///
    /// Only a constraint failure aborts the run. A loader that fails is
    /// recorded and the run continues with the next one.
    pub async fn run(mut self) -> Result<RunReport, SeedError> {
        let started = Instant::now();

        self.constraints.ensure(self.graph.as_ref()).await?;

        let mut results = Vec::with_capacity(self.registrations.len());
        for registration in &mut self.registrations {
            results.push(registration.load().await);
        }

        let verifications = self.verify_all().await;
        let report = RunReport::new(results, verifications, started.elapsed());
        log_completion(&report);
        Ok(report)
    }

    /// Verify every framework without loading anything.
    pub async fn verify_only(mut self) -> Result<RunReport, SeedError> {
        let started = Instant::now();
        let verifications = self.verify_all().await;
        let report = RunReport::new(Vec::new(), verifications, started.elapsed());
        log_completion(&report);
        Ok(report)
    }

    async fn verify_all(&mut self) -> Vec<VerificationResult> {
        let mut verifications = Vec::with_capacity(self.registrations.len());
        for registration in &mut self.registrations {
            verifications.push(registration.verify().await);
        }
        verifications
    }
}

fn log_completion(report: &RunReport) {
    info!(
        "Complete: {} nodes, {} relationships ({}ms)",
        report.total_nodes,
        report.total_relationships,
        report.total_duration.as_millis()
    );
    if report.all_passed {
        info!("Verifications: ALL PASSED");
    } else {
        warn!("Verifications: SOME FAILED");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::label::Framework;
    use crate::memory::MemoryGraph;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubLoader {
        framework: Framework,
        label: NodeLabel,
        created: u64,
        relationships: u64,
        fail_load: bool,
        fail_verify: bool,
        passes: bool,
        calls: Arc<AtomicUsize>,
    }

    impl StubLoader {
        fn new(framework: Framework, label: NodeLabel, created: u64, relationships: u64) -> Self {
            Self {
                framework,
                label,
                created,
                relationships,
                fail_load: false,
                fail_verify: false,
                passes: true,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl FrameworkLoader for StubLoader {
        fn framework(&self) -> Framework {
            self.framework
        }

        fn label(&self) -> NodeLabel {
            self.label
        }

        async fn load(&self) -> Result<LoadResult, SeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_load {
                return Err(StoreError::Unavailable("connection refused".into()).into());
            }
            Ok(LoadResult {
                nodes_created: self.created,
                relationships_created: self.relationships,
                duration: Duration::from_millis(1),
                ..LoadResult::new(self.framework, self.label)
            })
        }

        async fn verify(&self) -> Result<VerificationResult, SeedError> {
            if self.fail_verify {
                return Err(StoreError::Result("bad row".into()).into());
            }
            Ok(VerificationResult {
                framework: self.framework,
                label: self.label,
                expected_count: self.created as i64,
                actual_count: self.created as i64,
                passed: self.passes,
                orphan_count: 0,
                details: String::new(),
            })
        }
    }

    fn orchestrator() -> (MemoryGraph, LoadOrchestrator) {
        let graph = MemoryGraph::new();
        let orchestrator = LoadOrchestrator::new(Arc::new(graph.clone()));
        (graph, orchestrator)
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let (_, mut orchestrator) = orchestrator();
        orchestrator
            .register_loader(Box::new(StubLoader::new(Framework::Epa, NodeLabel::Epa, 13, 0)))
            .unwrap();

        let err = orchestrator
            .register_loader(Box::new(StubLoader::new(Framework::Epa, NodeLabel::Epa, 13, 0)))
            .unwrap_err();

        assert!(matches!(err, SeedError::DuplicateRegistration { label: NodeLabel::Epa }));
        assert!(err.to_string().contains("EPA"));
        assert_eq!(orchestrator.len(), 1);
        assert_eq!(
            orchestrator.phases(),
            vec![(NodeLabel::Epa, LoaderPhase::Registered)]
        );
    }

    #[tokio::test]
    async fn test_run_aggregates_results() {
        let (graph, mut orchestrator) = orchestrator();
        orchestrator
            .register_loader(Box::new(StubLoader::new(Framework::Acgme, NodeLabel::AcgmeDomain, 6, 5)))
            .unwrap();
        orchestrator
            .register_loader(Box::new(StubLoader::new(Framework::Miller, NodeLabel::MillerLevel, 4, 3)))
            .unwrap();

        let report = orchestrator.run().await.unwrap();

        assert_eq!(report.total_nodes, 10);
        assert_eq!(report.total_relationships, 8);
        assert!(report.all_passed);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.verifications.len(), 2);
        assert_eq!(graph.constrained_labels().len(), 15);
    }

    #[tokio::test]
    async fn test_failed_load_does_not_stop_the_run() {
        let (_, mut orchestrator) = orchestrator();
        let mut failing = StubLoader::new(Framework::Lcme, NodeLabel::LcmeStandard, 0, 0);
        failing.fail_load = true;
        failing.passes = false;
        let next = StubLoader::new(Framework::Epa, NodeLabel::Epa, 13, 0);
        let next_calls = next.calls.clone();
        orchestrator.register_loader(Box::new(failing)).unwrap();
        orchestrator.register_loader(Box::new(next)).unwrap();

        let report = orchestrator.run().await.unwrap();

        assert_eq!(next_calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.results[0].errors.len(), 1);
        assert_eq!(report.results[0].errors[0].key, "orchestrator");
        assert_eq!(report.results[0].label, NodeLabel::LcmeStandard);
        assert_eq!(report.results[1].nodes_created, 13);
        assert!(!report.all_passed);
    }

    #[tokio::test]
    async fn test_failed_verification_reports_sentinels() {
        let (_, mut orchestrator) = orchestrator();
        let mut loader = StubLoader::new(Framework::Bloom, NodeLabel::BloomLevel, 6, 0);
        loader.fail_verify = true;
        orchestrator.register_loader(Box::new(loader)).unwrap();

        let report = orchestrator.run().await.unwrap();
        let verification = &report.verifications[0];

        assert_eq!(verification.expected_count, -1);
        assert_eq!(verification.actual_count, -1);
        assert_eq!(verification.orphan_count, -1);
        assert!(verification.details.starts_with("Verification failed: "));
        assert!(!report.all_passed);
    }

    #[tokio::test]
    async fn test_constraint_failure_aborts_before_loading() {
        let (graph, mut orchestrator) = orchestrator();
        let loader = StubLoader::new(Framework::Epa, NodeLabel::Epa, 13, 0);
        let calls = loader.calls.clone();
        orchestrator.register_loader(Box::new(loader)).unwrap();
        graph.set_unavailable(true);

        assert!(orchestrator.run().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_verify_only_skips_loading() {
        let (_, mut orchestrator) = orchestrator();
        let loader = StubLoader::new(Framework::Epa, NodeLabel::Epa, 13, 0);
        let calls = loader.calls.clone();
        orchestrator.register_loader(Box::new(loader)).unwrap();

        let report = orchestrator.verify_only().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(report.results.is_empty());
        assert_eq!(report.verifications.len(), 1);
        assert!(report.all_passed);
    }

    #[tokio::test]
    async fn test_empty_orchestrator_passes() {
        let (_, orchestrator) = orchestrator();
        assert!(orchestrator.is_empty());

        let report = orchestrator.run().await.unwrap();

        assert_eq!(report.total_nodes, 0);
        assert!(report.all_passed);
    }
}
