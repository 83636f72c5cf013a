//! Load, verification and run report types.

use crate::label::{Framework, NodeLabel};
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Key recorded on errors synthesized for a loader that failed outright.
pub const ORCHESTRATOR_ERROR_KEY: &str = "orchestrator";

/// Count reported when a verification could not be performed at all.
pub const UNVERIFIED: i64 = -1;

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// A failure to write one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeError {
    /// Natural key of the item, or [`ORCHESTRATOR_ERROR_KEY`].
    pub key: String,
    pub label: NodeLabel,
    pub message: String,
}

impl NodeError {
    pub fn new(key: impl Into<String>, label: NodeLabel, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label,
            message: message.into(),
        }
    }
}

/// Outcome of loading one framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadResult {
    pub framework: Framework,
    /// Primary label of the framework.
    pub label: NodeLabel,
    pub nodes_created: u64,
    pub nodes_updated: u64,
    pub relationships_created: u64,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
    pub errors: Vec<NodeError>,
}

impl LoadResult {
    pub fn new(framework: Framework, label: NodeLabel) -> Self {
        Self {
            framework,
            label,
            nodes_created: 0,
            nodes_updated: 0,
            relationships_created: 0,
            duration: Duration::ZERO,
            errors: Vec::new(),
        }
    }

    /// Result standing in for a load that failed before producing one.
    pub fn failed(
        framework: Framework,
        label: NodeLabel,
        message: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            duration,
            errors: vec![NodeError::new(ORCHESTRATOR_ERROR_KEY, label, message)],
            ..Self::new(framework, label)
        }
    }

    /// Nodes created or updated.
    pub fn nodes_written(&self) -> u64 {
        self.nodes_created + self.nodes_updated
    }
}

/// Outcome of verifying one framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub framework: Framework,
    pub label: NodeLabel,
    pub expected_count: i64,
    pub actual_count: i64,
    pub passed: bool,
    pub orphan_count: i64,
    /// One line per checked label, plus the orphan and total lines.
    pub details: String,
}

impl VerificationResult {
    /// Result standing in for a verification that could not run.
    pub fn failed(framework: Framework, label: NodeLabel, message: impl std::fmt::Display) -> Self {
        Self {
            framework,
            label,
            expected_count: UNVERIFIED,
            actual_count: UNVERIFIED,
            passed: false,
            orphan_count: UNVERIFIED,
            details: format!("Verification failed: {message}"),
        }
    }
}

/// Aggregate of one orchestrated run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub results: Vec<LoadResult>,
    pub verifications: Vec<VerificationResult>,
    pub total_nodes: u64,
    pub total_relationships: u64,
    #[serde(rename = "total_duration_ms", serialize_with = "as_millis")]
    pub total_duration: Duration,
    pub all_passed: bool,
}

impl RunReport {
    pub fn new(
        results: Vec<LoadResult>,
        verifications: Vec<VerificationResult>,
        total_duration: Duration,
    ) -> Self {
        let total_nodes = results.iter().map(LoadResult::nodes_written).sum();
        let total_relationships = results.iter().map(|r| r.relationships_created).sum();
        let all_passed = verifications.iter().all(|v| v.passed);
        Self {
            results,
            verifications,
            total_nodes,
            total_relationships,
            total_duration,
            all_passed,
        }
    }

    /// Per-item errors across all loads.
    pub fn total_errors(&self) -> usize {
        self.results.iter().map(|r| r.errors.len()).sum()
    }

    pub fn failed_verifications(&self) -> impl Iterator<Item = &VerificationResult> {
        self.verifications.iter().filter(|v| !v.passed)
    }

    /// Generate a summary string.
    pub fn summary(&self) -> String {
        let status = if self.all_passed { "ALL PASSED" } else { "SOME FAILED" };
        let mut summary = format!(
            "Seed Report: {status}\n\
             ============\n\
             Nodes: {}\n\
             Relationships: {}\n\
             Errors: {}\n\
             Duration: {:?}\n",
            self.total_nodes,
            self.total_relationships,
            self.total_errors(),
            self.total_duration
        );

        if !self.results.is_empty() {
            summary.push_str("\nLoads:\n");
            for result in &self.results {
                summary.push_str(&format!(
                    "- {} ({}): {} created, {} updated, {} relationships, {} errors, {:?}\n",
                    result.framework,
                    result.label,
                    result.nodes_created,
                    result.nodes_updated,
                    result.relationships_created,
                    result.errors.len(),
                    result.duration
                ));
            }
        }

        if !self.verifications.is_empty() {
            summary.push_str("\nVerification:\n");
            for verification in &self.verifications {
                let mark = if verification.passed { "PASS" } else { "FAIL" };
                summary.push_str(&format!(
                    "- [{mark}] {} ({}): {}/{}, {} orphans\n",
                    verification.framework,
                    verification.label,
                    verification.actual_count,
                    verification.expected_count,
                    verification.orphan_count
                ));
                for line in verification.details.lines() {
                    summary.push_str(&format!("    {line}\n"));
                }
            }
        }

        let errors: Vec<&NodeError> = self.results.iter().flat_map(|r| &r.errors).collect();
        if !errors.is_empty() {
            summary.push_str("\nErrors:\n");
            for error in errors {
                summary.push_str(&format!(
                    "- {} {}: {}\n",
                    error.label, error.key, error.message
                ));
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(framework: Framework, label: NodeLabel, created: u64, updated: u64, rels: u64) -> LoadResult {
        LoadResult {
            nodes_created: created,
            nodes_updated: updated,
            relationships_created: rels,
            ..LoadResult::new(framework, label)
        }
    }

    fn verified(framework: Framework, label: NodeLabel, passed: bool) -> VerificationResult {
        VerificationResult {
            framework,
            label,
            expected_count: 4,
            actual_count: if passed { 4 } else { 3 },
            passed,
            orphan_count: 0,
            details: "Total: 4/4".to_string(),
        }
    }

    #[test]
    fn test_totals() {
        let report = RunReport::new(
            vec![
                load(Framework::Acgme, NodeLabel::AcgmeDomain, 6, 0, 5),
                load(Framework::Miller, NodeLabel::MillerLevel, 0, 4, 3),
            ],
            vec![
                verified(Framework::Acgme, NodeLabel::AcgmeDomain, true),
                verified(Framework::Miller, NodeLabel::MillerLevel, true),
            ],
            Duration::from_millis(20),
        );

        assert_eq!(report.total_nodes, 10);
        assert_eq!(report.total_relationships, 8);
        assert!(report.all_passed);
        assert!(report.summary().contains("ALL PASSED"));
    }

    #[test]
    fn test_one_failed_verification_fails_the_run() {
        let report = RunReport::new(
            vec![],
            vec![
                verified(Framework::Acgme, NodeLabel::AcgmeDomain, true),
                verified(Framework::Miller, NodeLabel::MillerLevel, false),
            ],
            Duration::ZERO,
        );

        assert!(!report.all_passed);
        assert_eq!(report.failed_verifications().count(), 1);
        assert!(report.summary().contains("[FAIL] miller"));
    }

    #[test]
    fn test_failed_load_carries_orchestrator_error() {
        let result = LoadResult::failed(
            Framework::Lcme,
            NodeLabel::LcmeStandard,
            "Graph store unavailable: refused",
            Duration::from_millis(3),
        );

        assert_eq!(result.nodes_written(), 0);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].key, ORCHESTRATOR_ERROR_KEY);
    }

    #[test]
    fn test_failed_verification_uses_sentinels() {
        let result = VerificationResult::failed(Framework::Epa, NodeLabel::Epa, "connection reset");

        assert_eq!(result.expected_count, -1);
        assert_eq!(result.actual_count, -1);
        assert_eq!(result.orphan_count, -1);
        assert!(!result.passed);
        assert_eq!(result.details, "Verification failed: connection reset");
    }

    #[test]
    fn test_report_serializes_durations_as_millis() {
        let report = RunReport::new(
            vec![load(Framework::Bloom, NodeLabel::BloomLevel, 6, 0, 0)],
            vec![],
            Duration::from_millis(1500),
        );
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["total_duration_ms"], 1500);
        assert_eq!(json["results"][0]["label"], "BloomLevel");
        assert_eq!(json["results"][0]["framework"], "bloom");
    }
}
