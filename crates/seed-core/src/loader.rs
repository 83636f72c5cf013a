//! The contract each reference taxonomy implements.

use crate::error::SeedError;
use crate::label::{Framework, NodeLabel};
use crate::report::{LoadResult, VerificationResult};
use async_trait::async_trait;

/// Loads one reference taxonomy and verifies it afterwards.
///
/// `load` writes its levels in dependency order, parents before children.
/// `verify` must not trust `load`'s counters; it re-counts the store.
#[async_trait]
pub trait FrameworkLoader: Send + Sync {
    fn framework(&self) -> Framework;

    /// Primary label; at most one loader may be registered per label.
    fn label(&self) -> NodeLabel;

    async fn load(&self) -> Result<LoadResult, SeedError>;

    async fn verify(&self) -> Result<VerificationResult, SeedError>;
}
