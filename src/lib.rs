//! Framework Seed
//!
//! Seeds a property graph with eight medical-education reference frameworks
//! (USMLE, LCME, ACGME, AAMC, UME, EPA, Bloom, Miller) and proves afterwards
//! that every node and containment edge landed.
//!
//! # Crates
//!
//! - `seed_core` - batch loader, constraints, verification and orchestration
//! - `seed_neo4j` - Neo4j gateway over `neo4rs`
//! - `seed_frameworks` - the eight framework loaders and their datasets
//!
//! # CLI Usage
//!
//! ```bash
//! # Load and verify everything
//! framework-seed run --neo4j-uri bolt://localhost:7687 --neo4j-password secret
//!
//! # Check an existing database without writing
//! framework-seed verify --neo4j-password secret --report-json report.json
//!
//! # Validate datasets and load order without a database
//! framework-seed run --dry-run
//! ```

use anyhow::Context;
use clap::Parser;
use seed_core::{
    BatchLoader, Framework, GraphGateway, LoadOrchestrator, MemoryGraph, RunReport,
    DEFAULT_CHUNK_SIZE,
};
use seed_neo4j::{Neo4jArgs, Neo4jGateway};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Options shared by the seeding commands.
#[derive(Parser, Clone, Debug)]
pub struct SeedOpts {
    /// Items written per session and transaction
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "SEED_BATCH_SIZE")]
    pub batch_size: usize,

    /// Dry run mode - run against an in-memory graph instead of Neo4j
    #[arg(long)]
    pub dry_run: bool,

    /// Write the run report as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Restrict the run to these frameworks (comma-separated, e.g. acgme,ume)
    #[arg(long, value_delimiter = ',', value_parser = parse_framework)]
    pub only: Vec<Framework>,
}

impl SeedOpts {
    /// Selected frameworks; all of them when `--only` is not given.
    pub fn frameworks(&self) -> Vec<Framework> {
        if self.only.is_empty() {
            Framework::ALL.to_vec()
        } else {
            self.only.clone()
        }
    }
}

/// Parse a framework name as accepted by `--only`.
pub fn parse_framework(s: &str) -> Result<Framework, String> {
    Framework::parse(s.trim()).ok_or_else(|| {
        let known: Vec<&str> = Framework::ALL.iter().map(|f| f.as_str()).collect();
        format!("unknown framework '{s}' (expected one of: {})", known.join(", "))
    })
}

/// Gateway selected by the options: Neo4j, or an in-memory graph for dry runs.
pub fn connect(neo4j: &Neo4jArgs, dry_run: bool) -> anyhow::Result<Arc<dyn GraphGateway>> {
    if dry_run {
        info!("Dry run: using an in-memory graph");
        return Ok(Arc::new(MemoryGraph::new()));
    }
    let gateway = Neo4jGateway::from_args(neo4j)
        .with_context(|| format!("Failed to connect to Neo4j at {}", neo4j.neo4j_uri))?;
    Ok(Arc::new(gateway))
}

/// Register the selected framework loaders, in dependency order.
pub fn build_orchestrator(
    graph: Arc<dyn GraphGateway>,
    opts: &SeedOpts,
) -> anyhow::Result<LoadOrchestrator> {
    let batch = BatchLoader::new(graph.clone())
        .with_chunk_size(opts.batch_size)
        .context("Invalid --batch-size")?;
    let selected = opts.frameworks();
    if selected.contains(&Framework::Ume) && !selected.contains(&Framework::Acgme) {
        warn!("UME competencies align with ACGME domains; ACGME must already be loaded");
    }

    let mut orchestrator = LoadOrchestrator::new(graph);
    for loader in seed_frameworks::loaders(&selected, &batch)
        .context("Failed to build framework loaders")?
    {
        orchestrator.register_loader(loader)?;
    }
    info!(
        "Registered {} framework loaders (batch size: {})",
        orchestrator.len(),
        batch.chunk_size()
    );
    Ok(orchestrator)
}

/// Write a run report as pretty-printed JSON.
pub fn write_report(report: &RunReport, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize run report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write run report to {path:?}"))?;
    info!("Wrote run report to {:?}", path);
    Ok(())
}
