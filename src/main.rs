//! Command-line interface for framework-seed
//!
//! # Usage Examples
//!
//! ```bash
//! # Ensure constraints, load all frameworks, verify
//! framework-seed run \
//!   --neo4j-uri bolt://localhost:7687 \
//!   --neo4j-password secret \
//!   --report-json seed-report.json
//!
//! # Load only ACGME and UME
//! framework-seed run --only acgme,ume --neo4j-password secret
//!
//! # Verify without writing
//! framework-seed verify --neo4j-password secret
//!
//! # Ensure the uniqueness constraints only
//! framework-seed constraints --neo4j-password secret
//! ```
//!
//! Exits with status 1 when any verification fails.

use anyhow::Context;
use clap::{Parser, Subcommand};
use framework_seed::{build_orchestrator, connect, write_report, SeedOpts};
use seed_core::{ConstraintInitializer, RunReport};
use seed_neo4j::Neo4jArgs;

#[derive(Parser)]
#[command(name = "framework-seed")]
#[command(about = "Seed and verify medical-education reference frameworks in a graph database")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure constraints, load every framework and verify the result
    Run {
        #[command(flatten)]
        neo4j: Neo4jArgs,

        #[command(flatten)]
        opts: SeedOpts,
    },

    /// Verify loaded frameworks without writing anything
    Verify {
        #[command(flatten)]
        neo4j: Neo4jArgs,

        #[command(flatten)]
        opts: SeedOpts,
    },

    /// Ensure the natural-key uniqueness constraints and exit
    Constraints {
        #[command(flatten)]
        neo4j: Neo4jArgs,

        /// Dry run mode - run against an in-memory graph instead of Neo4j
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { neo4j, opts } => {
            let graph = connect(&neo4j, opts.dry_run)?;
            let orchestrator = build_orchestrator(graph, &opts)?;
            let report = orchestrator.run().await.context("Seed run failed")?;
            finish(&report, &opts)
        }
        Commands::Verify { neo4j, opts } => {
            let graph = connect(&neo4j, opts.dry_run)?;
            let orchestrator = build_orchestrator(graph, &opts)?;
            let report = orchestrator
                .verify_only()
                .await
                .context("Verification failed")?;
            finish(&report, &opts)
        }
        Commands::Constraints { neo4j, dry_run } => {
            let graph = connect(&neo4j, dry_run)?;
            let count = ConstraintInitializer::new()
                .ensure(graph.as_ref())
                .await
                .context("Failed to ensure constraints")?;
            println!("Ensured {count} uniqueness constraints");
            Ok(())
        }
    }
}

fn finish(report: &RunReport, opts: &SeedOpts) -> anyhow::Result<()> {
    println!("{}", report.summary());
    if let Some(path) = &opts.report_json {
        write_report(report, path)?;
    }
    if !report.all_passed {
        let failed: Vec<String> = report
            .failed_verifications()
            .map(|v| v.framework.to_string())
            .collect();
        anyhow::bail!("verification failed for: {}", failed.join(", "));
    }
    Ok(())
}
