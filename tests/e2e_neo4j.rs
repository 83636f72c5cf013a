//! End-to-end seeding against a live Neo4j.
//!
//! Needs a Neo4j at `NEO4J_TEST_URL` (default `bolt://neo4j:7687`) with user
//! `neo4j` / `password`. The database is wiped first, so these are ignored by
//! default: `cargo test --test e2e_neo4j -- --ignored`.

use framework_seed::{build_orchestrator, SeedOpts};
use seed_core::{
    ConstraintInitializer, Framework, GraphGateway, LoadOrchestrator, NodeLabel, Statement,
};
use seed_neo4j::Neo4jGateway;
use std::sync::Arc;

fn test_gateway() -> Neo4jGateway {
    let uri = std::env::var("NEO4J_TEST_URL").unwrap_or_else(|_| "bolt://neo4j:7687".to_string());
    Neo4jGateway::new(&uri, "neo4j", "password", "neo4j").unwrap()
}

async fn delete_frameworks(gateway: &Neo4jGateway) {
    for label in NodeLabel::ALL {
        gateway
            .graph()
            .run(neo4rs::query(&format!("MATCH (n:{label}) DETACH DELETE n")))
            .await
            .unwrap();
    }
}

fn opts(only: Vec<Framework>) -> SeedOpts {
    SeedOpts {
        batch_size: 50,
        dry_run: false,
        report_json: None,
        only,
    }
}

async fn seed(gateway: &Neo4jGateway, only: Vec<Framework>) -> seed_core::RunReport {
    let graph: Arc<dyn GraphGateway> = Arc::new(gateway.clone());
    let orchestrator: LoadOrchestrator = build_orchestrator(graph, &opts(only)).unwrap();
    orchestrator.run().await.unwrap()
}

#[tokio::test]
#[ignore]
async fn test_seed_all_frameworks_e2e() {
    tracing_subscriber::fmt()
        .with_env_filter("seed_core=debug,seed_neo4j=debug")
        .try_init()
        .ok();

    let gateway = test_gateway();
    delete_frameworks(&gateway).await;

    let first = seed(&gateway, Vec::new()).await;
    assert!(first.all_passed, "{}", first.summary());
    assert_eq!(first.total_nodes, 454);
    assert_eq!(first.total_relationships, 378);
    assert_eq!(first.total_errors(), 0);

    let second = seed(&gateway, Vec::new()).await;
    assert!(second.all_passed, "{}", second.summary());
    assert_eq!(second.total_nodes, 454);
    assert_eq!(second.total_relationships, 0);
    assert_eq!(second.results.iter().map(|r| r.nodes_created).sum::<u64>(), 0);
}

#[tokio::test]
#[ignore]
async fn test_constraints_are_idempotent_e2e() {
    let gateway = test_gateway();
    let initializer = ConstraintInitializer::new();

    assert_eq!(initializer.ensure(&gateway).await.unwrap(), 15);
    assert_eq!(initializer.ensure(&gateway).await.unwrap(), 15);
}

#[tokio::test]
#[ignore]
async fn test_orphans_detected_after_edge_loss_e2e() {
    let gateway = test_gateway();
    delete_frameworks(&gateway).await;
    let report = seed(&gateway, vec![Framework::Lcme]).await;
    assert!(report.all_passed, "{}", report.summary());

    gateway
        .graph()
        .run(neo4rs::query(
            "MATCH (:LCME_Standard)-[r:HAS_ELEMENT]->(e:LCME_Element) WHERE e.number IN ['1.1', '1.2'] DELETE r",
        ))
        .await
        .unwrap();

    let mut session = gateway.session().await.unwrap();
    let orphans = session
        .run(&Statement::CountOrphans {
            child: NodeLabel::LcmeElement,
            parent: NodeLabel::LcmeStandard,
            relationship: seed_core::RelationshipType::HasElement,
        })
        .await
        .unwrap();
    session.close().await.unwrap();
    assert_eq!(orphans.single("orphan_count").unwrap(), 2);

    let verification = seed_core::FrameworkLoader::verify(
        &seed_frameworks::lcme::loader(seed_core::BatchLoader::new(Arc::new(gateway.clone()))).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(verification.expected_count, 105);
    assert_eq!(verification.orphan_count, 2);
    assert!(!verification.passed);
}
