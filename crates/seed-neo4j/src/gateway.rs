//! Neo4j implementation of the engine's graph gateway.

use crate::args::Neo4jArgs;
use crate::error::Neo4jGatewayError;
use async_trait::async_trait;
use neo4rs::{
    query, BoltBoolean, BoltInteger, BoltList, BoltNull, BoltString, BoltType, ConfigBuilder,
    Graph, Query, Row, Txn,
};
use seed_core::{
    GraphGateway, GraphSession, PropertyValue, QueryResult, Record, Statement, StoreError,
    WriteTransaction,
};
use tracing::{debug, info};

/// Convert a parameter value to its Bolt representation.
pub fn to_bolt(value: &PropertyValue) -> BoltType {
    match value {
        PropertyValue::Bool(b) => BoltType::Boolean(BoltBoolean::new(*b)),
        PropertyValue::Integer(i) => BoltType::Integer(BoltInteger::new(*i)),
        PropertyValue::Text(s) => BoltType::String(BoltString::new(s)),
        PropertyValue::TextList(items) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(BoltType::String(BoltString::new(item)));
            }
            BoltType::List(list)
        }
        PropertyValue::Null => BoltType::Null(BoltNull),
    }
}

fn build_query(statement: &Statement<'_>) -> Query {
    let cypher = statement.cypher();
    debug!("Neo4j query: {}", cypher);
    let mut q = query(&cypher);
    if let Some(params) = statement.params() {
        for (name, value) in params {
            q = q.param(name, to_bolt(value));
        }
    }
    q
}

fn read_row(row: &Row, columns: &[&str]) -> Result<Record, StoreError> {
    let mut record = Record::new();
    for column in columns {
        let value: i64 = row
            .get(column)
            .map_err(|e| StoreError::Result(format!("Failed to get {column}: {e}")))?;
        record.insert(*column, value);
    }
    Ok(record)
}

/// Gateway over a shared `neo4rs` connection pool.
///
/// Sessions are cheap handles onto the pool. Closing a session never closes
/// the pool; that stays with whoever built the gateway.
#[derive(Clone)]
pub struct Neo4jGateway {
    graph: Graph,
}

impl Neo4jGateway {
    /// Create a gateway from connection parameters.
    ///
    /// # Arguments
    ///
    /// * `uri` - Neo4j Bolt URI (e.g., "bolt://localhost:7687")
    /// * `username` - Neo4j username
    /// * `password` - Neo4j password
    /// * `database` - Neo4j database name (typically "neo4j")
    pub fn new(
        uri: &str,
        username: &str,
        password: &str,
        database: &str,
    ) -> Result<Self, Neo4jGatewayError> {
        let config = ConfigBuilder::default()
            .uri(uri)
            .user(username)
            .password(password)
            .db(database)
            .build()
            .map_err(|e| Neo4jGatewayError::Config(e.to_string()))?;

        let graph =
            Graph::connect(config).map_err(|e| Neo4jGatewayError::Connection(e.to_string()))?;

        info!("Connected to Neo4j at {} (database: {})", uri, database);
        Ok(Self { graph })
    }

    /// Create a gateway from CLI arguments.
    pub fn from_args(args: &Neo4jArgs) -> Result<Self, Neo4jGatewayError> {
        let password = args.neo4j_password.as_deref().ok_or_else(|| {
            Neo4jGatewayError::Config("a Neo4j password is required (NEO4J_PASSWORD)".to_string())
        })?;
        Self::new(
            &args.neo4j_uri,
            &args.neo4j_username,
            password,
            &args.neo4j_database,
        )
    }

    /// Create a gateway over an existing Graph connection.
    pub fn with_graph(graph: Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

#[async_trait]
impl GraphGateway for Neo4jGateway {
    async fn session(&self) -> Result<Box<dyn GraphSession>, StoreError> {
        Ok(Box::new(Neo4jSession {
            graph: self.graph.clone(),
            open: true,
        }))
    }
}

struct Neo4jSession {
    graph: Graph,
    open: bool,
}

#[async_trait]
impl GraphSession for Neo4jSession {
    async fn run(&mut self, statement: &Statement<'_>) -> Result<QueryResult, StoreError> {
        if !self.open {
            return Err(StoreError::Unavailable("session already closed".to_string()));
        }
        let mut result = self
            .graph
            .execute(build_query(statement))
            .await
            .map_err(|e| StoreError::Statement(e.to_string()))?;

        let mut rows = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| StoreError::Result(e.to_string()))?
        {
            rows.push(read_row(&row, statement.columns())?);
        }
        Ok(QueryResult::from_rows(rows))
    }

    async fn begin_write(&mut self) -> Result<Box<dyn WriteTransaction>, StoreError> {
        if !self.open {
            return Err(StoreError::Unavailable("session already closed".to_string()));
        }
        let txn = self
            .graph
            .start_txn()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to start transaction: {e}")))?;
        Ok(Box::new(Neo4jTransaction { txn: Some(txn) }))
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        self.open = false;
        Ok(())
    }
}

struct Neo4jTransaction {
    txn: Option<Txn>,
}

impl Neo4jTransaction {
    fn finished() -> StoreError {
        StoreError::Transaction("transaction already finished".to_string())
    }
}

#[async_trait]
impl WriteTransaction for Neo4jTransaction {
    async fn run(&mut self, statement: &Statement<'_>) -> Result<QueryResult, StoreError> {
        let txn = self.txn.as_mut().ok_or_else(Self::finished)?;
        let mut stream = txn
            .execute(build_query(statement))
            .await
            .map_err(|e| StoreError::Statement(e.to_string()))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next(txn.handle())
            .await
            .map_err(|e| StoreError::Statement(e.to_string()))?
        {
            rows.push(read_row(&row, statement.columns())?);
        }
        Ok(QueryResult::from_rows(rows))
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let txn = self.txn.take().ok_or_else(Self::finished)?;
        txn.commit()
            .await
            .map_err(|e| StoreError::Transaction(format!("Failed to commit transaction: {e}")))
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        match self.txn.take() {
            Some(txn) => txn
                .rollback()
                .await
                .map_err(|e| StoreError::Transaction(format!("Failed to rollback transaction: {e}"))),
            None => Ok(()),
        }
    }
}
