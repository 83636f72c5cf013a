//! Graph store gateway.
//!
//! The engine talks to the store only through these traits: a gateway hands
//! out sessions, a session runs auto-commit statements or opens a write
//! transaction. Drivers implement them; [`crate::memory::MemoryGraph`] is the
//! in-process implementation used by dry runs and tests.

use crate::error::StoreError;
use crate::template::{Statement, NODES_CREATED, PROPERTIES_SET, RELATIONSHIPS_CREATED};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// One returned row, restricted to the integer columns the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: BTreeMap<String, i64>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: i64) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: i64) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<i64> {
        self.values.get(column).copied()
    }
}

/// Write counters of a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteCounters {
    pub nodes_created: u64,
    pub properties_set: u64,
    pub relationships_created: u64,
}

impl WriteCounters {
    pub fn from_record(record: &Record) -> Self {
        let read = |column: &str| record.get(column).unwrap_or(0).max(0) as u64;
        Self {
            nodes_created: read(NODES_CREATED),
            properties_set: read(PROPERTIES_SET),
            relationships_created: read(RELATIONSHIPS_CREATED),
        }
    }

    pub fn add(&mut self, other: WriteCounters) {
        self.nodes_created += other.nodes_created;
        self.properties_set += other.properties_set;
        self.relationships_created += other.relationships_created;
    }
}

/// Rows and write counters of one statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub rows: Vec<Record>,
    pub counters: WriteCounters,
}

impl QueryResult {
    /// Build a result, summing write counters over the returned rows.
    pub fn from_rows(rows: Vec<Record>) -> Self {
        let mut counters = WriteCounters::default();
        for row in &rows {
            counters.add(WriteCounters::from_record(row));
        }
        Self { rows, counters }
    }

    /// Read a single integer column from the first row.
    pub fn single(&self, column: &str) -> Result<i64, StoreError> {
        self.rows
            .first()
            .and_then(|row| row.get(column))
            .ok_or_else(|| StoreError::Result(format!("missing column '{column}' in result")))
    }
}

/// Hands out sessions against a graph store.
#[async_trait]
pub trait GraphGateway: Send + Sync {
    /// Open a session. Fails with a connectivity-class error if the store is unreachable.
    async fn session(&self) -> Result<Box<dyn GraphSession>, StoreError>;
}

/// A unit of interaction with the store.
///
/// The owner must call [`GraphSession::close`] on every exit path.
#[async_trait]
pub trait GraphSession: Send {
    /// Run one auto-commit statement.
    async fn run(&mut self, statement: &Statement<'_>) -> Result<QueryResult, StoreError>;

    /// Open a write transaction.
    async fn begin_write(&mut self) -> Result<Box<dyn WriteTransaction>, StoreError>;

    /// Release the session.
    async fn close(&mut self) -> Result<(), StoreError>;
}

/// A write transaction. Statements are applied atomically on commit.
#[async_trait]
pub trait WriteTransaction: Send {
    async fn run(&mut self, statement: &Statement<'_>) -> Result<QueryResult, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;

    async fn rollback(&mut self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_summed_over_rows() {
        let rows = vec![
            Record::new()
                .with(NODES_CREATED, 1)
                .with(PROPERTIES_SET, 5)
                .with(RELATIONSHIPS_CREATED, 1),
            Record::new()
                .with(NODES_CREATED, 0)
                .with(PROPERTIES_SET, 4)
                .with(RELATIONSHIPS_CREATED, 0),
        ];
        let result = QueryResult::from_rows(rows);

        assert_eq!(
            result.counters,
            WriteCounters {
                nodes_created: 1,
                properties_set: 9,
                relationships_created: 1,
            }
        );
    }

    #[test]
    fn test_single_reads_first_row() {
        let result = QueryResult::from_rows(vec![Record::new().with("count", 12)]);
        assert_eq!(result.single("count").unwrap(), 12);
        assert!(matches!(result.single("orphan_count"), Err(StoreError::Result(_))));
        assert!(QueryResult::default().single("count").is_err());
    }
}
