//! In-process graph store.
//!
//! Implements the gateway traits over a shared in-memory property graph with
//! the same merge, uniqueness and counting semantics as the Cypher statements.
//! Write transactions stage against a snapshot that replaces the committed
//! state on commit. A commit is rejected if anything else was written since
//! the snapshot was taken. Faults can be injected to exercise failure handling.

use crate::error::StoreError;
use crate::graph::{GraphGateway, GraphSession, QueryResult, Record, WriteTransaction};
use crate::item::{KeyValue, PropertyValue};
use crate::label::{NodeLabel, RelationshipType};
use crate::template::{
    LinkDirection, MergeTemplate, Params, Statement, COUNT, NODES_CREATED, ORPHAN_COUNT,
    PROPERTIES_SET, RELATIONSHIPS_CREATED,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

type NodeId = (NodeLabel, KeyValue);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Edge {
    from: NodeId,
    relationship: RelationshipType,
    to: NodeId,
}

#[derive(Debug, Clone, Default)]
struct GraphState {
    nodes: BTreeMap<NodeId, BTreeMap<String, PropertyValue>>,
    edges: BTreeSet<Edge>,
    constraints: BTreeSet<NodeLabel>,
}

#[derive(Debug, Default)]
struct Faults {
    unavailable: bool,
    failing_keys: BTreeSet<NodeId>,
    failing_commits: bool,
}

#[derive(Debug, Default)]
struct Inner {
    state: GraphState,
    /// Bumped on every write that reaches the committed state.
    version: u64,
    faults: Faults,
    sessions_opened: usize,
    sessions_closed: usize,
}

/// Shared in-memory graph. Clones refer to the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every new session and transaction fail as unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().faults.unavailable = unavailable;
    }

    /// Make every merge of the given node fail.
    pub fn fail_merges_of(&self, label: NodeLabel, key: impl Into<KeyValue>) {
        self.lock().faults.failing_keys.insert((label, key.into()));
    }

    /// Make every transaction commit fail.
    pub fn set_failing_commits(&self, failing: bool) {
        self.lock().faults.failing_commits = failing;
    }

    pub fn node_count(&self, label: NodeLabel) -> usize {
        self.lock()
            .state
            .nodes
            .keys()
            .filter(|(l, _)| *l == label)
            .count()
    }

    pub fn total_nodes(&self) -> usize {
        self.lock().state.nodes.len()
    }

    pub fn relationship_count(&self, relationship: RelationshipType) -> usize {
        self.lock()
            .state
            .edges
            .iter()
            .filter(|e| e.relationship == relationship)
            .count()
    }

    pub fn has_relationship(
        &self,
        from: (NodeLabel, KeyValue),
        relationship: RelationshipType,
        to: (NodeLabel, KeyValue),
    ) -> bool {
        self.lock().state.edges.contains(&Edge {
            from,
            relationship,
            to,
        })
    }

    pub fn property(
        &self,
        label: NodeLabel,
        key: impl Into<KeyValue>,
        property: &str,
    ) -> Option<PropertyValue> {
        self.lock()
            .state
            .nodes
            .get(&(label, key.into()))
            .and_then(|props| props.get(property).cloned())
    }

    /// Labels with a declared uniqueness constraint.
    pub fn constrained_labels(&self) -> Vec<NodeLabel> {
        self.lock().state.constraints.iter().copied().collect()
    }

    /// Remove a node and its relationships.
    pub fn delete_node(&self, label: NodeLabel, key: impl Into<KeyValue>) -> bool {
        let id = (label, key.into());
        let mut inner = self.lock();
        inner
            .state
            .edges
            .retain(|e| e.from != id && e.to != id);
        inner.version += 1;
        inner.state.nodes.remove(&id).is_some()
    }

    /// Remove every relationship of a type.
    pub fn delete_relationships(&self, relationship: RelationshipType) -> usize {
        let mut inner = self.lock();
        let before = inner.state.edges.len();
        inner.state.edges.retain(|e| e.relationship != relationship);
        inner.version += 1;
        before - inner.state.edges.len()
    }

    pub fn sessions_opened(&self) -> usize {
        self.lock().sessions_opened
    }

    pub fn sessions_closed(&self) -> usize {
        self.lock().sessions_closed
    }
}

#[async_trait]
impl GraphGateway for MemoryGraph {
    async fn session(&self) -> Result<Box<dyn GraphSession>, StoreError> {
        let mut inner = self.lock();
        if inner.faults.unavailable {
            return Err(StoreError::Unavailable(
                "memory graph is offline".to_string(),
            ));
        }
        inner.sessions_opened += 1;
        Ok(Box::new(MemorySession {
            graph: self.clone(),
            open: true,
        }))
    }
}

struct MemorySession {
    graph: MemoryGraph,
    open: bool,
}

impl MemorySession {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.open {
            Ok(())
        } else {
            Err(StoreError::Unavailable("session already closed".to_string()))
        }
    }
}

#[async_trait]
impl GraphSession for MemorySession {
    async fn run(&mut self, statement: &Statement<'_>) -> Result<QueryResult, StoreError> {
        self.ensure_open()?;
        let mut inner = self.graph.lock();
        let Inner {
            state,
            faults,
            version,
            ..
        } = &mut *inner;
        let rows = execute(state, faults, statement)?;
        if statement.is_write() {
            *version += 1;
        }
        Ok(QueryResult::from_rows(rows))
    }

    async fn begin_write(&mut self) -> Result<Box<dyn WriteTransaction>, StoreError> {
        self.ensure_open()?;
        let inner = self.graph.lock();
        if inner.faults.unavailable {
            return Err(StoreError::Unavailable(
                "memory graph is offline".to_string(),
            ));
        }
        Ok(Box::new(MemoryTransaction {
            graph: self.graph.clone(),
            base_version: inner.version,
            staged: Some(inner.state.clone()),
        }))
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        if self.open {
            self.open = false;
            self.graph.lock().sessions_closed += 1;
        }
        Ok(())
    }
}

struct MemoryTransaction {
    graph: MemoryGraph,
    base_version: u64,
    staged: Option<GraphState>,
}

#[async_trait]
impl WriteTransaction for MemoryTransaction {
    async fn run(&mut self, statement: &Statement<'_>) -> Result<QueryResult, StoreError> {
        let staged = self
            .staged
            .as_mut()
            .ok_or_else(|| StoreError::Transaction("transaction already finished".to_string()))?;
        let inner = self.graph.lock();
        let rows = execute(staged, &inner.faults, statement)?;
        Ok(QueryResult::from_rows(rows))
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let mut inner = self.graph.lock();
        if inner.faults.failing_commits || inner.faults.unavailable {
            return Err(StoreError::Transaction("commit rejected".to_string()));
        }
        if inner.version != self.base_version {
            self.staged = None;
            return Err(StoreError::Transaction(
                "conflicting write committed since the transaction began".to_string(),
            ));
        }
        let staged = self
            .staged
            .take()
            .ok_or_else(|| StoreError::Transaction("transaction already finished".to_string()))?;
        inner.state = staged;
        inner.version += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.staged = None;
        Ok(())
    }
}

fn key_param(params: &Params, name: &str) -> Option<KeyValue> {
    params.get(name).and_then(KeyValue::from_property)
}

fn execute(
    state: &mut GraphState,
    faults: &Faults,
    statement: &Statement<'_>,
) -> Result<Vec<Record>, StoreError> {
    match statement {
        Statement::EnsureConstraint { label } => {
            state.constraints.insert(*label);
            Ok(Vec::new())
        }
        Statement::Merge { template, params } => merge(state, faults, template, params),
        Statement::CountNodes { label } => {
            let count = state.nodes.keys().filter(|(l, _)| l == label).count();
            Ok(vec![Record::new().with(COUNT, count as i64)])
        }
        Statement::CountOrphans {
            child,
            parent,
            relationship,
        } => {
            let count = state
                .nodes
                .keys()
                .filter(|(l, _)| l == child)
                .filter(|id| {
                    !state.edges.iter().any(|e| {
                        e.relationship == *relationship && e.from.0 == *parent && &e.to == *id
                    })
                })
                .count();
            Ok(vec![Record::new().with(ORPHAN_COUNT, count as i64)])
        }
    }
}

fn merge(
    state: &mut GraphState,
    faults: &Faults,
    template: &MergeTemplate,
    params: &Params,
) -> Result<Vec<Record>, StoreError> {
    let label = template.label;
    let key_property = label.key_property();
    let key = key_param(params, key_property).ok_or_else(|| {
        StoreError::Statement(format!("missing parameter ${key_property} for {label}"))
    })?;
    let id = (label, key.clone());

    if faults.failing_keys.contains(&id) {
        return Err(StoreError::Statement(format!(
            "write rejected for {label} {key_property} = {key}"
        )));
    }

    let created = !state.nodes.contains_key(&id);
    let properties = state.nodes.entry(id.clone()).or_default();
    properties.insert(key_property.to_string(), PropertyValue::from(&key));

    let mut properties_set = i64::from(created);
    for property in &template.properties {
        match params.get(*property) {
            Some(value) if !value.is_null() => {
                properties.insert((*property).to_string(), value.clone());
                properties_set += 1;
            }
            _ => {
                properties.remove(*property);
            }
        }
    }

    let mut relationships_created = 0;
    if let Some(link) = &template.link {
        let Some(target_key) = key_param(params, link.param) else {
            return Ok(Vec::new());
        };
        let target = (link.target, target_key);
        if !state.nodes.contains_key(&target) {
            debug!("No {} node {} to link {} {}", link.target, target.1, label, key);
            return Ok(Vec::new());
        }
        let edge = match link.direction {
            LinkDirection::Containment => Edge {
                from: target,
                relationship: link.relationship,
                to: id,
            },
            LinkDirection::Bridge => Edge {
                from: id,
                relationship: link.relationship,
                to: target,
            },
        };
        if state.edges.insert(edge) {
            relationships_created = 1;
        }
    }

    Ok(vec![Record::new()
        .with(NODES_CREATED, i64::from(created))
        .with(PROPERTIES_SET, properties_set)
        .with(RELATIONSHIPS_CREATED, relationships_created)])
}
