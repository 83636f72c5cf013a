//! Merge templates and the statements the engine issues.
//!
//! Every write is a merge keyed on the label's natural key. A template renders
//! to a single Cypher statement which reports its own write counters as
//! returned columns, so that counters are read the same way regardless of the
//! driver in use.

use crate::item::{FrameworkItem, PropertyValue};
use crate::label::{KeyKind, NodeLabel, RelationshipType};
use std::collections::BTreeMap;

/// Statement parameters, keyed by parameter name.
pub type Params = BTreeMap<String, PropertyValue>;

/// Columns returned by a merge statement.
pub const NODES_CREATED: &str = "nodes_created";
pub const PROPERTIES_SET: &str = "properties_set";
pub const RELATIONSHIPS_CREATED: &str = "relationships_created";

/// Column returned by a node count.
pub const COUNT: &str = "count";

/// Column returned by an orphan count.
pub const ORPHAN_COUNT: &str = "orphan_count";

/// Direction of the edge created by a [`Link`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    /// `(target)-[:REL]->(node)`: the target is the node's parent.
    Containment,
    /// `(node)-[:REL]->(target)`: the target belongs to another framework.
    Bridge,
}

/// Match-plus-link clause appended to a merge.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub relationship: RelationshipType,
    pub target: NodeLabel,
    /// Parameter holding the target's natural key.
    pub param: &'static str,
    pub direction: LinkDirection,
}

/// Parameterized upsert of one node, optionally linked to an existing node.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeTemplate {
    pub label: NodeLabel,
    /// Properties assigned by the SET clause, in order.
    pub properties: Vec<&'static str>,
    pub link: Option<Link>,
}

impl MergeTemplate {
    pub fn new(label: NodeLabel, properties: &[&'static str]) -> Self {
        Self {
            label,
            properties: properties.to_vec(),
            link: None,
        }
    }

    /// Link each merged node under a parent of `parent` label, matched by the
    /// item's parent key bound as `param`.
    pub fn contained_in(
        mut self,
        parent: NodeLabel,
        relationship: RelationshipType,
        param: &'static str,
    ) -> Self {
        self.link = Some(Link {
            relationship,
            target: parent,
            param,
            direction: LinkDirection::Containment,
        });
        self
    }

    /// Link each merged node to a node of another framework, matched by the
    /// attribute bound as `param`.
    pub fn bridged_to(
        mut self,
        target: NodeLabel,
        relationship: RelationshipType,
        param: &'static str,
    ) -> Self {
        self.link = Some(Link {
            relationship,
            target,
            param,
            direction: LinkDirection::Bridge,
        });
        self
    }

    /// Bind an item's fields as statement parameters.
    ///
    /// Every parameter the rendered statement references is present; values
    /// the item does not carry are bound as null.
    pub fn params(&self, item: &FrameworkItem) -> Params {
        let mut params = Params::new();
        params.insert("id".to_string(), PropertyValue::from(item.id.as_str()));
        params.insert("name".to_string(), PropertyValue::from(item.name.as_str()));
        params.insert(
            "description".to_string(),
            PropertyValue::from(item.description.clone()),
        );
        params.insert(
            "framework".to_string(),
            PropertyValue::from(item.framework.as_str()),
        );
        for (name, value) in &item.attributes {
            params.insert(name.clone(), value.clone());
        }
        if let Some(link) = &self.link {
            if link.direction == LinkDirection::Containment {
                if let Some(parent) = &item.parent {
                    params.insert(link.param.to_string(), parent_key(link.target, parent));
                }
            }
            params
                .entry(link.param.to_string())
                .or_insert(PropertyValue::Null);
        }
        for property in &self.properties {
            params
                .entry((*property).to_string())
                .or_insert(PropertyValue::Null);
        }
        params.insert(
            self.label.key_property().to_string(),
            PropertyValue::from(&item.key),
        );
        params
    }

    /// Render the template as Cypher.
    pub fn cypher(&self) -> String {
        let label = self.label.as_str();
        let key = self.label.key_property();
        let mut lines = vec![
            format!("OPTIONAL MATCH (existing:{label} {{{key}: ${key}}})"),
            "WITH existing IS NULL AS created".to_string(),
            format!("MERGE (n:{label} {{{key}: ${key}}})"),
        ];

        if !self.properties.is_empty() {
            let assignments: Vec<String> = self
                .properties
                .iter()
                .map(|p| format!("n.{p} = ${p}"))
                .collect();
            lines.push(format!("SET {}", assignments.join(", ")));
        }

        let assigned: Vec<String> = self.properties.iter().map(|p| format!("${p}")).collect();
        let properties_set = format!(
            "size([value IN [{}] WHERE value IS NOT NULL]) + CASE WHEN created THEN 1 ELSE 0 END AS {PROPERTIES_SET}",
            assigned.join(", ")
        );
        let nodes_created = format!("CASE WHEN created THEN 1 ELSE 0 END AS {NODES_CREATED}");

        match &self.link {
            Some(link) => {
                let target = link.target.as_str();
                let target_key = link.target.key_property();
                let rel = link.relationship.as_str();
                let param = link.param;
                let (existing, merge) = match link.direction {
                    LinkDirection::Containment => (
                        format!("OPTIONAL MATCH (t)-[existing_rel:{rel}]->(n)"),
                        format!("MERGE (t)-[:{rel}]->(n)"),
                    ),
                    LinkDirection::Bridge => (
                        format!("OPTIONAL MATCH (n)-[existing_rel:{rel}]->(t)"),
                        format!("MERGE (n)-[:{rel}]->(t)"),
                    ),
                };
                lines.push("WITH n, created".to_string());
                lines.push(format!("MATCH (t:{target} {{{target_key}: ${param}}})"));
                lines.push(existing);
                lines.push("WITH n, created, t, existing_rel IS NULL AS linked".to_string());
                lines.push(merge);
                lines.push(format!(
                    "RETURN {nodes_created}, {properties_set}, CASE WHEN linked THEN 1 ELSE 0 END AS {RELATIONSHIPS_CREATED}"
                ));
            }
            None => {
                lines.push(format!(
                    "RETURN {nodes_created}, {properties_set}, 0 AS {RELATIONSHIPS_CREATED}"
                ));
            }
        }

        lines.join("\n")
    }
}

/// Bind a parent reference with the key type of the parent's label.
fn parent_key(target: NodeLabel, parent: &str) -> PropertyValue {
    match target.key_kind() {
        KeyKind::Integer => parent
            .trim()
            .parse::<i64>()
            .map(PropertyValue::Integer)
            .unwrap_or_else(|_| PropertyValue::from(parent)),
        KeyKind::Text => PropertyValue::from(parent),
    }
}

/// The statements the engine issues against a graph store.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    /// Declare the label's natural-key uniqueness constraint, if missing.
    EnsureConstraint { label: NodeLabel },
    /// Upsert one node.
    Merge {
        template: &'a MergeTemplate,
        params: Params,
    },
    /// Count live nodes of a label.
    CountNodes { label: NodeLabel },
    /// Count `child` nodes with no inbound `relationship` edge from a `parent` node.
    CountOrphans {
        child: NodeLabel,
        parent: NodeLabel,
        relationship: RelationshipType,
    },
}

impl<'a> Statement<'a> {
    pub fn merge(template: &'a MergeTemplate, item: &FrameworkItem) -> Self {
        Statement::Merge {
            template,
            params: template.params(item),
        }
    }

    pub fn cypher(&self) -> String {
        match self {
            Statement::EnsureConstraint { label } => {
                let key = label.key_property();
                format!(
                    "CREATE CONSTRAINT {}_{key}_unique IF NOT EXISTS FOR (n:{label}) REQUIRE n.{key} IS UNIQUE",
                    label.as_str().to_lowercase()
                )
            }
            Statement::Merge { template, .. } => template.cypher(),
            Statement::CountNodes { label } => {
                format!("MATCH (n:{label}) RETURN count(n) AS {COUNT}")
            }
            Statement::CountOrphans {
                child,
                parent,
                relationship,
            } => format!(
                "MATCH (c:{child}) WHERE NOT (:{parent})-[:{relationship}]->(c) RETURN count(c) AS {ORPHAN_COUNT}"
            ),
        }
    }

    /// Whether the statement changes the store.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Statement::EnsureConstraint { .. } | Statement::Merge { .. }
        )
    }

    /// Parameters to bind, empty for statements without any.
    pub fn params(&self) -> Option<&Params> {
        match self {
            Statement::Merge { params, .. } => Some(params),
            _ => None,
        }
    }

    /// Integer columns the statement returns.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Statement::EnsureConstraint { .. } => &[],
            Statement::Merge { .. } => &[NODES_CREATED, PROPERTIES_SET, RELATIONSHIPS_CREATED],
            Statement::CountNodes { .. } => &[COUNT],
            Statement::CountOrphans { .. } => &[ORPHAN_COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Framework;

    fn topic_template() -> MergeTemplate {
        MergeTemplate::new(
            NodeLabel::UsmleTopic,
            &["id", "name", "description", "framework", "sort_order", "parent_system"],
        )
        .contained_in(NodeLabel::UsmleSystem, RelationshipType::HasTopic, "parent_system")
    }

    #[test]
    fn test_flat_template_cypher() {
        let template = MergeTemplate::new(
            NodeLabel::BloomLevel,
            &["id", "name", "description", "framework", "action_verbs"],
        );
        let cypher = template.cypher();

        assert!(cypher.contains("MERGE (n:BloomLevel {level: $level})"));
        assert!(cypher.contains("n.action_verbs = $action_verbs"));
        assert!(cypher.contains("0 AS relationships_created"));
        assert!(!cypher.contains("MATCH (t:"));
    }

    #[test]
    fn test_containment_template_cypher() {
        let cypher = topic_template().cypher();

        assert!(cypher.contains("MERGE (n:USMLE_Topic {code: $code})"));
        assert!(cypher.contains("MATCH (t:USMLE_System {code: $parent_system})"));
        assert!(cypher.contains("MERGE (t)-[:HAS_TOPIC]->(n)"));
        assert!(cypher.contains("n.parent_system = $parent_system"));
    }

    #[test]
    fn test_bridge_template_cypher() {
        let template = MergeTemplate::new(
            NodeLabel::UmeCompetency,
            &["id", "name", "description", "framework"],
        )
        .bridged_to(NodeLabel::AcgmeDomain, RelationshipType::AlignsWith, "aligns_with");
        let cypher = template.cypher();

        assert!(cypher.contains("MATCH (t:ACGME_Domain {code: $aligns_with})"));
        assert!(cypher.contains("MERGE (n)-[:ALIGNS_WITH]->(t)"));
    }

    #[test]
    fn test_params_bind_parent_under_link_param() {
        let item = FrameworkItem::new(Framework::Usmle, "usmle-topic-001", "TOPIC-CVS-001", "Atherosclerosis")
            .with_parent("SYS-CVS")
            .with_attribute("sort_order", 1_i64);
        let params = topic_template().params(&item);

        assert_eq!(params.get("code"), Some(&PropertyValue::Text("TOPIC-CVS-001".into())));
        assert_eq!(params.get("parent_system"), Some(&PropertyValue::Text("SYS-CVS".into())));
        assert_eq!(params.get("sort_order"), Some(&PropertyValue::Integer(1)));
        assert_eq!(params.get("framework"), Some(&PropertyValue::Text("usmle".into())));
        assert_eq!(params.get("description"), Some(&PropertyValue::Null));
    }

    #[test]
    fn test_parent_bound_with_target_key_kind() {
        let template = MergeTemplate::new(NodeLabel::UsmleTopic, &["id", "name", "epa_number"])
            .contained_in(NodeLabel::Epa, RelationshipType::HasTopic, "epa_number");
        let item = FrameworkItem::new(Framework::Usmle, "usmle-topic-001", "TOPIC-CVS-001", "Atherosclerosis")
            .with_parent("7");

        assert_eq!(template.params(&item).get("epa_number"), Some(&PropertyValue::Integer(7)));
        assert_eq!(
            topic_template()
                .params(&item.with_parent("SYS-CVS"))
                .get("parent_system"),
            Some(&PropertyValue::Text("SYS-CVS".into()))
        );
    }

    #[test]
    fn test_integer_key_param() {
        let template = MergeTemplate::new(NodeLabel::Epa, &["id", "name"]);
        let item = FrameworkItem::new(Framework::Epa, "epa-1", 1_i64, "Gather a history");
        let params = template.params(&item);

        assert_eq!(params.get("number"), Some(&PropertyValue::Integer(1)));
    }

    #[test]
    fn test_constraint_cypher() {
        let statement = Statement::EnsureConstraint {
            label: NodeLabel::LcmeElement,
        };
        assert_eq!(
            statement.cypher(),
            "CREATE CONSTRAINT lcme_element_number_unique IF NOT EXISTS FOR (n:LCME_Element) REQUIRE n.number IS UNIQUE"
        );
    }

    #[test]
    fn test_orphan_cypher() {
        let statement = Statement::CountOrphans {
            child: NodeLabel::LcmeElement,
            parent: NodeLabel::LcmeStandard,
            relationship: RelationshipType::HasElement,
        };
        assert_eq!(
            statement.cypher(),
            "MATCH (c:LCME_Element) WHERE NOT (:LCME_Standard)-[:HAS_ELEMENT]->(c) RETURN count(c) AS orphan_count"
        );
        assert_eq!(statement.columns(), &[ORPHAN_COUNT]);
    }
}
