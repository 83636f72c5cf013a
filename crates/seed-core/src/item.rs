//! In-memory representation of the nodes to be written.

use crate::label::Framework;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A property value bound as a statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    TextList(Vec<String>),
    Null,
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(v: Vec<String>) -> Self {
        PropertyValue::TextList(v)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(PropertyValue::Null)
    }
}

/// Natural key of a node: a code, a sequence number, or a numeric level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Integer(i64),
    Text(String),
}

impl KeyValue {
    /// Interpret a parameter as a key, if it has a key-compatible type.
    pub fn from_property(value: &PropertyValue) -> Option<KeyValue> {
        match value {
            PropertyValue::Integer(i) => Some(KeyValue::Integer(*i)),
            PropertyValue::Text(s) => Some(KeyValue::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<&KeyValue> for PropertyValue {
    fn from(key: &KeyValue) -> Self {
        match key {
            KeyValue::Integer(i) => PropertyValue::Integer(*i),
            KeyValue::Text(s) => PropertyValue::Text(s.clone()),
        }
    }
}

impl From<&str> for KeyValue {
    fn from(s: &str) -> Self {
        KeyValue::Text(s.to_string())
    }
}

impl From<i64> for KeyValue {
    fn from(i: i64) -> Self {
        KeyValue::Integer(i)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Integer(i) => write!(f, "{i}"),
            KeyValue::Text(s) => f.write_str(s),
        }
    }
}

/// One node of a reference taxonomy.
///
/// Items are configuration data: built once from a dataset and never mutated
/// by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkItem {
    pub id: String,
    pub key: KeyValue,
    pub name: String,
    pub description: Option<String>,
    pub framework: Framework,
    /// Natural key of the containment parent, for child levels.
    pub parent: Option<String>,
    /// Extra properties such as `title`, `sort_order` or `action_verbs`.
    pub attributes: BTreeMap<String, PropertyValue>,
}

impl FrameworkItem {
    pub fn new(
        framework: Framework,
        id: impl Into<String>,
        key: impl Into<KeyValue>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            name: name.into(),
            description: None,
            framework,
            parent: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}
