//! YAML datasets of framework items.
//!
//! ```yaml
//! framework: acgme
//! levels:
//! - label: ACGME_Subdomain
//!   items:
//!   - id: acgme-sub-1.1
//!     key: acgme-sub-1.1
//!     name: History
//!     parent: acgme-dom-1
//!     attributes:
//!       sort_order: 1
//! ```

use crate::taxonomy::TaxonomyPlan;
use seed_core::{
    Framework, FrameworkItem, KeyKind, KeyValue, LinkDirection, NodeLabel, PropertyValue,
};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors found while parsing or validating a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Dataset for {found} given to the {expected} loader")]
    FrameworkMismatch { expected: Framework, found: Framework },

    #[error("Label {label} does not belong to framework {framework}")]
    ForeignLabel { framework: Framework, label: NodeLabel },

    #[error("Label {label} appears more than once")]
    RepeatedLevel { label: NodeLabel },

    #[error("Level {label} missing from dataset")]
    MissingLevel { label: NodeLabel },

    #[error("Level {label} has no loader step")]
    UnplannedLevel { label: NodeLabel },

    #[error("{label}: expected {expected} items, found {found}")]
    CountMismatch {
        label: NodeLabel,
        expected: u64,
        found: usize,
    },

    #[error("{label}: duplicate key {key}")]
    DuplicateKey { label: NodeLabel, key: KeyValue },

    #[error("{label}: key {key} has the wrong type for property '{property}'")]
    KeyKind {
        label: NodeLabel,
        key: KeyValue,
        property: &'static str,
    },

    #[error("{label} {key}: no parent given")]
    MissingParent { label: NodeLabel, key: KeyValue },

    #[error("{label} {key}: parent {parent} is not a {parent_label}")]
    UnknownParent {
        label: NodeLabel,
        key: KeyValue,
        parent: String,
        parent_label: NodeLabel,
    },

    #[error("{label} {key}: attribute '{attribute}' is required")]
    MissingAttribute {
        label: NodeLabel,
        key: KeyValue,
        attribute: &'static str,
    },
}

#[derive(Debug, Deserialize)]
struct RawDataset {
    framework: Framework,
    levels: Vec<RawLevel>,
}

#[derive(Debug, Deserialize)]
struct RawLevel {
    label: NodeLabel,
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: String,
    key: KeyValue,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    attributes: BTreeMap<String, PropertyValue>,
}

/// Items of one framework, grouped by label in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    framework: Framework,
    levels: Vec<(NodeLabel, Vec<FrameworkItem>)>,
}

impl Dataset {
    /// Parse a dataset from YAML.
    ///
    /// Checks that every label belongs to the dataset's framework, that each
    /// label appears once, that keys have the label's key type and that keys
    /// are unique within a label.
    pub fn from_yaml(yaml: &str) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_yaml::from_str(yaml)?;
        let framework = raw.framework;
        let mut levels: Vec<(NodeLabel, Vec<FrameworkItem>)> = Vec::with_capacity(raw.levels.len());

        for level in raw.levels {
            let label = level.label;
            if label.framework() != framework {
                return Err(DatasetError::ForeignLabel { framework, label });
            }
            if levels.iter().any(|(l, _)| *l == label) {
                return Err(DatasetError::RepeatedLevel { label });
            }

            let mut keys = BTreeSet::new();
            let mut items = Vec::with_capacity(level.items.len());
            for raw_item in level.items {
                check_key_kind(label, &raw_item.key)?;
                if !keys.insert(raw_item.key.clone()) {
                    return Err(DatasetError::DuplicateKey {
                        label,
                        key: raw_item.key,
                    });
                }
                items.push(FrameworkItem {
                    id: raw_item.id,
                    key: raw_item.key,
                    name: raw_item.name,
                    description: raw_item.description,
                    framework,
                    parent: raw_item.parent,
                    attributes: raw_item.attributes,
                });
            }
            levels.push((label, items));
        }

        Ok(Self { framework, levels })
    }

    pub fn framework(&self) -> Framework {
        self.framework
    }

    pub fn labels(&self) -> impl Iterator<Item = NodeLabel> + '_ {
        self.levels.iter().map(|(label, _)| *label)
    }

    /// Items of a label, empty if the dataset has none.
    pub fn items(&self, label: NodeLabel) -> &[FrameworkItem] {
        self.levels
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the dataset against the plan that will load it.
    ///
    /// Every planned level must be present with its expected item count,
    /// every contained item must name a parent present in the same dataset,
    /// and every bridged item must carry the attribute its link matches on.
    pub fn validate(&self, plan: &TaxonomyPlan) -> Result<(), DatasetError> {
        if self.framework != plan.framework {
            return Err(DatasetError::FrameworkMismatch {
                expected: plan.framework,
                found: self.framework,
            });
        }
        if let Some(label) = self
            .labels()
            .find(|label| !plan.levels.iter().any(|level| level.label == *label))
        {
            return Err(DatasetError::UnplannedLevel { label });
        }

        for level in &plan.levels {
            let label = level.label;
            if !self.labels().any(|l| l == label) {
                return Err(DatasetError::MissingLevel { label });
            }
            let items = self.items(label);
            if items.len() as u64 != level.expected {
                return Err(DatasetError::CountMismatch {
                    label,
                    expected: level.expected,
                    found: items.len(),
                });
            }

            let Some(link) = &level.template.link else {
                continue;
            };
            for item in items {
                match link.direction {
                    LinkDirection::Containment => {
                        let parent = item.parent.as_ref().ok_or_else(|| {
                            DatasetError::MissingParent {
                                label,
                                key: item.key.clone(),
                            }
                        })?;
                        let found = self
                            .items(link.target)
                            .iter()
                            .any(|p| p.key.to_string() == *parent);
                        if !found {
                            return Err(DatasetError::UnknownParent {
                                label,
                                key: item.key.clone(),
                                parent: parent.clone(),
                                parent_label: link.target,
                            });
                        }
                    }
                    LinkDirection::Bridge => {
                        if item.attributes.get(link.param).and_then(PropertyValue::as_text).is_none() {
                            return Err(DatasetError::MissingAttribute {
                                label,
                                key: item.key.clone(),
                                attribute: link.param,
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn check_key_kind(label: NodeLabel, key: &KeyValue) -> Result<(), DatasetError> {
    let matches = matches!(
        (label.key_kind(), key),
        (KeyKind::Text, KeyValue::Text(_)) | (KeyKind::Integer, KeyValue::Integer(_))
    );
    if matches {
        Ok(())
    } else {
        Err(DatasetError::KeyKind {
            label,
            key: key.clone(),
            property: label.key_property(),
        })
    }
}
