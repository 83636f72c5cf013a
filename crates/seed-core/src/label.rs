//! Node labels, frameworks and relationship types.
//!
//! The graph schema is closed: every label the engine writes is listed in
//! [`NodeLabel::ALL`], together with the natural-key property that a store-level
//! uniqueness constraint is declared on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Usmle,
    Lcme,
    Acgme,
    Aamc,
    Ume,
    Epa,
    Bloom,
    Miller,
}

impl Framework {
    pub const ALL: [Framework; 8] = [
        Framework::Usmle,
        Framework::Lcme,
        Framework::Acgme,
        Framework::Aamc,
        Framework::Ume,
        Framework::Epa,
        Framework::Bloom,
        Framework::Miller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Usmle => "usmle",
            Framework::Lcme => "lcme",
            Framework::Acgme => "acgme",
            Framework::Aamc => "aamc",
            Framework::Ume => "ume",
            Framework::Epa => "epa",
            Framework::Bloom => "bloom",
            Framework::Miller => "miller",
        }
    }

    /// Parse a framework identifier as written on the command line.
    pub fn parse(s: &str) -> Option<Framework> {
        Framework::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a label's natural key is stored as text or as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Text,
    Integer,
}

/// Category tag of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeLabel {
    #[serde(rename = "USMLE_System")]
    UsmleSystem,
    #[serde(rename = "USMLE_Discipline")]
    UsmleDiscipline,
    #[serde(rename = "USMLE_Task")]
    UsmleTask,
    #[serde(rename = "USMLE_Topic")]
    UsmleTopic,
    #[serde(rename = "LCME_Standard")]
    LcmeStandard,
    #[serde(rename = "LCME_Element")]
    LcmeElement,
    #[serde(rename = "ACGME_Domain")]
    AcgmeDomain,
    #[serde(rename = "ACGME_Subdomain")]
    AcgmeSubdomain,
    #[serde(rename = "AAMC_Domain")]
    AamcDomain,
    #[serde(rename = "AAMC_Competency")]
    AamcCompetency,
    #[serde(rename = "EPA")]
    Epa,
    #[serde(rename = "BloomLevel")]
    BloomLevel,
    #[serde(rename = "MillerLevel")]
    MillerLevel,
    #[serde(rename = "UME_Competency")]
    UmeCompetency,
    #[serde(rename = "UME_Subcompetency")]
    UmeSubcompetency,
}

impl NodeLabel {
    /// Every label, in the order constraints are declared.
    pub const ALL: [NodeLabel; 15] = [
        NodeLabel::UsmleSystem,
        NodeLabel::UsmleDiscipline,
        NodeLabel::UsmleTask,
        NodeLabel::UsmleTopic,
        NodeLabel::LcmeStandard,
        NodeLabel::LcmeElement,
        NodeLabel::AcgmeDomain,
        NodeLabel::AcgmeSubdomain,
        NodeLabel::AamcDomain,
        NodeLabel::AamcCompetency,
        NodeLabel::Epa,
        NodeLabel::BloomLevel,
        NodeLabel::MillerLevel,
        NodeLabel::UmeCompetency,
        NodeLabel::UmeSubcompetency,
    ];

    /// The label as it appears in the graph.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::UsmleSystem => "USMLE_System",
            NodeLabel::UsmleDiscipline => "USMLE_Discipline",
            NodeLabel::UsmleTask => "USMLE_Task",
            NodeLabel::UsmleTopic => "USMLE_Topic",
            NodeLabel::LcmeStandard => "LCME_Standard",
            NodeLabel::LcmeElement => "LCME_Element",
            NodeLabel::AcgmeDomain => "ACGME_Domain",
            NodeLabel::AcgmeSubdomain => "ACGME_Subdomain",
            NodeLabel::AamcDomain => "AAMC_Domain",
            NodeLabel::AamcCompetency => "AAMC_Competency",
            NodeLabel::Epa => "EPA",
            NodeLabel::BloomLevel => "BloomLevel",
            NodeLabel::MillerLevel => "MillerLevel",
            NodeLabel::UmeCompetency => "UME_Competency",
            NodeLabel::UmeSubcompetency => "UME_Subcompetency",
        }
    }

    /// Property holding the label's natural key.
    pub fn key_property(&self) -> &'static str {
        match self {
            NodeLabel::LcmeStandard | NodeLabel::LcmeElement | NodeLabel::Epa => "number",
            NodeLabel::BloomLevel | NodeLabel::MillerLevel => "level",
            _ => "code",
        }
    }

    pub fn key_kind(&self) -> KeyKind {
        match self {
            NodeLabel::Epa | NodeLabel::BloomLevel | NodeLabel::MillerLevel => KeyKind::Integer,
            _ => KeyKind::Text,
        }
    }

    pub fn framework(&self) -> Framework {
        match self {
            NodeLabel::UsmleSystem
            | NodeLabel::UsmleDiscipline
            | NodeLabel::UsmleTask
            | NodeLabel::UsmleTopic => Framework::Usmle,
            NodeLabel::LcmeStandard | NodeLabel::LcmeElement => Framework::Lcme,
            NodeLabel::AcgmeDomain | NodeLabel::AcgmeSubdomain => Framework::Acgme,
            NodeLabel::AamcDomain | NodeLabel::AamcCompetency => Framework::Aamc,
            NodeLabel::Epa => Framework::Epa,
            NodeLabel::BloomLevel => Framework::Bloom,
            NodeLabel::MillerLevel => Framework::Miller,
            NodeLabel::UmeCompetency | NodeLabel::UmeSubcompetency => Framework::Ume,
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship types written by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationshipType {
    #[serde(rename = "HAS_TOPIC")]
    HasTopic,
    #[serde(rename = "HAS_ELEMENT")]
    HasElement,
    #[serde(rename = "HAS_SUBDOMAIN")]
    HasSubdomain,
    #[serde(rename = "HAS_SUBCOMPETENCY")]
    HasSubcompetency,
    /// Cross-framework bridge.
    #[serde(rename = "ALIGNS_WITH")]
    AlignsWith,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::HasTopic => "HAS_TOPIC",
            RelationshipType::HasElement => "HAS_ELEMENT",
            RelationshipType::HasSubdomain => "HAS_SUBDOMAIN",
            RelationshipType::HasSubcompetency => "HAS_SUBCOMPETENCY",
            RelationshipType::AlignsWith => "ALIGNS_WITH",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
