//! Scene data types: knowledge nodes, connections and answer steps

use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialized identity of the answer core at the center of the globe
pub const ANSWER_CORE_ID: &str = "answer-core";

// ============================================================================
// Identities
// ============================================================================

/// Identity of a knowledge node (`node-{index}`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the node at generation index `index`
    pub fn for_index(index: usize) -> Self {
        Self(format!("node-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target of a connection: another node or the answer core
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Endpoint {
    Node(NodeId),
    AnswerCore,
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        match endpoint {
            Endpoint::Node(id) => id.0,
            Endpoint::AnswerCore => ANSWER_CORE_ID.to_string(),
        }
    }
}

impl From<String> for Endpoint {
    fn from(id: String) -> Self {
        if id == ANSWER_CORE_ID {
            Endpoint::AnswerCore
        } else {
            Endpoint::Node(NodeId(id))
        }
    }
}

// ============================================================================
// Node classification
// ============================================================================

/// Proximity of a node to the synthesized answer (1 = closest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    Primary,
    Secondary,
    Tertiary,
}

impl Tier {
    /// Tier assigned to the node at generation index `index`
    pub fn for_index(index: usize) -> Self {
        match index {
            0..=2 => Tier::Primary,
            3..=5 => Tier::Secondary,
            _ => Tier::Tertiary,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Tier::Primary => 1,
            Tier::Secondary => 2,
            Tier::Tertiary => 3,
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.level()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Tier::Primary),
            2 => Ok(Tier::Secondary),
            3 => Ok(Tier::Tertiary),
            other => Err(format!("tier must be 1, 2 or 3, got {other}")),
        }
    }
}

/// Semantic category of a node's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Principle,
    Fact,
    Example,
    Analogy,
}

impl NodeRole {
    pub const ALL: [NodeRole; 4] = [
        NodeRole::Principle,
        NodeRole::Fact,
        NodeRole::Example,
        NodeRole::Analogy,
    ];

    /// Roles cycle through `ALL` by generation index
    pub fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeRole::Principle => "principle",
            NodeRole::Fact => "fact",
            NodeRole::Example => "example",
            NodeRole::Analogy => "analogy",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship carried by a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Support,
    Contrast,
    Explain,
    Example,
}

// ============================================================================
// Scene records
// ============================================================================

/// A retrieved knowledge source placed on the globe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    pub id: NodeId,
    pub position: [f64; 3],
    pub title: String,
    pub source_url: String,
    pub chunk_text: String,
    pub why_used: String,
    pub is_active: bool,
    pub tier: Tier,
    pub role: NodeRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

/// Directed edge from a node to another node or to the answer core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: Endpoint,
    pub strength: f64,
    pub is_active: bool,
    pub edge_type: EdgeType,
}

/// One ordered unit of the synthesized answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerStep {
    pub id: String,
    pub text: String,
    pub contributing_node_ids: Vec<NodeId>,
    pub order: usize,
}

/// Everything generated for one question, in reveal order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    pub nodes: Vec<KnowledgeNode>,
    pub connections: Vec<Connection>,
    pub steps: Vec<AnswerStep>,
}

impl Scene {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
