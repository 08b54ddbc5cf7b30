//! Chat session types

use crate::scene::{AnswerStep, Connection, KnowledgeNode, NodeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const MAX_TITLE_CHARS: usize = 50;
pub const DEFAULT_TITLE: &str = "New Chat";

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Identity of a chat session.
///
/// A process-wide counter plus a random v4 uuid, so two sessions created in
/// the same millisecond never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        let seq = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("session-{seq}-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse lifecycle tag of a session, as seen by observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Generating,
    Complete,
    Error,
}

impl SessionStatus {
    /// A sequence is in flight; new questions are rejected
    pub fn is_busy(self) -> bool {
        matches!(self, SessionStatus::Loading | SessionStatus::Generating)
    }
}

/// Running answer state of a session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerCore {
    pub text: String,
    pub is_generating: bool,
    pub current_step: usize,
    pub total_steps: usize,
    pub steps: Vec<AnswerStep>,
}

/// One question/answer interaction and its revealed visualization state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: SessionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub question: String,
    pub answer: AnswerCore,
    pub nodes: Vec<KnowledgeNode>,
    pub connections: Vec<Connection>,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: SessionId::generate(),
            title: DEFAULT_TITLE.to_string(),
            created_at: Utc::now(),
            question: String::new(),
            answer: AnswerCore::default(),
            nodes: Vec::new(),
            connections: Vec::new(),
            status: SessionStatus::Idle,
            error: None,
        }
    }

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Sidebar title for a question: the first 50 characters, `...` when cut
pub fn title_for_question(question: &str) -> String {
    let mut chars = question.chars();
    let head: String = chars.by_ref().take(MAX_TITLE_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

// ============================================================================
// View state
// ============================================================================

/// Camera/animation mode of the globe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Idle,
    Zooming,
    Thinking,
    Generating,
    Exploring,
}

/// How nodes are grouped and colored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusteringMode {
    #[default]
    None,
    Tiers,
    Roles,
}

/// Transient view state shared by every observer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub mode: ViewMode,
    pub clustering: ClusteringMode,
    pub selected_node: Option<NodeId>,
}
