//! API request and response types

use crate::scene::NodeId;
use crate::session::{ChatSession, ClusteringMode, SessionId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request to ask a question in a session
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Request to change how nodes are grouped
#[derive(Debug, Deserialize)]
pub struct ClusteringRequest {
    pub mode: ClusteringMode,
}

/// Request to select a node; `null` clears the selection
#[derive(Debug, Deserialize)]
pub struct SelectNodeRequest {
    pub node_id: Option<NodeId>,
}

/// Response with a single session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Arc<ChatSession>,
}

/// Response for ask action
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub queued: bool,
    pub session_id: SessionId,
}

/// Response for cancel action
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub ok: bool,
}

/// Response for view and selection actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
