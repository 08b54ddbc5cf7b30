//! Sequence state types

use crate::config::SequencerConfig;
use crate::scene::Scene;
use crate::session::{SessionId, SessionStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Why a sequence ended in the error state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The scene source failed
    Generation,
    /// The sequence was cancelled mid-flight
    Cancelled,
}

/// Progress through a generated scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Next tick reveals node `next`
    Revealing { next: usize },
    /// Next tick narrates the first `next` answer steps
    Narrating { next: usize },
}

/// Per-session sequence state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SequenceState {
    /// Waiting for a question
    #[default]
    Idle,
    /// Question accepted, waiting for the scene source
    Loading { question: String },
    /// Playing back a generated scene
    Generating { scene: Arc<Scene>, phase: Phase },
    /// Sequence finished; a new question may be asked
    Complete,
    /// Generation failed or was cancelled; a new question recovers
    Error { message: String, error_kind: ErrorKind },
}

impl SequenceState {
    /// Status tag exposed on the session
    pub fn status(&self) -> SessionStatus {
        match self {
            SequenceState::Idle => SessionStatus::Idle,
            SequenceState::Loading { .. } => SessionStatus::Loading,
            SequenceState::Generating { .. } => SessionStatus::Generating,
            SequenceState::Complete => SessionStatus::Complete,
            SequenceState::Error { .. } => SessionStatus::Error,
        }
    }

    /// Check if a sequence is in flight
    pub fn is_busy(&self) -> bool {
        self.status().is_busy()
    }
}

/// Context for a session runtime (immutable configuration)
#[derive(Debug, Clone)]
pub struct SequenceContext {
    pub session_id: SessionId,
    pub timings: SequencerConfig,
}

impl SequenceContext {
    pub fn new(session_id: SessionId, timings: SequencerConfig) -> Self {
        Self {
            session_id,
            timings,
        }
    }
}
