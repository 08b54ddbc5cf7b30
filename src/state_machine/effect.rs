//! Effects produced by state transitions

use super::frame::Frame;
use crate::session::{SessionStatus, ViewMode};
use std::time::Duration;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Apply a frame to the session in the store
    ApplyFrame(Frame),

    /// Ask the scene source for a scene (spawns as background task)
    RequestScene { question: String },

    /// Deliver `Event::Tick` after `delay`
    ScheduleTick { delay: Duration },

    /// Change the shared view mode after `delay`; supersedes a pending change
    SetViewMode { mode: ViewMode, delay: Duration },

    /// Stop the scene request and every pending timer of the sequence
    AbortSequence,

    /// Drop the node selection if this session drives the view
    ClearSelection,

    /// Notify connected clients
    Notify(Notification),
}

/// Lifecycle notifications for observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    StateChange { status: SessionStatus },
    SequenceDone,
    Error { message: String },
}

impl Effect {
    pub fn apply(frame: Frame) -> Self {
        Effect::ApplyFrame(frame)
    }

    pub fn view_now(mode: ViewMode) -> Self {
        Effect::SetViewMode {
            mode,
            delay: Duration::ZERO,
        }
    }

    pub fn notify_state_change(status: SessionStatus) -> Self {
        Effect::Notify(Notification::StateChange { status })
    }

    pub fn notify_sequence_done() -> Self {
        Effect::Notify(Notification::SequenceDone)
    }

    pub fn notify_error(message: impl Into<String>) -> Self {
        Effect::Notify(Notification::Error {
            message: message.into(),
        })
    }
}
