//! Events that drive a session's sequence

use crate::scene::Scene;
use std::sync::Arc;

/// Events that trigger state transitions
///
/// Scene source and timer events carry the number of the sequence that
/// produced them; the runtime drops any that belong to an earlier one.
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit { question: String },
    Cancel,

    // Scene source events
    SceneReady { sequence: u64, scene: Arc<Scene> },
    GenerationFailed { sequence: u64, message: String },

    // Timer events
    Tick { sequence: u64 },
}

impl Event {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Event::Submit { .. } => "submit",
            Event::Cancel => "cancel",
            Event::SceneReady { .. } => "scene_ready",
            Event::GenerationFailed { .. } => "generation_failed",
            Event::Tick { .. } => "tick",
        }
    }

    /// Sequence that produced this event, for background events
    pub fn sequence(&self) -> Option<u64> {
        match self {
            Event::Submit { .. } | Event::Cancel => None,
            Event::SceneReady { sequence, .. }
            | Event::GenerationFailed { sequence, .. }
            | Event::Tick { sequence } => Some(*sequence),
        }
    }
}
