//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! next state and effects. Timers, the scene source and the store are driven
//! by the runtime executing the returned effects.

use super::frame::Frame;
use super::state::{ErrorKind, Phase, SequenceContext, SequenceState};
use super::{Effect, Event};
use crate::scene::Scene;
use crate::session::ViewMode;
use std::sync::Arc;
use thiserror::Error;

pub const CANCELLED_MESSAGE: &str = "Cancelled";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SequenceState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SequenceState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Session is busy, wait for the current answer or cancel it first")]
    SessionBusy,
    #[error("Question is empty")]
    EmptyQuestion,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(
    state: &SequenceState,
    context: &SequenceContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let timings = &context.timings;

    match (state, event) {
        // ============================================================
        // Question submission
        // ============================================================

        (
            SequenceState::Idle | SequenceState::Complete | SequenceState::Error { .. },
            Event::Submit { question },
        ) => {
            let question = question.trim().to_string();
            if question.is_empty() {
                return Err(TransitionError::EmptyQuestion);
            }

            let next = SequenceState::Loading {
                question: question.clone(),
            };
            let status = next.status();
            Ok(TransitionResult::new(next).with_effects([
                Effect::apply(Frame::Begin {
                    question: question.clone(),
                }),
                Effect::ClearSelection,
                Effect::notify_state_change(status),
                Effect::view_now(ViewMode::Zooming),
                Effect::SetViewMode {
                    mode: ViewMode::Thinking,
                    delay: timings.zoom_delay,
                },
                Effect::RequestScene { question },
            ]))
        }

        (SequenceState::Loading { .. } | SequenceState::Generating { .. }, Event::Submit { .. }) => {
            Err(TransitionError::SessionBusy)
        }

        // ============================================================
        // Scene source results
        // ============================================================

        (SequenceState::Loading { .. }, Event::SceneReady { scene, .. }) => {
            let (phase, delay) = if scene.node_count() == 0 {
                (Phase::Narrating { next: 0 }, timings.narration_delay)
            } else {
                (Phase::Revealing { next: 0 }, timings.reveal_delay)
            };
            let next = SequenceState::Generating {
                scene: scene.clone(),
                phase,
            };
            let status = next.status();

            Ok(TransitionResult::new(next).with_effects([
                Effect::apply(Frame::Install { scene }),
                Effect::notify_state_change(status),
                Effect::view_now(ViewMode::Generating),
                Effect::ScheduleTick { delay },
            ]))
        }

        (SequenceState::Loading { .. }, Event::GenerationFailed { message, .. }) => {
            let next = SequenceState::Error {
                message: message.clone(),
                error_kind: ErrorKind::Generation,
            };
            let status = next.status();

            Ok(TransitionResult::new(next).with_effects([
                Effect::apply(Frame::Fail {
                    message: message.clone(),
                }),
                Effect::notify_state_change(status),
                Effect::notify_error(message),
                // Also supersedes the pending "thinking" view
                Effect::view_now(ViewMode::Idle),
            ]))
        }

        // ============================================================
        // Timed playback
        // ============================================================

        (SequenceState::Generating { scene, phase }, Event::Tick { .. }) => {
            Ok(advance(scene, *phase, context))
        }

        // ============================================================
        // Cancellation
        // ============================================================

        (SequenceState::Loading { .. } | SequenceState::Generating { .. }, Event::Cancel) => {
            // A revealed prefix stays explorable; nothing was shown while loading
            let view = match state {
                SequenceState::Generating { .. } => ViewMode::Exploring,
                _ => ViewMode::Idle,
            };
            let next = SequenceState::Error {
                message: CANCELLED_MESSAGE.to_string(),
                error_kind: ErrorKind::Cancelled,
            };
            let status = next.status();

            Ok(TransitionResult::new(next).with_effects([
                Effect::AbortSequence,
                Effect::apply(Frame::Fail {
                    message: CANCELLED_MESSAGE.to_string(),
                }),
                Effect::notify_state_change(status),
                Effect::view_now(view),
            ]))
        }

        // Nothing in flight: cancelling is a no-op
        (
            SequenceState::Idle | SequenceState::Complete | SequenceState::Error { .. },
            Event::Cancel,
        ) => Ok(TransitionResult::new(state.clone())),

        // ============================================================
        // Stale or out-of-order events
        // ============================================================

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "{} in state {:?}",
            event.name(),
            state.status()
        ))),
    }
}

/// One playback tick: apply the current frame and schedule the next one
fn advance(scene: &Arc<Scene>, phase: Phase, context: &SequenceContext) -> TransitionResult {
    let timings = &context.timings;

    match phase {
        Phase::Revealing { next } => {
            let frame = Effect::apply(Frame::Reveal {
                scene: scene.clone(),
                index: next,
            });
            let (phase, delay) = if next + 1 < scene.node_count() {
                (Phase::Revealing { next: next + 1 }, timings.reveal_delay)
            } else {
                (Phase::Narrating { next: 0 }, timings.narration_delay)
            };

            TransitionResult::new(SequenceState::Generating {
                scene: scene.clone(),
                phase,
            })
            .with_effect(frame)
            .with_effect(Effect::ScheduleTick { delay })
        }

        Phase::Narrating { next } => {
            let frame = Effect::apply(Frame::Narrate {
                scene: scene.clone(),
                step: next,
            });

            if next < scene.step_count() {
                TransitionResult::new(SequenceState::Generating {
                    scene: scene.clone(),
                    phase: Phase::Narrating { next: next + 1 },
                })
                .with_effect(frame)
                .with_effect(Effect::ScheduleTick {
                    delay: timings.narration_delay,
                })
            } else {
                let next = SequenceState::Complete;
                let status = next.status();
                TransitionResult::new(next).with_effects([
                    frame,
                    Effect::apply(Frame::Complete),
                    Effect::notify_state_change(status),
                    Effect::notify_sequence_done(),
                    Effect::view_now(ViewMode::Exploring),
                ])
            }
        }
    }
}
