//! Property-based tests for the sequence state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::config::SequencerConfig;
use crate::scene::{generate_scene, Scene};
use crate::session::{ChatSession, SessionId, SessionStatus, ViewMode};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> SequenceContext {
    SequenceContext::new(
        SessionId::from("prop-session".to_string()),
        SequencerConfig::default(),
    )
}

/// Drive every tick of a scene from `Loading` to the end, collecting frames
fn play(scene: &Arc<Scene>) -> (SequenceState, Vec<Frame>) {
    let ctx = test_context();
    let mut frames = Vec::new();
    let mut state = SequenceState::Loading {
        question: "Q".into(),
    };
    let mut event = Event::SceneReady {
        sequence: 1,
        scene: scene.clone(),
    };

    loop {
        let Ok(result) = transition(&state, &ctx, event) else {
            break;
        };
        for effect in result.effects {
            if let Effect::ApplyFrame(frame) = effect {
                frames.push(frame);
            }
        }
        state = result.new_state;
        if !state.is_busy() {
            break;
        }
        event = Event::Tick { sequence: 1 };
    }

    (state, frames)
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_scene() -> impl Strategy<Value = Arc<Scene>> {
    any::<u64>().prop_map(|seed| Arc::new(generate_scene("Q", &mut StdRng::seed_from_u64(seed))))
}

fn arb_error_kind() -> impl Strategy<Value = ErrorKind> {
    prop_oneof![Just(ErrorKind::Generation), Just(ErrorKind::Cancelled)]
}

fn arb_busy_state() -> impl Strategy<Value = SequenceState> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(|question| SequenceState::Loading { question }),
        (arb_scene(), 0usize..12, any::<bool>()).prop_map(|(scene, next, revealing)| {
            let phase = if revealing {
                Phase::Revealing { next }
            } else {
                Phase::Narrating { next: next % 6 }
            };
            SequenceState::Generating { scene, phase }
        }),
    ]
}

fn arb_settled_state() -> impl Strategy<Value = SequenceState> {
    prop_oneof![
        Just(SequenceState::Idle),
        Just(SequenceState::Complete),
        ("[a-z ]{1,20}", arb_error_kind())
            .prop_map(|(message, error_kind)| SequenceState::Error { message, error_kind }),
    ]
}

fn arb_state() -> impl Strategy<Value = SequenceState> {
    prop_oneof![arb_settled_state(), arb_busy_state()]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-zA-Z ?]{0,30}".prop_map(|question| Event::Submit { question }),
        Just(Event::Cancel),
        (any::<u64>(), arb_scene())
            .prop_map(|(sequence, scene)| Event::SceneReady { sequence, scene }),
        (any::<u64>(), "[a-z ]{1,20}")
            .prop_map(|(sequence, message)| Event::GenerationFailed { sequence, message }),
        any::<u64>().prop_map(|sequence| Event::Tick { sequence }),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // A sequence in flight never accepts a second question
    #[test]
    fn prop_busy_rejects_submit(state in arb_busy_state(), question in "[a-z]{1,20}") {
        let result = transition(&state, &test_context(), Event::Submit { question });
        prop_assert_eq!(result.unwrap_err(), TransitionError::SessionBusy);
    }

    // Idle, complete and error states all accept a non-blank question
    #[test]
    fn prop_settled_accepts_question(state in arb_settled_state(), question in "[a-z]{1,20}") {
        let result = transition(&state, &test_context(), Event::Submit { question: question.clone() });
        prop_assert!(result.is_ok(), "Submit failed: {:?}", result);
        prop_assert_eq!(result.unwrap().new_state, SequenceState::Loading { question });
    }

    // Blank questions are rejected regardless of state
    #[test]
    fn prop_blank_question_rejected(state in arb_settled_state(), question in "[ \t]{0,5}") {
        let result = transition(&state, &test_context(), Event::Submit { question });
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyQuestion);
    }

    // Cancel always succeeds and never leaves a sequence running
    #[test]
    fn prop_cancel_settles(state in arb_state()) {
        let was_busy = state.is_busy();
        let result = transition(&state, &test_context(), Event::Cancel).unwrap();
        prop_assert!(!result.new_state.is_busy());
        prop_assert_eq!(
            result.effects.contains(&Effect::AbortSequence),
            was_busy,
            "AbortSequence only for a sequence in flight"
        );
        // A cancelled sequence never leaves the view mid-animation
        if was_busy {
            prop_assert!(matches!(
                result.effects.last(),
                Some(Effect::SetViewMode { mode: ViewMode::Idle | ViewMode::Exploring, delay })
                    if delay.is_zero()
            ), "last effect should be an immediate SetViewMode to Idle or Exploring");
        }
    }

    // Ticks are only scheduled while the machine is generating
    #[test]
    fn prop_ticks_only_while_generating(
        events in proptest::collection::vec(arb_event(), 0..30)
    ) {
        let ctx = test_context();
        let mut state = SequenceState::Idle;

        for event in events {
            if let Ok(result) = transition(&state, &ctx, event) {
                let schedules = result
                    .effects
                    .iter()
                    .any(|e| matches!(e, Effect::ScheduleTick { .. }));
                if schedules {
                    prop_assert!(
                        matches!(result.new_state, SequenceState::Generating { .. }),
                        "ScheduleTick from {:?}",
                        result.new_state
                    );
                }
                state = result.new_state;
            }
        }
    }

    // Playback applies reveals in node order, then every narration step, then completes
    #[test]
    fn prop_playback_frame_order(scene in arb_scene()) {
        let (state, frames) = play(&scene);
        let n = scene.node_count();
        let s = scene.step_count();

        prop_assert_eq!(state, SequenceState::Complete);
        prop_assert_eq!(frames.len(), 1 + n + s + 1 + 1);
        prop_assert_eq!(&frames[0], &Frame::Install { scene: scene.clone() });
        for i in 0..n {
            prop_assert_eq!(&frames[1 + i], &Frame::Reveal { scene: scene.clone(), index: i });
        }
        for step in 0..=s {
            prop_assert_eq!(&frames[1 + n + step], &Frame::Narrate { scene: scene.clone(), step });
        }
        prop_assert_eq!(frames.last(), Some(&Frame::Complete));
    }

    // Folding the frames over a fresh session lands on the finished scene
    #[test]
    fn prop_playback_final_session(scene in arb_scene()) {
        let (_, frames) = play(&scene);
        let session = frames
            .iter()
            .fold(ChatSession::new(), |session, frame| frame.apply(&session));

        prop_assert_eq!(session.status, SessionStatus::Complete);
        prop_assert_eq!(session.nodes.len(), scene.node_count());
        prop_assert_eq!(session.connections.len(), scene.connections.len());
        prop_assert!(!session.answer.is_generating);
        prop_assert_eq!(session.answer.current_step, scene.step_count());
        let expected = super::frame::narrated_text(&scene, scene.step_count());
        prop_assert_eq!(session.answer.text, expected);
    }
}
