//! Session runtime executor

use super::traits::SceneSource;
use super::{RuntimeError, SseEvent};

use crate::session::ViewMode;
use crate::state_machine::{
    transition, Effect, Event, Notification, SequenceContext, SequenceState, TransitionError,
};
use crate::store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Drives one session's reveal sequence
///
/// Events are processed one at a time; timers and the scene request run as
/// background tasks that post events back into `event_rx`.
pub struct SessionRuntime<S>
where
    S: SceneSource + ?Sized + 'static,
{
    context: SequenceContext,
    state: SequenceState,
    store: SessionStore,
    scene_source: Arc<S>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    /// Token shared by the scene request and every tick of the current sequence
    sequence_cancel_token: Option<CancellationToken>,
    /// Token for the pending delayed view change
    view_cancel_token: Option<CancellationToken>,
    /// Number of the latest sequence; background events from older ones are dropped
    sequence: u64,
}

impl<S> SessionRuntime<S>
where
    S: SceneSource + ?Sized + 'static,
{
    pub fn new(
        context: SequenceContext,
        state: SequenceState,
        store: SessionStore,
        scene_source: Arc<S>,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<SseEvent>,
    ) -> Self {
        Self {
            context,
            state,
            store,
            scene_source,
            event_rx,
            event_tx,
            broadcast_tx,
            sequence_cancel_token: None,
            view_cancel_token: None,
            sequence: 0,
        }
    }

    /// Process events until the channel closes.
    ///
    /// The runtime keeps a sender for its own timers, so in practice this
    /// runs for the life of the process.
    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting session runtime");

        while let Some(event) = self.event_rx.recv().await {
            match self.process_event(event) {
                Ok(()) => {}
                // Timers and scene requests that lost a race with cancellation
                Err(RuntimeError::Transition(TransitionError::InvalidTransition(reason))) => {
                    tracing::debug!(
                        session_id = %self.context.session_id,
                        %reason,
                        "Ignoring stale event"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %self.context.session_id,
                        error = %e,
                        "Error handling event"
                    );
                    let _ = self.broadcast_tx.send(SseEvent::Error {
                        session_id: self.context.session_id.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    fn process_event(&mut self, event: Event) -> Result<(), RuntimeError> {
        let event_name = event.name();

        if let Some(sequence) = event.sequence() {
            if sequence != self.sequence {
                tracing::debug!(
                    session_id = %self.context.session_id,
                    event = event_name,
                    sequence,
                    current = self.sequence,
                    "Dropping event from an earlier sequence"
                );
                return Ok(());
            }
        }

        // Pure state transition
        let result = transition(&self.state, &self.context, event)?;

        tracing::debug!(
            session_id = %self.context.session_id,
            event = event_name,
            from = ?self.state.status(),
            to = ?result.new_state.status(),
            "Transition"
        );
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect)?;
        }

        // Nothing left to wait for once the sequence has settled
        if !self.state.is_busy() {
            self.sequence_cancel_token = None;
        }

        Ok(())
    }

    /// Execute an effect
    fn execute_effect(&mut self, effect: Effect) -> Result<(), RuntimeError> {
        match effect {
            Effect::ApplyFrame(frame) => {
                self.store
                    .update_session(&self.context.session_id, |session| frame.apply(session))?;
                Ok(())
            }

            Effect::RequestScene { question } => {
                // A fresh token and number per sequence so an earlier one cannot leak in
                let cancel_token = CancellationToken::new();
                self.sequence_cancel_token = Some(cancel_token.clone());
                self.sequence += 1;
                let sequence = self.sequence;

                let scene_source = self.scene_source.clone();
                let event_tx = self.event_tx.clone();
                let session_id = self.context.session_id.clone();

                tokio::spawn(async move {
                    tracing::info!(session_id = %session_id, "Requesting scene (background)");

                    tokio::select! {
                        biased;

                        () = cancel_token.cancelled() => {
                            tracing::info!(session_id = %session_id, "Scene request cancelled");
                        }

                        result = scene_source.generate(&question) => {
                            let event = match result {
                                Ok(scene) => Event::SceneReady { sequence, scene: Arc::new(scene) },
                                Err(e) => {
                                    tracing::warn!(session_id = %session_id, error = %e, "Scene generation failed");
                                    Event::GenerationFailed { sequence, message: e.to_string() }
                                }
                            };
                            let _ = event_tx.send(event).await;
                        }
                    }
                });

                Ok(())
            }

            Effect::ScheduleTick { delay } => {
                let cancel_token = self.sequence_token();
                let event_tx = self.event_tx.clone();
                let sequence = self.sequence;

                tokio::spawn(async move {
                    tokio::select! {
                        biased;

                        () = cancel_token.cancelled() => {}

                        () = tokio::time::sleep(delay) => {
                            if !cancel_token.is_cancelled() {
                                let _ = event_tx.send(Event::Tick { sequence }).await;
                            }
                        }
                    }
                });

                Ok(())
            }

            Effect::SetViewMode { mode, delay } => {
                self.set_view_mode(mode, delay);
                Ok(())
            }

            Effect::AbortSequence => {
                self.abort_sequence();
                Ok(())
            }

            Effect::ClearSelection => {
                self.store.clear_selection_for(&self.context.session_id);
                Ok(())
            }

            Effect::Notify(notification) => {
                let session_id = self.context.session_id.clone();
                let event = match notification {
                    Notification::StateChange { status } => {
                        SseEvent::StateChange { session_id, status }
                    }
                    Notification::SequenceDone => SseEvent::SequenceDone { session_id },
                    Notification::Error { message } => SseEvent::Error {
                        session_id,
                        message,
                    },
                };
                // No subscribers is fine
                let _ = self.broadcast_tx.send(event);
                Ok(())
            }
        }
    }

    /// Token of the running sequence, created on first use
    fn sequence_token(&mut self) -> CancellationToken {
        self.sequence_cancel_token
            .get_or_insert_with(CancellationToken::new)
            .clone()
    }

    fn abort_sequence(&mut self) {
        if let Some(token) = self.sequence_cancel_token.take() {
            token.cancel();
        }
        if let Some(token) = self.view_cancel_token.take() {
            token.cancel();
        }
    }

    /// Apply a view mode now or after `delay`; a newer change supersedes a pending one
    fn set_view_mode(&mut self, mode: ViewMode, delay: Duration) {
        if let Some(token) = self.view_cancel_token.take() {
            token.cancel();
        }

        if delay.is_zero() {
            self.store.set_view_mode_for(&self.context.session_id, mode);
            return;
        }

        let cancel_token = CancellationToken::new();
        self.view_cancel_token = Some(cancel_token.clone());
        let store = self.store.clone();
        let session_id = self.context.session_id.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;

                () = cancel_token.cancelled() => {}

                () = tokio::time::sleep(delay) => {
                    store.set_view_mode_for(&session_id, mode);
                }
            }
        });
    }
}
