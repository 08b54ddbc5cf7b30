//! Runtime for executing reveal sequences
//!
//! One `SessionRuntime` task per session owns that session's state machine.
//! The manager routes API calls to those tasks and fans their lifecycle
//! events out to SSE clients.

mod executor;
pub mod traits;


pub use executor::SessionRuntime;
pub use traits::*;

use crate::config::SequencerConfig;
use crate::session::{ChatSession, SessionId, SessionStatus};
use crate::state_machine::{Event, SequenceContext, SequenceState, TransitionError};
use crate::store::{SessionStore, StoreError};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, RwLock};

/// Type alias for production runtime with the boxed scene source
pub type ProductionRuntime = SessionRuntime<dyn SceneSource>;

/// Errors surfaced by the manager to the API layer
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// The runtime task is gone; only a panic inside it gets here
    #[error("Runtime for session {0} has stopped")]
    Stopped(SessionId),
}

/// Lifecycle events sent to SSE clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SseEvent {
    StateChange {
        session_id: SessionId,
        status: SessionStatus,
    },
    SequenceDone {
        session_id: SessionId,
    },
    Error {
        session_id: SessionId,
        message: String,
    },
}

impl SseEvent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            SseEvent::StateChange { .. } => "state_change",
            SseEvent::SequenceDone { .. } => "sequence_done",
            SseEvent::Error { .. } => "error",
        }
    }
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub event_tx: mpsc::Sender<Event>,
}

/// Manager for all session runtimes
pub struct RuntimeManager {
    store: SessionStore,
    scene_source: Arc<dyn SceneSource>,
    timings: SequencerConfig,
    runtimes: RwLock<HashMap<SessionId, SessionHandle>>,
    broadcast_tx: broadcast::Sender<SseEvent>,
}

impl RuntimeManager {
    pub fn new(
        store: SessionStore,
        scene_source: Arc<dyn SceneSource>,
        timings: SequencerConfig,
    ) -> Self {
        let (broadcast_tx, _) = broadcast::channel(256);
        Self {
            store,
            scene_source,
            timings,
            runtimes: RwLock::new(HashMap::new()),
            broadcast_tx,
        }
    }

    /// Get the session store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a new session and make it active
    pub fn create_session(&self) -> Arc<ChatSession> {
        self.store.create_session()
    }

    /// Get or create a runtime for a session
    pub async fn get_or_create(&self, session_id: &SessionId) -> Result<SessionHandle, RuntimeError> {
        // Check if already running
        {
            let runtimes = self.runtimes.read().await;
            if let Some(handle) = runtimes.get(session_id) {
                return Ok(handle.clone());
            }
        }

        if self.store.session(session_id).is_none() {
            return Err(StoreError::SessionNotFound(session_id.clone()).into());
        }

        let mut runtimes = self.runtimes.write().await;
        // Another caller may have started it while we waited for the lock
        if let Some(handle) = runtimes.get(session_id) {
            return Ok(handle.clone());
        }

        let (event_tx, event_rx) = mpsc::channel(32);
        let runtime: ProductionRuntime = SessionRuntime::new(
            SequenceContext::new(session_id.clone(), self.timings),
            // Only the runtime moves a session out of idle, and it is
            // started before the first question
            SequenceState::Idle,
            self.store.clone(),
            self.scene_source.clone(),
            event_rx,
            event_tx.clone(),
            self.broadcast_tx.clone(),
        );

        // Start runtime in background
        tokio::spawn(runtime.run());

        let handle = SessionHandle { event_tx };
        runtimes.insert(session_id.clone(), handle.clone());
        Ok(handle)
    }

    /// Send an event to a session
    pub async fn send_event(&self, session_id: &SessionId, event: Event) -> Result<(), RuntimeError> {
        let handle = self.get_or_create(session_id).await?;
        handle
            .event_tx
            .send(event)
            .await
            .map_err(|_| RuntimeError::Stopped(session_id.clone()))
    }

    /// Ask a question in a session.
    ///
    /// Blank questions and busy sessions are rejected here so callers get an
    /// immediate answer; the runtime rejects them again if a race slips past.
    pub async fn submit(&self, session_id: &SessionId, question: &str) -> Result<(), RuntimeError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(TransitionError::EmptyQuestion.into());
        }

        let session = self
            .store
            .session(session_id)
            .ok_or_else(|| StoreError::SessionNotFound(session_id.clone()))?;
        if session.status.is_busy() {
            return Err(TransitionError::SessionBusy.into());
        }

        tracing::info!(session_id = %session_id, question = %question, "Question submitted");
        self.send_event(
            session_id,
            Event::Submit {
                question: question.to_string(),
            },
        )
        .await
    }

    /// Cancel the session's running sequence, if any
    pub async fn cancel(&self, session_id: &SessionId) -> Result<(), RuntimeError> {
        tracing::info!(session_id = %session_id, "Cancel requested");
        self.send_event(session_id, Event::Cancel).await
    }

    /// Subscribe to lifecycle events of every session
    pub fn subscribe_events(&self) -> broadcast::Receiver<SseEvent> {
        self.broadcast_tx.subscribe()
    }
}
