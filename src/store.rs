//! In-memory session store
//!
//! Sessions are kept most-recent-first. Every mutation builds a new snapshot
//! and publishes it through a `watch` channel; untouched sessions are shared
//! between snapshots, so observers never see a half-applied update.

use crate::scene::NodeId;
use crate::session::{ChatSession, ClusteringMode, SessionId, ViewMode, ViewState};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
    #[error("Node {0} is not visible in the active session")]
    NodeNotFound(NodeId),
    #[error("No active session")]
    NoActiveSession,
}

/// Immutable view of the whole store at one point in time
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreSnapshot {
    pub sessions: Vec<Arc<ChatSession>>,
    pub active_session_id: Option<SessionId>,
    pub view: ViewState,
}

impl StoreSnapshot {
    pub fn session(&self, id: &SessionId) -> Option<&Arc<ChatSession>> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    pub fn active_session(&self) -> Option<&Arc<ChatSession>> {
        self.active_session_id.as_ref().and_then(|id| self.session(id))
    }
}

/// Shared handle to the session collection
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Arc<StoreSnapshot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(StoreSnapshot::default()));
        Self { tx: Arc::new(tx) }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.tx.borrow().clone()
    }

    /// Receive every published snapshot (latest-wins)
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.tx.subscribe()
    }

    pub fn session(&self, id: &SessionId) -> Option<Arc<ChatSession>> {
        self.snapshot().session(id).cloned()
    }

    pub fn active_session(&self) -> Option<Arc<ChatSession>> {
        self.snapshot().active_session().cloned()
    }

    /// Start a new chat: prepend it, make it active and reset the view
    pub fn create_session(&self) -> Arc<ChatSession> {
        let session = Arc::new(ChatSession::new());
        let created = session.clone();

        self.tx.send_modify(|current| {
            let mut sessions = Vec::with_capacity(current.sessions.len() + 1);
            sessions.push(session.clone());
            sessions.extend(current.sessions.iter().cloned());

            *current = Arc::new(StoreSnapshot {
                sessions,
                active_session_id: Some(session.id.clone()),
                view: ViewState::default(),
            });
        });

        tracing::info!(session_id = %created.id, "Created session");
        created
    }

    /// Make `id` the active session
    pub fn select_session(&self, id: &SessionId) -> Result<(), StoreError> {
        self.publish(|current| {
            current
                .session(id)
                .ok_or_else(|| StoreError::SessionNotFound(id.clone()))?;
            Ok(StoreSnapshot {
                sessions: current.sessions.clone(),
                active_session_id: Some(id.clone()),
                view: ViewState {
                    selected_node: None,
                    ..current.view.clone()
                },
            })
        })
    }

    /// Replace session `id` with `transform(session)`
    pub fn update_session<F>(&self, id: &SessionId, transform: F) -> Result<Arc<ChatSession>, StoreError>
    where
        F: FnOnce(&ChatSession) -> ChatSession,
    {
        let mut updated = None;
        self.publish(|current| {
            let index = current
                .sessions
                .iter()
                .position(|s| &s.id == id)
                .ok_or_else(|| StoreError::SessionNotFound(id.clone()))?;

            let next = Arc::new(transform(&current.sessions[index]));
            updated = Some(next.clone());

            let mut sessions = current.sessions.clone();
            sessions[index] = next;
            Ok(StoreSnapshot {
                sessions,
                active_session_id: current.active_session_id.clone(),
                view: current.view.clone(),
            })
        })?;

        updated.ok_or_else(|| StoreError::SessionNotFound(id.clone()))
    }

    pub fn set_clustering(&self, clustering: ClusteringMode) {
        let _ = self.publish(|current| {
            Ok(StoreSnapshot {
                view: ViewState {
                    clustering,
                    ..current.view.clone()
                },
                ..current.clone()
            })
        });
    }

    /// Select a node of the active session, or clear the selection
    pub fn select_node(&self, node: Option<NodeId>) -> Result<(), StoreError> {
        self.publish(|current| {
            if let Some(node_id) = &node {
                let active = current.active_session().ok_or(StoreError::NoActiveSession)?;
                if !active.has_node(node_id) {
                    return Err(StoreError::NodeNotFound(node_id.clone()));
                }
            }
            Ok(StoreSnapshot {
                view: ViewState {
                    selected_node: node,
                    ..current.view.clone()
                },
                ..current.clone()
            })
        })
    }

    /// Change the view mode on behalf of session `id`.
    ///
    /// Only the active session drives the view; returns whether it applied.
    pub fn set_view_mode_for(&self, id: &SessionId, mode: ViewMode) -> bool {
        self.publish(|current| {
            if current.active_session_id.as_ref() != Some(id) {
                return Err(StoreError::SessionNotFound(id.clone()));
            }
            Ok(StoreSnapshot {
                view: ViewState {
                    mode,
                    ..current.view.clone()
                },
                ..current.clone()
            })
        })
        .is_ok()
    }

    /// Drop the node selection when session `id` is active and starts over.
    pub fn clear_selection_for(&self, id: &SessionId) -> bool {
        self.publish(|current| {
            if current.active_session_id.as_ref() != Some(id) {
                return Err(StoreError::SessionNotFound(id.clone()));
            }
            Ok(StoreSnapshot {
                view: ViewState {
                    selected_node: None,
                    ..current.view.clone()
                },
                ..current.clone()
            })
        })
        .is_ok()
    }

    /// Build the next snapshot from the current one and publish it.
    /// Nothing is published when `build` fails.
    fn publish<F>(&self, build: F) -> Result<(), StoreError>
    where
        F: FnOnce(&StoreSnapshot) -> Result<StoreSnapshot, StoreError>,
    {
        let mut result = Ok(());
        self.tx.send_if_modified(|current| match build(&**current) {
            Ok(next) => {
                *current = Arc::new(next);
                true
            }
            Err(e) => {
                result = Err(e);
                false
            }
        });
        result
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
