//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    AskRequest, AskResponse, CancelResponse, ClusteringRequest, ErrorResponse, SelectNodeRequest,
    SessionResponse, SuccessResponse,
};
use super::AppState;
use crate::runtime::RuntimeError;
use crate::session::SessionId;
use crate::state_machine::TransitionError;
use crate::store::{StoreError, StoreSnapshot};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session listing and creation
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/new", post(create_session))
        // Session retrieval and activation
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/select", post(select_session))
        // Sequence control
        .route("/api/sessions/:id/ask", post(ask_question))
        .route("/api/sessions/:id/cancel", post(cancel_sequence))
        // View state
        .route("/api/view/clustering", post(set_clustering))
        .route("/api/view/selection", post(select_node))
        // SSE streaming
        .route("/api/stream", get(stream))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Sessions
// ============================================================

async fn list_sessions(State(state): State<AppState>) -> Json<Arc<StoreSnapshot>> {
    Json(state.runtime.store().snapshot())
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session = state.runtime.create_session();
    (StatusCode::CREATED, Json(SessionResponse { session }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let id = SessionId::from(id);
    let session = state
        .runtime
        .store()
        .session(&id)
        .ok_or_else(|| StoreError::SessionNotFound(id.clone()))?;
    Ok(Json(SessionResponse { session }))
}

async fn select_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.store().select_session(&SessionId::from(id))?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Sequence Control
// ============================================================

async fn ask_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AskRequest>,
) -> Result<(StatusCode, Json<AskResponse>), AppError> {
    let id = SessionId::from(id);
    state.runtime.submit(&id, &req.question).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(AskResponse {
            queued: true,
            session_id: id,
        }),
    ))
}

async fn cancel_sequence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CancelResponse>, AppError> {
    state.runtime.cancel(&SessionId::from(id)).await?;
    Ok(Json(CancelResponse { ok: true }))
}

// ============================================================
// View State
// ============================================================

async fn set_clustering(
    State(state): State<AppState>,
    Json(req): Json<ClusteringRequest>,
) -> Json<SuccessResponse> {
    state.runtime.store().set_clustering(req.mode);
    Json(SuccessResponse { success: true })
}

async fn select_node(
    State(state): State<AppState>,
    Json(req): Json<SelectNodeRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.store().select_node(req.node_id)?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// SSE Streaming
// ============================================================

async fn stream(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe to lifecycle events before reading the snapshot so none are missed
    let broadcast_rx = state.runtime.subscribe_events();
    let snapshots = state.runtime.store().subscribe();
    sse_stream(snapshots, broadcast_rx)
}

async fn get_version() -> &'static str {
    concat!("thinking-globe ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
pub(crate) enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::SessionNotFound(_) | StoreError::NodeNotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            StoreError::NoActiveSession => AppError::BadRequest(e.to_string()),
        }
    }
}

impl From<RuntimeError> for AppError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::Store(e) => e.into(),
            RuntimeError::Transition(TransitionError::EmptyQuestion) => {
                AppError::BadRequest(e.to_string())
            }
            RuntimeError::Transition(TransitionError::SessionBusy) => {
                AppError::Conflict(e.to_string())
            }
            RuntimeError::Transition(TransitionError::InvalidTransition(_))
            | RuntimeError::Stopped(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
