//! REST endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use gridduel_core::wire::{LegalMoveModel, StateModel};
use gridduel_core::{Direction, PieceId};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;
use crate::session::Session;
use crate::{ws, AppState};

// =============================================================================
// JSON Models
// =============================================================================

/// Body of `POST /sessions/{id}/move`, e.g. `{"piece":"A-P1","direction":"F"}`.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub piece: String,
    pub direction: String,
}

#[derive(Debug, Serialize)]
pub struct SessionModel {
    pub id: String,
    pub state: StateModel,
}

#[derive(Debug, Serialize)]
pub struct HealthModel {
    pub status: String,
}

// =============================================================================
// API Endpoints
// =============================================================================

fn session(state: &AppState, id: String) -> Result<Arc<Session>, ApiError> {
    state
        .sessions
        .get(&id)
        .ok_or(ApiError::SessionNotFound(id))
}

pub async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

pub async fn create_session(State(state): State<AppState>) -> Result<Json<SessionModel>, ApiError> {
    let session = state.sessions.create()?;
    Ok(Json(SessionModel {
        id: session.id().to_string(),
        state: session.snapshot(),
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StateModel>, ApiError> {
    Ok(Json(session(&state, id)?.snapshot()))
}

pub async fn get_moves(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<LegalMoveModel>>, ApiError> {
    Ok(Json(session(&state, id)?.legal_moves()))
}

pub async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<StateModel>, ApiError> {
    let session = session(&state, id)?;
    let piece: PieceId = req.piece.parse()?;
    let direction: Direction = req.direction.parse()?;
    Ok(Json(session.apply_move(piece, direction)?))
}

pub async fn reset_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StateModel>, ApiError> {
    Ok(Json(session(&state, id)?.reset()))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", delete(delete_session))
        .route("/sessions/{id}/game", get(get_game))
        .route("/sessions/{id}/moves", get(get_moves))
        .route("/sessions/{id}/move", post(make_move))
        .route("/sessions/{id}/reset", post(reset_game))
        .route("/sessions/{id}/ws", get(ws::upgrade))
        .layer(cors)
        .with_state(state)
}
