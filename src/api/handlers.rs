//! 対局APIハンドラー

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::DefaultsConfig;
use crate::game::types::Coord;
use crate::session::{GameService, SessionConfig};

use super::dto::{
    CreateSessionRequest, ErrorResponse, LegalMovesResponse, MoveRequest, MoveResponse,
    OpponentMode, ScoresResponse, SessionListResponse, SessionResponse, SessionSummary,
};

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<GameService>,
    pub defaults: DefaultsConfig,
}

impl AppState {
    pub fn new(service: Arc<GameService>, defaults: DefaultsConfig) -> Self {
        Self { service, defaults }
    }
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let config = match request.opponent {
        OpponentMode::Human => SessionConfig::two_player(request.game),
        OpponentMode::Computer => {
            let difficulty = request
                .difficulty
                .unwrap_or_else(|| state.defaults.difficulty_for(request.game));
            SessionConfig::vs_computer(request.game, difficulty)
        }
    };

    let session = state.service.create_session(config)?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from_session(&session))))
}

pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    let sessions: Vec<SessionSummary> = state
        .service
        .list_sessions()
        .iter()
        .map(SessionSummary::from_session)
        .collect();

    Json(SessionListResponse {
        total_count: sessions.len(),
        sessions,
    })
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.service.get_session(session_id)?;
    Ok(Json(SessionResponse::from_session(&session)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.service.delete_session(session_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn new_game(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.service.new_game(session_id)?;
    Ok(Json(SessionResponse::from_session(&session)))
}

pub async fn submit_move(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<MoveRequest>,
) -> ApiResult<Json<MoveResponse>> {
    let outcome = state
        .service
        .submit_move(session_id, Coord::new(request.row, request.col))
        .await?;
    let session = state.service.get_session(session_id)?;

    Ok(Json(MoveResponse {
        outcome,
        session: SessionResponse::from_session(&session),
    }))
}

pub async fn computer_move(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<MoveResponse>> {
    let outcome = state.service.computer_move(session_id).await?;
    let session = state.service.get_session(session_id)?;

    Ok(Json(MoveResponse {
        outcome,
        session: SessionResponse::from_session(&session),
    }))
}

pub async fn get_legal_moves(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<LegalMovesResponse>> {
    // 手番と合法手は同じスナップショットから求める
    let session = state.service.get_session(session_id)?;
    let side = session.current_side();
    let moves = session.legal_moves();

    Ok(Json(LegalMovesResponse { session_id, side, moves }))
}

pub async fn reset_scores(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<ScoresResponse>> {
    let scores = state.service.reset_scores(session_id)?;
    Ok(Json(ScoresResponse { session_id, scores }))
}

pub async fn health_check() -> &'static str {
    "Board games API server is running"
}
