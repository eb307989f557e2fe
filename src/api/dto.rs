//! APIのリクエスト・レスポンス定義
//! セッションの状態を表示用の形に変換し、エラーをHTTPステータスに対応付ける。

use axum::{http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::ai::Difficulty;
use crate::error::GameError;
use crate::game::types::{Coord, GameKind, Side};
use crate::game::GameBoard;
use crate::session::{GameSession, MoveOutcome, Scoreboard, TurnState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentMode {
    Human,
    #[default]
    Computer,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub game: GameKind,
    #[serde(default)]
    pub opponent: OpponentMode,
    /// 省略時は設定の既定値
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub row: usize,
    pub col: usize,
}

/// 盤面の表示用表現
/// 三目並べは "X"/"O"/""、オセロは 0: 空, 1: 黒, 2: 白
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BoardGrid {
    TicTacToe(Vec<Vec<String>>),
    Othello(Vec<Vec<u8>>),
}

impl From<&GameBoard> for BoardGrid {
    fn from(board: &GameBoard) -> Self {
        match board {
            GameBoard::TicTacToe(inner) => BoardGrid::TicTacToe(inner.to_grid()),
            GameBoard::Othello(inner) => BoardGrid::Othello(inner.to_grid()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiscCount {
    pub black: u8,
    pub white: u8,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub game: GameKind,
    pub difficulty: Option<Difficulty>,
    pub board: BoardGrid,
    pub turn: TurnState,
    pub current_side: Option<Side>,
    pub computer_to_move: bool,
    pub locked: bool,
    pub legal_moves: Vec<Coord>,
    pub scores: Scoreboard,
    pub move_count: u32,
    pub winning_line: Option<Vec<Coord>>,
    pub disc_count: Option<DiscCount>,
    pub last_updated: DateTime<Utc>,
}

impl SessionResponse {
    pub fn from_session(session: &GameSession) -> Self {
        let disc_count = match &session.board {
            GameBoard::Othello(board) => {
                let (black, white) = board.count_pieces();
                Some(DiscCount { black, white })
            }
            GameBoard::TicTacToe(_) => None,
        };

        Self {
            session_id: session.id,
            game: session.kind(),
            difficulty: session.config.difficulty(),
            board: BoardGrid::from(&session.board),
            turn: session.turn,
            current_side: session.current_side(),
            computer_to_move: session.is_computer_turn(),
            locked: session.locked,
            legal_moves: session.legal_moves(),
            scores: session.scores,
            move_count: session.move_count,
            winning_line: session.winning_line.clone(),
            disc_count,
            last_updated: session.last_updated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub outcome: MoveOutcome,
    pub session: SessionResponse,
}

#[derive(Debug, Serialize)]
pub struct LegalMovesResponse {
    pub session_id: Uuid,
    pub side: Option<Side>,
    pub moves: Vec<Coord>,
}

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub session_id: Uuid,
    pub scores: Scoreboard,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub game: GameKind,
    pub difficulty: Option<Difficulty>,
    pub active: bool,
    pub locked: bool,
    pub move_count: u32,
    pub created_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            session_id: session.id,
            game: session.kind(),
            difficulty: session.config.difficulty(),
            active: session.is_active(),
            locked: session.locked,
            move_count: session.move_count,
            created_at: session.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

pub fn error_code(err: &GameError) -> &'static str {
    match err {
        GameError::IllegalMove { .. } => "ILLEGAL_MOVE",
        GameError::InvalidState { .. } => "INVALID_STATE",
        GameError::SessionNotFound { .. } => "SESSION_NOT_FOUND",
        GameError::SessionLimitExceeded { .. } => "SESSION_LIMIT_EXCEEDED",
        GameError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
        GameError::AIError { .. } => "AI_ERROR",
    }
}

pub fn status_code(err: &GameError) -> StatusCode {
    match err {
        GameError::IllegalMove { .. } => StatusCode::BAD_REQUEST,
        GameError::InvalidState { .. } => StatusCode::CONFLICT,
        GameError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        GameError::SessionLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        GameError::InvalidConfiguration { .. } => StatusCode::BAD_REQUEST,
        GameError::AIError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<GameError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: GameError) -> Self {
        if err.is_rejection() {
            debug!(error = %err, "request rejected");
        } else {
            warn!(error = %err, "request failed");
        }
        (status_code(&err), Json(ErrorResponse::new(error_code(&err), err.to_string())))
    }
}
