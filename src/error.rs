//! アプリケーション全体のエラー定義モジュール
//! ゲームロジック、AI戦略、セッション管理のエラーを統一管理。
//! どのエラーもプロセスを落とさず、呼び出し側に拒否として返される。

use thiserror::Error;
use uuid::Uuid;

/// 着手が受け付けられない状態の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidStateReason {
    #[error("game is not active")]
    GameInactive,

    #[error("board is locked while the computer is moving")]
    BoardLocked,

    #[error("it is not this side's turn")]
    NotYourTurn,
}

/// ゲームロジックに関連するエラー
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Illegal move: {reason}")]
    IllegalMove { reason: String },

    #[error("Invalid state: {reason}")]
    InvalidState { reason: InvalidStateReason },

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: Uuid },

    #[error("Session limit exceeded: max {max}")]
    SessionLimitExceeded { max: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("AI calculation failed: {source}")]
    AIError {
        #[from]
        source: AIError,
    },
}

impl GameError {
    pub fn illegal(reason: impl Into<String>) -> Self {
        GameError::IllegalMove { reason: reason.into() }
    }

    pub fn invalid_state(reason: InvalidStateReason) -> Self {
        GameError::InvalidState { reason }
    }

    /// 拒否系のエラー（状態を変更せず呼び出し側が無視できるもの）か判定する
    pub fn is_rejection(&self) -> bool {
        matches!(self, GameError::IllegalMove { .. } | GameError::InvalidState { .. })
    }
}

/// AI戦略に関連するエラー
#[derive(Debug, Error)]
pub enum AIError {
    #[error("No valid moves available")]
    NoValidMoves,

    #[error("Difficulty {difficulty} is not available for {game}")]
    UnsupportedDifficulty { difficulty: String, game: String },
}

/// ゲームエラーをベースとした結果型
pub type Result<T> = std::result::Result<T, GameError>;
