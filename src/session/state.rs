//! ゲームセッションの状態管理モジュール
//! 盤面、手番、ロック状態、通算成績など対局の全状態を保持し、
//! 着手の検証・適用と手番の進行（パス・終局判定）を担当する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::ai::{AIChoice, Difficulty};
use crate::error::{GameError, InvalidStateReason, Result};
use crate::game::othello::{OthelloRules, Player, Position, TurnAdvance};
use crate::game::tictactoe::{coord_of, index_of, Evaluation, Mark, TicTacToeRules};
use crate::game::types::{Coord, GameKind, GameResult, Side};
use crate::game::GameBoard;

/// コンピュータは常に後手を受け持つ
pub const COMPUTER_SIDE: Side = Side::Second;

/// 対戦相手の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Opponent {
    Human,
    Computer { difficulty: Difficulty },
}

/// セッション作成時の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub kind: GameKind,
    pub opponent: Opponent,
}

impl SessionConfig {
    pub fn vs_computer(kind: GameKind, difficulty: Difficulty) -> Self {
        Self {
            kind,
            opponent: Opponent::Computer { difficulty },
        }
    }

    pub fn two_player(kind: GameKind) -> Self {
        Self {
            kind,
            opponent: Opponent::Human,
        }
    }

    /// 難易度がゲーム種別に対応しているか検証する
    pub fn validate(&self) -> Result<()> {
        if let Opponent::Computer { difficulty } = self.opponent {
            if !difficulty.supports(self.kind) {
                return Err(GameError::InvalidConfiguration {
                    message: format!(
                        "difficulty {} is not available for {} (expected one of {:?})",
                        difficulty,
                        self.kind,
                        Difficulty::all_for(self.kind)
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match self.opponent {
            Opponent::Computer { difficulty } => Some(difficulty),
            Opponent::Human => None,
        }
    }
}

/// 手番の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TurnState {
    /// 着手待ち。forced_passは相手に合法手がなく同じ側が続けて打つことを示す
    AwaitingMove { side: Side, forced_pass: bool },
    Terminated { result: GameResult },
}

/// 通算成績（新しい対局を始めても保持される）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub first_wins: u32,
    pub second_wins: u32,
    pub draws: u32,
}

impl Scoreboard {
    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Winner(Side::First) => self.first_wins += 1,
            GameResult::Winner(Side::Second) => self.second_wins += 1,
            GameResult::Draw => self.draws += 1,
        }
    }

    pub fn reset(&mut self) {
        *self = Scoreboard::default();
    }

    pub fn total(&self) -> u32 {
        self.first_wins + self.second_wins + self.draws
    }
}

/// 1手の適用結果
/// 置いた位置、ひっくり返った位置、次の手番をまとめて返す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub mover: Side,
    pub placed: Coord,
    pub flipped: Vec<Coord>,
    pub turn: TurnState,
    /// 三目並べで勝敗を決めたライン
    pub winning_line: Option<Vec<Coord>>,
}

impl MoveOutcome {
    pub fn next_to_move(&self) -> Option<Side> {
        match self.turn {
            TurnState::AwaitingMove { side, .. } => Some(side),
            TurnState::Terminated { .. } => None,
        }
    }

    pub fn forced_pass(&self) -> bool {
        matches!(self.turn, TurnState::AwaitingMove { forced_pass: true, .. })
    }

    pub fn result(&self) -> Option<GameResult> {
        match self.turn {
            TurnState::Terminated { result } => Some(result),
            TurnState::AwaitingMove { .. } => None,
        }
    }
}

/// ゲームセッションの全状態
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub id: Uuid,
    pub config: SessionConfig,
    pub board: GameBoard,
    pub turn: TurnState,
    /// コンピュータの着手（とその演出）が進行中
    pub locked: bool,
    pub scores: Scoreboard,
    pub move_count: u32,
    pub winning_line: Option<Vec<Coord>>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl GameSession {
    /// 新しいセッションを作成する
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            config,
            board: GameBoard::new(config.kind),
            turn: TurnState::AwaitingMove {
                side: Side::First,
                forced_pass: false,
            },
            locked: false,
            scores: Scoreboard::default(),
            move_count: 0,
            winning_line: None,
            created_at: now,
            last_updated: now,
        })
    }

    /// 盤面・手番・ロックを初期化する。通算成績はそのまま
    pub fn new_game(&mut self) {
        self.board = GameBoard::new(self.config.kind);
        self.turn = TurnState::AwaitingMove {
            side: Side::First,
            forced_pass: false,
        };
        self.locked = false;
        self.move_count = 0;
        self.winning_line = None;
        self.last_updated = Utc::now();
    }

    pub fn kind(&self) -> GameKind {
        self.config.kind
    }

    pub fn is_active(&self) -> bool {
        matches!(self.turn, TurnState::AwaitingMove { .. })
    }

    pub fn current_side(&self) -> Option<Side> {
        match self.turn {
            TurnState::AwaitingMove { side, .. } => Some(side),
            TurnState::Terminated { .. } => None,
        }
    }

    pub fn is_computer_side(&self, side: Side) -> bool {
        matches!(self.config.opponent, Opponent::Computer { .. }) && side == COMPUTER_SIDE
    }

    pub fn is_computer_turn(&self) -> bool {
        self.current_side().map_or(false, |side| self.is_computer_side(side))
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// 手番側の合法手（終局後は空）
    pub fn legal_moves(&self) -> Vec<Coord> {
        match self.current_side() {
            Some(side) => self.board.legal_moves(side),
            None => Vec::new(),
        }
    }

    /// 人間の着手を検証して適用する
    /// 拒否された場合、状態は一切変更されない
    pub fn submit_move(&mut self, coord: Coord) -> Result<MoveOutcome> {
        let side = self.current_side()
            .ok_or(GameError::invalid_state(InvalidStateReason::GameInactive))?;
        if self.locked {
            return Err(GameError::invalid_state(InvalidStateReason::BoardLocked));
        }
        if self.is_computer_side(side) {
            return Err(GameError::invalid_state(InvalidStateReason::NotYourTurn));
        }

        self.play(side, coord, None)
    }

    /// AIが選んだ手を適用する
    /// ロックはコンピュータ自身が保持しているので確認しない
    pub fn apply_computer_move(&mut self, choice: &AIChoice) -> Result<MoveOutcome> {
        let side = self.current_side()
            .ok_or(GameError::invalid_state(InvalidStateReason::GameInactive))?;
        if !self.is_computer_side(side) {
            return Err(GameError::invalid_state(InvalidStateReason::NotYourTurn));
        }

        match choice {
            AIChoice::TicTacToe(idx) => self.play(side, coord_of(*idx), None),
            AIChoice::Othello(legal_move) => {
                self.play(side, Coord::from(legal_move.position), Some(&legal_move.flips))
            }
        }
    }

    pub fn reset_scores(&mut self) {
        self.scores.reset();
        self.last_updated = Utc::now();
    }

    fn play(&mut self, side: Side, coord: Coord, flips: Option<&[Position]>) -> Result<MoveOutcome> {
        let (flipped, turn, winning_line) = match &mut self.board {
            GameBoard::TicTacToe(board) => {
                let idx = index_of(coord)
                    .ok_or_else(|| GameError::illegal(format!("Coordinate {} is out of bounds", coord)))?;
                TicTacToeRules::apply_move(board, idx, Mark::from(side))?;

                match TicTacToeRules::evaluate(board) {
                    Evaluation::Won { winner, line } => (
                        Vec::new(),
                        TurnState::Terminated { result: GameResult::Winner(winner.side()) },
                        Some(line.iter().map(|&i| coord_of(i)).collect()),
                    ),
                    Evaluation::Draw => (Vec::new(), TurnState::Terminated { result: GameResult::Draw }, None),
                    Evaluation::InProgress => (
                        Vec::new(),
                        TurnState::AwaitingMove { side: side.opposite(), forced_pass: false },
                        None,
                    ),
                }
            }
            GameBoard::Othello(board) => {
                let position = Position::new(coord.row, coord.col)
                    .ok_or_else(|| GameError::illegal(format!("Coordinate {} is out of bounds", coord)))?;
                let player = Player::from(side);
                let flips = match flips {
                    Some(flips) => {
                        OthelloRules::apply_move(board, position, player, flips)?;
                        flips.to_vec()
                    }
                    None => OthelloRules::play(board, position, player)?,
                };

                let turn = match OthelloRules::next_turn(board, player) {
                    TurnAdvance::Pass(next) => TurnState::AwaitingMove { side: next.side(), forced_pass: false },
                    TurnAdvance::Retain(same) => {
                        info!(session_id = %self.id, passed = ?side.opposite(), "no legal move, turn retained");
                        TurnState::AwaitingMove { side: same.side(), forced_pass: true }
                    }
                    TurnAdvance::GameOver(result) => {
                        debug!(session_id = %self.id, "final position\n{}", board.display());
                        TurnState::Terminated { result }
                    }
                };

                (flips.into_iter().map(Coord::from).collect(), turn, None)
            }
        };

        self.turn = turn;
        self.move_count += 1;
        self.winning_line = winning_line.clone();
        self.last_updated = Utc::now();
        debug!(session_id = %self.id, ?side, %coord, flipped = flipped.len(), "move applied");

        if let TurnState::Terminated { result } = turn {
            self.scores.record(result);
            info!(session_id = %self.id, ?result, scores = ?self.scores, "game finished");
        }

        Ok(MoveOutcome {
            mover: side,
            placed: coord,
            flipped,
            turn,
            winning_line,
        })
    }
}
