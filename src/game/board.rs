//! ゲーム種別ごとの盤面をまとめて扱うためのモジュール
//! セッションやAIサービスは盤面をこのenum越しに受け渡す。

use serde::{Deserialize, Serialize};

use super::othello::{self, OthelloRules, Player};
use super::tictactoe::{self, coord_of, TicTacToeRules};
use super::types::{Coord, GameKind, Side};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", content = "board", rename_all = "snake_case")]
pub enum GameBoard {
    TicTacToe(tictactoe::Board),
    Othello(othello::Board),
}

impl GameBoard {
    /// ゲーム種別の初期盤面を作成する
    pub fn new(kind: GameKind) -> Self {
        match kind {
            GameKind::TicTacToe => GameBoard::TicTacToe(tictactoe::Board::new()),
            GameKind::Othello => GameBoard::Othello(othello::Board::new()),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            GameBoard::TicTacToe(_) => GameKind::TicTacToe,
            GameBoard::Othello(_) => GameKind::Othello,
        }
    }

    /// 指定した手番が置ける座標の一覧（走査順）
    pub fn legal_moves(&self, side: Side) -> Vec<Coord> {
        match self {
            GameBoard::TicTacToe(board) => TicTacToeRules::empty_cells(board)
                .into_iter()
                .map(coord_of)
                .collect(),
            GameBoard::Othello(board) => OthelloRules::get_all_legal_moves(board, Player::from(side))
                .into_iter()
                .map(|m| Coord::from(m.position))
                .collect(),
        }
    }
}
