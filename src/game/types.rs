//! 両ゲーム共通の基本型定義モジュール
//! ゲーム種別、手番（先手・後手）、外部座標、対局結果を定義する。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 対局できるゲームの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    TicTacToe,
    Othello,
}

impl GameKind {
    /// 盤面の一辺のマス数
    pub fn board_size(self) -> usize {
        match self {
            GameKind::TicTacToe => 3,
            GameKind::Othello => 8,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::TicTacToe => write!(f, "tic-tac-toe"),
            GameKind::Othello => write!(f, "othello"),
        }
    }
}

/// 手番を表すenum
/// 先手は三目並べのX・オセロの黒、後手はO・白
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// 相手の手番を返す
    pub fn opposite(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// 盤面上の座標（外部インターフェース共通）
/// 三目並べでは `row * 3 + col` がセル番号になる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 終局時の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Winner(Side),
    Draw,
}

impl GameResult {
    pub fn winner(self) -> Option<Side> {
        match self {
            GameResult::Winner(side) => Some(side),
            GameResult::Draw => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::First.opposite(), Side::Second);
        assert_eq!(Side::Second.opposite(), Side::First);
    }

    #[test]
    fn test_game_kind_board_size() {
        assert_eq!(GameKind::TicTacToe.board_size(), 3);
        assert_eq!(GameKind::Othello.board_size(), 8);
    }

    #[test]
    fn test_game_kind_serialization() {
        let json = serde_json::to_string(&GameKind::TicTacToe).unwrap();
        assert_eq!(json, "\"tic_tac_toe\"");
        let kind: GameKind = serde_json::from_str("\"othello\"").unwrap();
        assert_eq!(kind, GameKind::Othello);
    }

    #[test]
    fn test_game_result_winner() {
        assert_eq!(GameResult::Winner(Side::First).winner(), Some(Side::First));
        assert_eq!(GameResult::Draw.winner(), None);
    }
}
