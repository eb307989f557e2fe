//! オセロの基本型定義モジュール
//! 盤面のマス状態、プレイヤー、座標、合法手を定義する。

use serde::{Deserialize, Serialize};

use crate::game::types::{Coord, Side};

/// 盤面の一辺のマス数
pub const BOARD_SIZE: usize = 8;

/// 盤面の各マスの状態を表現するenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Black,
    White,
}

/// オセロのプレイヤーを表すenum
/// 先手は黒、後手は白
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// 相手プレイヤーを返す
    pub fn opposite(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// プレイヤーを対応するセル状態に変換する
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }

    pub fn side(self) -> Side {
        match self {
            Player::Black => Side::First,
            Player::White => Side::Second,
        }
    }
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::First => Player::Black,
            Side::Second => Player::White,
        }
    }
}

/// 8x8盤面上の座標を表す構造体
/// row, colともに0-7の範囲で有効
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// 範囲チェック付きのコンストラクタ
    /// 盤面の範囲外の座標の場合はNoneを返す
    pub fn new(row: usize, col: usize) -> Option<Position> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// 座標が有効範囲内かチェックする
    pub fn is_valid(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// 盤面を180度回転させた位置を返す
    pub fn rotated(&self) -> Position {
        Position {
            row: BOARD_SIZE - 1 - self.row,
            col: BOARD_SIZE - 1 - self.col,
        }
    }
}

impl From<Position> for Coord {
    fn from(position: Position) -> Self {
        Coord::new(position.row, position.col)
    }
}

/// 合法手1つ分（着手位置とひっくり返る石の位置）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMove {
    pub position: Position,
    pub flips: Vec<Position>,
}

impl LegalMove {
    pub fn capture_count(&self) -> usize {
        self.flips.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opposite() {
        assert_eq!(Player::Black.opposite(), Player::White);
        assert_eq!(Player::White.opposite(), Player::Black);
    }

    #[test]
    fn test_player_side_mapping() {
        assert_eq!(Player::from(Side::First), Player::Black);
        assert_eq!(Player::from(Side::Second), Player::White);
        assert_eq!(Player::White.side(), Side::Second);
    }

    #[test]
    fn test_position_new_invalid() {
        assert!(Position::new(8, 4).is_none());
        assert!(Position::new(3, 8).is_none());
        assert!(!Position { row: 8, col: 0 }.is_valid());
    }

    #[test]
    fn test_position_rotated() {
        let pos = Position::new(2, 3).unwrap();
        assert_eq!(pos.rotated(), Position { row: 5, col: 4 });
        assert_eq!(pos.rotated().rotated(), pos);
    }
}
