//! 三目並べの盤面状態を管理するモジュール
//! 9マスの一次元配列で盤面を表現する。

use serde::{Deserialize, Serialize};

use crate::game::types::{Coord, Side};

/// 盤面のマス数
pub const CELL_COUNT: usize = 9;
/// 中央マスのセル番号
pub const CENTER: usize = 4;

/// 三目並べの記号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opposite(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn side(self) -> Side {
        match self {
            Mark::X => Side::First,
            Mark::O => Side::Second,
        }
    }
}

impl From<Side> for Mark {
    fn from(side: Side) -> Self {
        match side {
            Side::First => Mark::X,
            Side::Second => Mark::O,
        }
    }
}

/// 座標をセル番号に変換する（範囲外はNone）
pub fn index_of(coord: Coord) -> Option<usize> {
    if coord.row < 3 && coord.col < 3 {
        Some(coord.row * 3 + coord.col)
    } else {
        None
    }
}

/// セル番号を座標に変換する
pub fn coord_of(idx: usize) -> Coord {
    Coord::new(idx / 3, idx % 3)
}

/// 三目並べの盤面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記号の並びから盤面を作る
    pub fn from_cells(cells: [Option<Mark>; CELL_COUNT]) -> Self {
        Board { cells }
    }

    pub fn get(&self, idx: usize) -> Option<Mark> {
        self.cells.get(idx).copied().flatten()
    }

    pub fn is_empty(&self, idx: usize) -> bool {
        idx < CELL_COUNT && self.cells[idx].is_none()
    }

    pub(crate) fn set(&mut self, idx: usize, mark: Mark) {
        self.cells[idx] = Some(mark);
    }

    pub fn cells(&self) -> &[Option<Mark>; CELL_COUNT] {
        &self.cells
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// 置かれている記号の数
    pub fn mark_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// API応答用の3x3配列（空は空文字列）
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        self.cells
            .chunks(3)
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Some(Mark::X) => "X".to_string(),
                        Some(Mark::O) => "O".to_string(),
                        None => String::new(),
                    })
                    .collect()
            })
            .collect()
    }
}
