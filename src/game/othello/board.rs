//! オセロの盤面状態を管理するモジュール
//! 8x8グリッドの盤面と石の配置、操作を担当する。

use serde::{Deserialize, Serialize};

use super::types::{Cell, Position, BOARD_SIZE};

/// 8x8オセロ盤面を表現する構造体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// 新しい盤面を作成する
    /// 中央の4マスに初期配置（白黒の対角配置）を設定する
    pub fn new() -> Self {
        let mut board = Board::empty();
        let m = BOARD_SIZE / 2;

        board.cells[m - 1][m - 1] = Cell::White;
        board.cells[m][m] = Cell::White;
        board.cells[m - 1][m] = Cell::Black;
        board.cells[m][m - 1] = Cell::Black;

        board
    }

    /// 石が1つもない盤面を作成する（テストや局面の組み立て用）
    pub fn empty() -> Self {
        Board {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// 指定した位置のセル状態を取得する
    /// 範囲外の場合はNoneを返す
    pub fn get_cell(&self, position: Position) -> Option<Cell> {
        if position.is_valid() {
            Some(self.cells[position.row][position.col])
        } else {
            None
        }
    }

    /// 指定した位置にセル状態を設定する
    /// 範囲外の場合はfalseを返す
    pub fn set_cell(&mut self, position: Position, cell: Cell) -> bool {
        if position.is_valid() {
            self.cells[position.row][position.col] = cell;
            true
        } else {
            false
        }
    }

    /// 指定した位置が空かチェックする
    pub fn is_empty(&self, position: Position) -> bool {
        matches!(self.get_cell(position), Some(Cell::Empty))
    }

    /// 盤面上の黒石と白石の数を数える
    /// 戻り値: (黒石数, 白石数)
    pub fn count_pieces(&self) -> (u8, u8) {
        let mut black_count = 0;
        let mut white_count = 0;

        for row in &self.cells {
            for &cell in row {
                match cell {
                    Cell::Black => black_count += 1,
                    Cell::White => white_count += 1,
                    Cell::Empty => {}
                }
            }
        }

        (black_count, white_count)
    }

    /// 空きマスの数
    pub fn count_empty(&self) -> u8 {
        let (black, white) = self.count_pieces();
        (BOARD_SIZE * BOARD_SIZE) as u8 - black - white
    }

    /// 盤面を180度回転させたコピーを返す
    pub fn rotated(&self) -> Board {
        let mut rotated = Board::empty();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                rotated.cells[BOARD_SIZE - 1 - row][BOARD_SIZE - 1 - col] = self.cells[row][col];
            }
        }
        rotated
    }

    /// API応答用の数値配列（0: 空, 1: 黒, 2: 白）
    pub fn to_grid(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Empty => 0,
                        Cell::Black => 1,
                        Cell::White => 2,
                    })
                    .collect()
            })
            .collect()
    }

    /// デバッグ用の盤面表示文字列を生成する
    /// ●で黒、○で白、.で空マスを表現
    pub fn display(&self) -> String {
        let mut result = String::new();
        result.push_str("  0 1 2 3 4 5 6 7\n");

        for (row_idx, row) in self.cells.iter().enumerate() {
            result.push_str(&format!("{} ", row_idx));
            for &cell in row {
                let symbol = match cell {
                    Cell::Empty => ".",
                    Cell::Black => "●",
                    Cell::White => "○",
                };
                result.push_str(&format!("{} ", symbol));
            }
            result.push('\n');
        }

        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
