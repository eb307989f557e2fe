//! 三目並べのルール実装モジュール
//! 着手の合法性、着手の適用、勝敗判定を担当する。

use serde::{Deserialize, Serialize};

use super::board::{Board, Mark, CELL_COUNT};
use crate::error::{GameError, Result};

/// 勝利ラインの一覧
/// 宣言順（横3本、縦3本、斜め2本）で走査される
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8],
    [0, 3, 6], [1, 4, 7], [2, 5, 8],
    [0, 4, 8], [2, 4, 6],
];

/// 盤面の判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    InProgress,
    /// 最初に揃ったラインとその記号
    Won { winner: Mark, line: [usize; 3] },
    Draw,
}

impl Evaluation {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Evaluation::InProgress)
    }
}

pub struct TicTacToeRules;

impl TicTacToeRules {
    /// 空きマスなら合法
    pub fn legal_move(board: &Board, idx: usize) -> bool {
        board.is_empty(idx)
    }

    /// 記号を書き込む
    /// 埋まっているマスや範囲外は拒否し、盤面は変更しない
    pub fn apply_move(board: &mut Board, idx: usize, mark: Mark) -> Result<()> {
        if idx >= CELL_COUNT {
            return Err(GameError::illegal(format!("Cell {} is out of bounds", idx)));
        }
        if !Self::legal_move(board, idx) {
            return Err(GameError::illegal(format!("Cell {} is already occupied", idx)));
        }

        board.set(idx, mark);
        Ok(())
    }

    /// 勝敗判定
    /// 宣言順で最初に揃ったラインを返す
    pub fn evaluate(board: &Board) -> Evaluation {
        for line in WIN_LINES {
            let [a, b, c] = line;
            if let Some(mark) = board.get(a) {
                if board.get(b) == Some(mark) && board.get(c) == Some(mark) {
                    return Evaluation::Won { winner: mark, line };
                }
            }
        }

        if board.is_full() {
            Evaluation::Draw
        } else {
            Evaluation::InProgress
        }
    }

    /// markが2つと空き1つのラインを探し、その空きマスを返す
    pub fn find_completing_move(board: &Board, mark: Mark) -> Option<usize> {
        WIN_LINES.iter().find_map(|line| {
            let owned = line.iter().filter(|&&i| board.get(i) == Some(mark)).count();
            let empty = line.iter().copied().find(|&i| board.is_empty(i));
            match (owned, empty) {
                (2, Some(idx)) => Some(idx),
                _ => None,
            }
        })
    }

    /// 空きマスのセル番号一覧（昇順）
    pub fn empty_cells(board: &Board) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&i| board.is_empty(i)).collect()
    }
}

/// テスト用: "XX.O....." 形式の文字列から盤面を組み立てる
#[cfg(test)]
pub(crate) fn board_from_str(s: &str) -> Board {
    let mut cells = [None; CELL_COUNT];
    for (i, ch) in s.chars().take(CELL_COUNT).enumerate() {
        cells[i] = match ch {
            'X' => Some(Mark::X),
            'O' => Some(Mark::O),
            _ => None,
        };
    }
    Board::from_cells(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_move_and_reject_occupied() {
        let mut board = Board::new();
        TicTacToeRules::apply_move(&mut board, 0, Mark::X).unwrap();
        assert_eq!(board.get(0), Some(Mark::X));

        let before = board;
        let result = TicTacToeRules::apply_move(&mut board, 0, Mark::O);
        assert!(matches!(result, Err(GameError::IllegalMove { .. })));
        assert_eq!(board, before);

        assert!(TicTacToeRules::apply_move(&mut board, 9, Mark::O).is_err());
    }

    #[test]
    fn test_evaluate_in_progress() {
        assert_eq!(TicTacToeRules::evaluate(&Board::new()), Evaluation::InProgress);
        assert_eq!(TicTacToeRules::evaluate(&board_from_str("XX.O.....")), Evaluation::InProgress);
    }

    #[test]
    fn test_evaluate_win_lines() {
        assert_eq!(
            TicTacToeRules::evaluate(&board_from_str("XXXOO....")),
            Evaluation::Won { winner: Mark::X, line: [0, 1, 2] }
        );
        assert_eq!(
            TicTacToeRules::evaluate(&board_from_str("OX.OX..X.")),
            Evaluation::Won { winner: Mark::X, line: [1, 4, 7] }
        );
        assert_eq!(
            TicTacToeRules::evaluate(&board_from_str("XO..XO..X")),
            Evaluation::Won { winner: Mark::X, line: [0, 4, 8] }
        );
        assert_eq!(
            TicTacToeRules::evaluate(&board_from_str("XXO.O.O.X")),
            Evaluation::Won { winner: Mark::O, line: [2, 4, 6] }
        );
    }

    #[test]
    fn test_evaluate_reports_first_line_in_declaration_order() {
        // 横一列目と縦一列目が同時に揃っている
        let board = board_from_str("XXXXOOXOO");
        assert_eq!(
            TicTacToeRules::evaluate(&board),
            Evaluation::Won { winner: Mark::X, line: [0, 1, 2] }
        );
    }

    #[test]
    fn test_evaluate_draw() {
        let board = board_from_str("XOXXOOOXX");
        assert_eq!(TicTacToeRules::evaluate(&board), Evaluation::Draw);
        assert!(Evaluation::Draw.is_finished());
    }

    #[test]
    fn test_find_completing_move() {
        let board = board_from_str("XX.......");
        assert_eq!(TicTacToeRules::find_completing_move(&board, Mark::X), Some(2));
        assert_eq!(TicTacToeRules::find_completing_move(&board, Mark::O), None);

        // 塞がれたラインは対象外
        let board = board_from_str("XXO......");
        assert_eq!(TicTacToeRules::find_completing_move(&board, Mark::X), None);
    }

    #[test]
    fn test_empty_cells() {
        let board = board_from_str("X...O...X");
        assert_eq!(TicTacToeRules::empty_cells(&board), vec![1, 2, 3, 5, 6, 7]);
    }
}
