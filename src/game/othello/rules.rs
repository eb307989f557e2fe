//! オセロのルールとゲームロジック実装モジュール
//! 合法手の判定、石のフリップ処理、手番の進行とゲーム終了判定を担当する。

use super::board::Board;
use super::types::{Cell, LegalMove, Player, Position, BOARD_SIZE};
use crate::error::{GameError, Result};
use crate::game::types::GameResult;

/// 盤面上の8方向への移動ベクトル
const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),  // 左上、上、右上
    (0, -1),           (0, 1),   // 左、右
    (1, -1),  (1, 0),  (1, 1),   // 左下、下、右下
];

/// 着手後の手番の進み方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAdvance {
    /// 相手に合法手があるので手番が移る
    Pass(Player),
    /// 相手に合法手がなく、着手した側がもう一度打つ
    Retain(Player),
    /// 両者とも合法手がないので終局
    GameOver(GameResult),
}

/// オセロのルールを実装する構造体
/// スタティックメソッドのみを提供する
pub struct OthelloRules;

impl OthelloRules {
    /// 指定した位置に石を置いた場合にひっくり返る石の位置を返す
    /// 8方向を探索し、相手の石の連続の先に自分の石がある方向だけを採用する
    pub fn get_flips(board: &Board, position: Position, player: Player) -> Vec<Position> {
        if !board.is_empty(position) {
            return Vec::new();
        }

        let mut flipped = Vec::new();
        let player_cell = player.to_cell();
        let opponent_cell = player.opposite().to_cell();

        for &(dr, dc) in &DIRECTIONS {
            let mut line_flipped = Vec::new();
            let mut current_row = position.row as i8 + dr;
            let mut current_col = position.col as i8 + dc;

            while (0..BOARD_SIZE as i8).contains(&current_row) && (0..BOARD_SIZE as i8).contains(&current_col) {
                let current_pos = Position {
                    row: current_row as usize,
                    col: current_col as usize,
                };

                match board.get_cell(current_pos) {
                    Some(cell) if cell == opponent_cell => {
                        line_flipped.push(current_pos);
                    }
                    Some(cell) if cell == player_cell => {
                        // 自分の石で挟めたのでこの方向は確定
                        flipped.extend(line_flipped);
                        break;
                    }
                    _ => break,
                }

                current_row += dr;
                current_col += dc;
            }
        }

        flipped
    }

    /// 指定した位置に現在のプレイヤーが置けるかチェックする
    pub fn is_valid_move(board: &Board, position: Position, player: Player) -> bool {
        !Self::get_flips(board, position, player).is_empty()
    }

    /// 指定したプレイヤーの合法手を全て取得する
    /// 行優先（左上から右下）の走査順で並ぶ
    pub fn get_all_legal_moves(board: &Board, player: Player) -> Vec<LegalMove> {
        let mut moves = Vec::new();

        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let position = Position { row, col };
                let flips = Self::get_flips(board, position, player);
                if !flips.is_empty() {
                    moves.push(LegalMove { position, flips });
                }
            }
        }

        moves
    }

    /// 指定したプレイヤーに合法手があるかチェックする
    pub fn has_valid_moves(board: &Board, player: Player) -> bool {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
            .any(|position| Self::is_valid_move(board, position, player))
    }

    /// 着手位置に石を置き、flipsの石を全て自分の色に変える
/// flipsは挟んだ石の集合と一致しなければならない
    /// 検証は変更前に全て済ませるため、途中までの状態が残ることはない
    pub fn apply_move(board: &mut Board, position: Position, player: Player, flips: &[Position]) -> Result<()> {
        if !position.is_valid() {
            return Err(GameError::illegal(format!(
                "Position ({}, {}) is out of bounds",
                position.row, position.col
            )));
        }

        if !board.is_empty(position) {
            return Err(GameError::illegal(format!(
                "Position ({}, {}) is already occupied",
                position.row, position.col
            )));
        }

        if flips.is_empty() {
            return Err(GameError::illegal(format!(
                "Position ({}, {}) captures no discs for {:?}",
                position.row, position.col, player
            )));
        }

        let opponent_cell = player.opposite().to_cell();
        if let Some(bad) = flips.iter().find(|pos| board.get_cell(**pos) != Some(opponent_cell)) {
            return Err(GameError::illegal(format!(
                "Position ({}, {}) is not an opponent disc",
                bad.row, bad.col
            )));
        }

        let mut expected = Self::get_flips(board, position, player);
        let mut given = flips.to_vec();
        expected.sort_by_key(|p| (p.row, p.col));
        given.sort_by_key(|p| (p.row, p.col));
        given.dedup();
        if given != expected {
            return Err(GameError::illegal(format!(
                "Flips for ({}, {}) do not follow the capture rule",
                position.row, position.col
            )));
        }

        board.set_cell(position, player.to_cell());
        for flip_pos in flips {
            board.set_cell(*flip_pos, player.to_cell());
        }

        Ok(())
    }

    /// フリップ集合を計算してから着手する
    /// 戻り値はひっくり返した石の位置リスト
    pub fn play(board: &mut Board, position: Position, player: Player) -> Result<Vec<Position>> {
        let flips = Self::get_flips(board, position, player);
        Self::apply_move(board, position, player, &flips)?;
        Ok(flips)
    }

    /// 着手後の手番を決める
    /// 相手に手があれば交代、なければ着手側が続行、両者なければ終局
    pub fn next_turn(board: &Board, mover: Player) -> TurnAdvance {
        let opponent = mover.opposite();

        if Self::has_valid_moves(board, opponent) {
            TurnAdvance::Pass(opponent)
        } else if Self::has_valid_moves(board, mover) {
            TurnAdvance::Retain(mover)
        } else {
            TurnAdvance::GameOver(Self::determine_winner(board))
        }
    }

    /// ゲーム終了判定（両プレイヤーとも合法手がない）
    pub fn is_game_over(board: &Board) -> bool {
        !Self::has_valid_moves(board, Player::Black) && !Self::has_valid_moves(board, Player::White)
    }

    /// 石数に基づいて勝者を決定する
    pub fn determine_winner(board: &Board) -> GameResult {
        let (black_count, white_count) = board.count_pieces();

        if black_count > white_count {
            GameResult::Winner(Player::Black.side())
        } else if white_count > black_count {
            GameResult::Winner(Player::White.side())
        } else {
            GameResult::Draw
        }
    }
}

/// テスト用: 文字列の並びから盤面を組み立てる（B: 黒, W: 白, それ以外: 空）
#[cfg(test)]
pub(crate) fn board_from_rows(rows: [&str; BOARD_SIZE]) -> Board {
    let mut board = Board::empty();
    for (row, line) in rows.iter().enumerate() {
        for (col, ch) in line.chars().take(BOARD_SIZE).enumerate() {
            let cell = match ch {
                'B' => Cell::Black,
                'W' => Cell::White,
                _ => Cell::Empty,
            };
            board.set_cell(Position { row, col }, cell);
        }
    }
    board
}
