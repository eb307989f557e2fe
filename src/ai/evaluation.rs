//! オセロAIの盤面評価
//! 位置の重み表と、候補手1手分の評価値を提供する。
//! 角は絶対に返されないため最重視し、角の隣（X打ち・C打ち）は相手に角を与えやすいので減点する。

use crate::game::othello::{LegalMove, Position, BOARD_SIZE};

/// 位置の重み表
pub const POSITION_WEIGHTS: [[i32; BOARD_SIZE]; BOARD_SIZE] = [
    [100, -20,  10,   5,   5,  10, -20, 100],
    [-20, -50,  -2,  -2,  -2,  -2, -50, -20],
    [ 10,  -2,  -1,  -1,  -1,  -1,  -2,  10],
    [  5,  -2,  -1,  -1,  -1,  -1,  -2,   5],
    [  5,  -2,  -1,  -1,  -1,  -1,  -2,   5],
    [ 10,  -2,  -1,  -1,  -1,  -1,  -2,  10],
    [-20, -50,  -2,  -2,  -2,  -2, -50, -20],
    [100, -20,  10,   5,   5,  10, -20, 100],
];

/// 候補手の評価を行うスタティックメソッド集
pub struct BoardEvaluator;

impl BoardEvaluator {
    /// 指定したマスの位置の重み
    pub fn positional_weight(position: Position) -> i32 {
        POSITION_WEIGHTS[position.row][position.col]
    }

    /// 1手読みの評価値: 位置の重み + ひっくり返す石の数
    pub fn weighted_move_score(legal_move: &LegalMove) -> i32 {
        Self::positional_weight(legal_move.position) + legal_move.capture_count() as i32
    }
}
