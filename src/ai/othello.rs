//! オセロのAI実装
//! 最多フリップを選ぶGreedyAIと、位置の重みを加味するWeightedAIを提供する。
//! どちらも先読みはせず、同点なら走査順で最初の手を選ぶ。

use crate::error::AIError;
use crate::game::othello::{Board, LegalMove, OthelloRules, Player};
use crate::game::types::Side;

use super::evaluation::BoardEvaluator;
use super::strategies::{AIStrategy, Difficulty};

/// 評価値が最大の手のうち最初に見つかったものを選ぶ
fn first_maximal<F>(moves: Vec<LegalMove>, score: F) -> Option<LegalMove>
where
    F: Fn(&LegalMove) -> i32,
{
    let mut best: Option<(i32, LegalMove)> = None;
    for candidate in moves {
        let value = score(&candidate);
        if best.as_ref().map_or(true, |(best_value, _)| value > *best_value) {
            best = Some((value, candidate));
        }
    }
    best.map(|(_, legal_move)| legal_move)
}

/// ひっくり返す石が最も多い手を選ぶAI
#[derive(Debug, Clone, Default)]
pub struct GreedyAI;

impl GreedyAI {
    pub fn new() -> Self {
        GreedyAI
    }
}

impl AIStrategy for GreedyAI {
    type Board = Board;
    type Move = LegalMove;

    fn calculate_move(&self, board: &Board, side: Side) -> Result<LegalMove, AIError> {
        let moves = OthelloRules::get_all_legal_moves(board, Player::from(side));
        first_maximal(moves, |m| m.capture_count() as i32).ok_or(AIError::NoValidMoves)
    }

    fn score_move(&self, _board: &Board, _side: Side, mv: &LegalMove) -> Option<i32> {
        Some(mv.capture_count() as i32)
    }

    fn get_difficulty(&self) -> Difficulty {
        Difficulty::Greedy
    }

    fn get_name(&self) -> &'static str {
        "GreedyAI"
    }
}

/// 位置の重み + フリップ数で1手だけ評価するAI
#[derive(Debug, Clone, Default)]
pub struct WeightedAI;

impl WeightedAI {
    pub fn new() -> Self {
        WeightedAI
    }
}

impl AIStrategy for WeightedAI {
    type Board = Board;
    type Move = LegalMove;

    fn calculate_move(&self, board: &Board, side: Side) -> Result<LegalMove, AIError> {
        let moves = OthelloRules::get_all_legal_moves(board, Player::from(side));
        first_maximal(moves, BoardEvaluator::weighted_move_score).ok_or(AIError::NoValidMoves)
    }

    fn score_move(&self, _board: &Board, _side: Side, mv: &LegalMove) -> Option<i32> {
        Some(BoardEvaluator::weighted_move_score(mv))
    }

    fn get_difficulty(&self) -> Difficulty {
        Difficulty::Weighted
    }

    fn get_name(&self) -> &'static str {
        "WeightedAI"
    }
}
