//! 三目並べのAI実装
//! ルールベースのHeuristicAIと、ミニマックス全探索のMinimaxAIを提供する。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::error::AIError;
use crate::game::tictactoe::{Board, Evaluation, Mark, TicTacToeRules, CENTER};
use crate::game::types::Side;

use super::strategies::{AIStrategy, Difficulty};

/// 勝ちを取る、相手の勝ちを塞ぐ、それ以外はランダムに打つAI
/// ラインは宣言順に走査し、最初に見つかったものを使う
#[derive(Debug, Default)]
pub struct HeuristicAI {
    rng: Option<Mutex<StdRng>>,
}

impl HeuristicAI {
    pub fn new() -> Self {
        HeuristicAI { rng: None }
    }

    /// 乱数シードを固定したインスタンスを作る
    pub fn with_seed(seed: u64) -> Self {
        HeuristicAI {
            rng: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn random_index(&self, len: usize) -> usize {
        match &self.rng {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                rng.random_range(0..len)
            }
            None => rand::rng().random_range(0..len),
        }
    }
}

impl AIStrategy for HeuristicAI {
    type Board = Board;
    type Move = usize;

    fn calculate_move(&self, board: &Board, side: Side) -> Result<usize, AIError> {
        let me = Mark::from(side);

        if let Some(idx) = TicTacToeRules::find_completing_move(board, me) {
            return Ok(idx);
        }
        if let Some(idx) = TicTacToeRules::find_completing_move(board, me.opposite()) {
            return Ok(idx);
        }

        let empty = TicTacToeRules::empty_cells(board);
        if empty.is_empty() {
            return Err(AIError::NoValidMoves);
        }
        Ok(empty[self.random_index(empty.len())])
    }

    fn get_difficulty(&self) -> Difficulty {
        Difficulty::Heuristic
    }

    fn get_name(&self) -> &'static str {
        "HeuristicAI"
    }
}

/// 終局までゲーム木を全探索するAI
/// AIの勝ちは `10 - depth`、負けは `depth - 10`、引き分けは0で評価する
#[derive(Debug, Clone, Default)]
pub struct MinimaxAI;

impl MinimaxAI {
    pub fn new() -> Self {
        MinimaxAI
    }

    /// 全探索で最善手とその評価値を返す
    /// 同点の場合はセル番号の小さい手を選ぶ
    pub fn search(board: &Board, me: Mark) -> Option<(usize, i32)> {
        let mut best: Option<(usize, i32)> = None;

        for idx in TicTacToeRules::empty_cells(board) {
            let mut child = *board;
            child.set(idx, me);
            let score = Self::minimax(&child, 0, false, me);

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((idx, score));
            }
        }

        best
    }

    fn minimax(board: &Board, depth: i32, maximizing: bool, me: Mark) -> i32 {
        match TicTacToeRules::evaluate(board) {
            Evaluation::Won { winner, .. } if winner == me => return 10 - depth,
            Evaluation::Won { .. } => return depth - 10,
            Evaluation::Draw => return 0,
            Evaluation::InProgress => {}
        }

        let mover = if maximizing { me } else { me.opposite() };
        let scores = TicTacToeRules::empty_cells(board).into_iter().map(|idx| {
            // 枝ごとに盤面をコピーするので巻き戻しは不要
            let mut child = *board;
            child.set(idx, mover);
            Self::minimax(&child, depth + 1, !maximizing, me)
        });

        if maximizing {
            scores.max().unwrap_or(0)
        } else {
            scores.min().unwrap_or(0)
        }
    }
}

impl AIStrategy for MinimaxAI {
    type Board = Board;
    type Move = usize;

    fn calculate_move(&self, board: &Board, side: Side) -> Result<usize, AIError> {
        // 序盤は中央が常に最善手の一つなので探索を省略する
        if board.mark_count() <= 1 && board.is_empty(CENTER) {
            return Ok(CENTER);
        }

        Self::search(board, Mark::from(side))
            .map(|(idx, _)| idx)
            .ok_or(AIError::NoValidMoves)
    }

    /// 着手後の局面を全探索した評価値
    fn score_move(&self, board: &Board, side: Side, mv: &usize) -> Option<i32> {
        if !board.is_empty(*mv) {
            return None;
        }
        let me = Mark::from(side);
        let mut child = *board;
        child.set(*mv, me);
        Some(Self::minimax(&child, 0, false, me))
    }

    fn get_difficulty(&self) -> Difficulty {
        Difficulty::Exhaustive
    }

    fn get_name(&self) -> &'static str {
        "MinimaxAI"
    }
}
