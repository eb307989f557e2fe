//! AI戦略の共通インターフェースモジュール
//! 難易度の定義と、ゲームごとの戦略を生成するファクトリを提供する。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AIError;
use crate::game::othello::{self, LegalMove};
use crate::game::tictactoe;
use crate::game::types::{GameKind, Side};

use super::othello::{GreedyAI, WeightedAI};
use super::tictactoe::{HeuristicAI, MinimaxAI};

/// AIの難易度を表すenum
/// 各難易度はどちらか一方のゲーム専用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// 三目並べ: 勝ち手→防御→ランダム
    Heuristic,
    /// 三目並べ: ミニマックス全探索
    Exhaustive,
    /// オセロ: 最多フリップ
    Greedy,
    /// オセロ: 位置の重み + フリップ数
    Weighted,
}

impl Difficulty {
    /// この難易度が対応するゲーム
    pub fn game_kind(self) -> GameKind {
        match self {
            Difficulty::Heuristic | Difficulty::Exhaustive => GameKind::TicTacToe,
            Difficulty::Greedy | Difficulty::Weighted => GameKind::Othello,
        }
    }

    pub fn supports(self, kind: GameKind) -> bool {
        self.game_kind() == kind
    }

    /// ゲームごとの既定の難易度
    pub fn default_for(kind: GameKind) -> Difficulty {
        match kind {
            GameKind::TicTacToe => Difficulty::Heuristic,
            GameKind::Othello => Difficulty::Greedy,
        }
    }

    pub fn all_for(kind: GameKind) -> Vec<Difficulty> {
        [Difficulty::Heuristic, Difficulty::Exhaustive, Difficulty::Greedy, Difficulty::Weighted]
            .into_iter()
            .filter(|d| d.supports(kind))
            .collect()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Heuristic => "heuristic",
            Difficulty::Exhaustive => "exhaustive",
            Difficulty::Greedy => "greedy",
            Difficulty::Weighted => "weighted",
        };
        write!(f, "{}", name)
    }
}

/// AI戦略の共通インターフェース
/// 盤面と手番から次の一手を選ぶ。状態は持たない
pub trait AIStrategy: Send + Sync {
    type Board;
    type Move;

    /// 盤面から指すべき手を計算する
    fn calculate_move(&self, board: &Self::Board, side: Side) -> Result<Self::Move, AIError>;
    /// 選んだ手の評価値（戦略が評価値を持たない場合はNone）
    fn score_move(&self, _board: &Self::Board, _side: Side, _mv: &Self::Move) -> Option<i32> {
        None
    }
    /// このAIの難易度を返す
    fn get_difficulty(&self) -> Difficulty;
    /// AIの名前を返す
    fn get_name(&self) -> &'static str;
}

/// 三目並べ用の戦略（手はセル番号）
pub type TicTacToeStrategy = dyn AIStrategy<Board = tictactoe::Board, Move = usize>;
/// オセロ用の戦略（手は合法手とフリップ集合）
pub type OthelloStrategy = dyn AIStrategy<Board = othello::Board, Move = LegalMove>;

fn unsupported(difficulty: Difficulty, kind: GameKind) -> AIError {
    AIError::UnsupportedDifficulty {
        difficulty: difficulty.to_string(),
        game: kind.to_string(),
    }
}

/// 難易度に応じた三目並べの戦略を生成する
pub fn create_tictactoe_strategy(difficulty: Difficulty) -> Result<Box<TicTacToeStrategy>, AIError> {
    match difficulty {
        Difficulty::Heuristic => Ok(Box::new(HeuristicAI::new())),
        Difficulty::Exhaustive => Ok(Box::new(MinimaxAI::new())),
        other => Err(unsupported(other, GameKind::TicTacToe)),
    }
}

/// 難易度に応じたオセロの戦略を生成する
pub fn create_othello_strategy(difficulty: Difficulty) -> Result<Box<OthelloStrategy>, AIError> {
    match difficulty {
        Difficulty::Greedy => Ok(Box::new(GreedyAI::new())),
        Difficulty::Weighted => Ok(Box::new(WeightedAI::new())),
        other => Err(unsupported(other, GameKind::Othello)),
    }
}
