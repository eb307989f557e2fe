//! AIサービスの抽象化層モジュール
//! 盤面と難易度からAIの手を非同期に求める共通インターフェースを提供する。
//! 「考えている」演出の待ち時間はここで扱い、手の計算自体は同期的に行う。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AIError;
use crate::game::othello::LegalMove;
use crate::game::tictactoe::coord_of;
use crate::game::types::{Coord, Side};
use crate::game::GameBoard;

use super::strategies::Difficulty;

/// AIが選んだ手
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AIChoice {
    /// 三目並べのセル番号
    TicTacToe(usize),
    /// オセロの着手位置とフリップ集合
    Othello(LegalMove),
}

impl AIChoice {
    /// 着手位置を外部座標で返す
    pub fn coord(&self) -> Coord {
        match self {
            AIChoice::TicTacToe(idx) => coord_of(*idx),
            AIChoice::Othello(legal_move) => Coord::from(legal_move.position),
        }
    }
}

/// AIの手の計算結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIMoveResult {
    pub choice: AIChoice,
    /// 使用した戦略名
    pub strategy: String,
    /// 待ち時間を含む思考時間（ミリ秒）
    pub thinking_time_ms: u64,
    /// 戦略による手の評価値
    pub evaluation_score: Option<i32>,
}

/// AIサービスの統一インターフェース
#[async_trait]
pub trait AIService: Send + Sync {
    /// 指定した盤面・手番・難易度でAIの手を計算する
    async fn calculate_move(
        &self,
        board: &GameBoard,
        side: Side,
        difficulty: Difficulty,
    ) -> Result<AIMoveResult, AIError>;

    /// サービス名を返す
    fn get_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::othello::Position;

    #[test]
    fn test_choice_coord() {
        assert_eq!(AIChoice::TicTacToe(5).coord(), Coord::new(1, 2));

        let legal_move = LegalMove {
            position: Position { row: 2, col: 3 },
            flips: vec![Position { row: 3, col: 3 }],
        };
        assert_eq!(AIChoice::Othello(legal_move).coord(), Coord::new(2, 3));
    }
}
