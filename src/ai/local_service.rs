use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

use crate::error::AIError;
use crate::game::types::Side;
use crate::game::GameBoard;

use super::service::{AIChoice, AIMoveResult, AIService};
use super::strategies::{create_othello_strategy, create_tictactoe_strategy, Difficulty};

/// プロセス内で戦略を実行するAIサービス
#[derive(Debug, Clone)]
pub struct LocalAIService {
    pub thinking_delay: Duration,
}

impl LocalAIService {
    pub fn new(thinking_delay: Duration) -> Self {
        Self { thinking_delay }
    }

    /// 待ち時間なし（テスト用）
    pub fn new_fast() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for LocalAIService {
    fn default() -> Self {
        Self::new(Duration::from_millis(700))
    }
}

#[async_trait]
impl AIService for LocalAIService {
    async fn calculate_move(
        &self,
        board: &GameBoard,
        side: Side,
        difficulty: Difficulty,
    ) -> Result<AIMoveResult, AIError> {
        let start_time = Instant::now();

        // 先に戦略を決めておき、難易度の不一致は待たずに返す
        let (choice, strategy, evaluation_score) = match board {
            GameBoard::TicTacToe(inner) => {
                let strategy = create_tictactoe_strategy(difficulty)?;
                let idx = strategy.calculate_move(inner, side)?;
                let score = strategy.score_move(inner, side, &idx);
                (AIChoice::TicTacToe(idx), strategy.get_name(), score)
            }
            GameBoard::Othello(inner) => {
                let strategy = create_othello_strategy(difficulty)?;
                let legal_move = strategy.calculate_move(inner, side)?;
                let score = strategy.score_move(inner, side, &legal_move);
                (AIChoice::Othello(legal_move), strategy.get_name(), score)
            }
        };

        if !self.thinking_delay.is_zero() {
            sleep(self.thinking_delay).await;
        }

        let thinking_time_ms = start_time.elapsed().as_millis() as u64;
        debug!(strategy, thinking_time_ms, "AI move calculated");

        Ok(AIMoveResult {
            choice,
            strategy: strategy.to_string(),
            thinking_time_ms,
            evaluation_score,
        })
    }

    fn get_name(&self) -> &'static str {
        "LocalAIService"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Coord, GameKind};

    #[tokio::test]
    async fn test_calculate_move_tictactoe() {
        let service = LocalAIService::new_fast();
        let board = GameBoard::new(GameKind::TicTacToe);

        let result = service
            .calculate_move(&board, Side::Second, Difficulty::Exhaustive)
            .await
            .unwrap();

        assert_eq!(result.choice, AIChoice::TicTacToe(4));
        assert_eq!(result.strategy, "MinimaxAI");
        assert_eq!(result.evaluation_score, Some(0));
    }

    #[tokio::test]
    async fn test_calculate_move_othello() {
        let service = LocalAIService::new_fast();
        let board = GameBoard::new(GameKind::Othello);

        let result = service
            .calculate_move(&board, Side::First, Difficulty::Weighted)
            .await
            .unwrap();

        assert!(board.legal_moves(Side::First).contains(&result.choice.coord()));
        assert_eq!(result.choice.coord(), Coord::new(2, 3));
        // 重み -1 + フリップ 1
        assert_eq!(result.evaluation_score, Some(0));
    }

    #[tokio::test]
    async fn test_mismatched_difficulty() {
        let service = LocalAIService::new_fast();
        let board = GameBoard::new(GameKind::Othello);

        let result = service.calculate_move(&board, Side::Second, Difficulty::Heuristic).await;
        assert!(matches!(result, Err(AIError::UnsupportedDifficulty { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_thinking_delay_is_applied() {
        let service = LocalAIService::new(Duration::from_millis(700));
        let board = GameBoard::new(GameKind::TicTacToe);

        let before = tokio::time::Instant::now();
        service
            .calculate_move(&board, Side::Second, Difficulty::Heuristic)
            .await
            .unwrap();
        assert!(before.elapsed() >= Duration::from_millis(700));
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(LocalAIService::default().thinking_delay, Duration::from_millis(700));
        assert!(LocalAIService::new_fast().thinking_delay.is_zero());
    }
}
