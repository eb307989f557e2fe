//! 対局サービス
//! セッション管理とAIサービスを組み合わせ、外部インターフェースの各操作
//! （新規対局、着手、コンピュータの着手、合法手取得、成績リセット）を提供する。
//! コンピュータの着手中はセッションをロックし、演出の待ち時間が終わるまで人間の操作を拒否する。

use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ai::{AIService, LocalAIService};
use crate::config::{Config, PacingConfig};
use crate::error::{GameError, InvalidStateReason, Result};
use crate::game::types::Coord;

use super::manager::{SessionManager, SessionStats};
use super::state::{GameSession, MoveOutcome, Scoreboard, SessionConfig};

#[derive(Clone)]
pub struct GameService {
    session_manager: Arc<SessionManager>,
    ai_service: Arc<dyn AIService>,
    pacing: PacingConfig,
}

impl std::fmt::Debug for GameService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameService")
            .field("session_manager", &self.session_manager)
            .field("ai_service", &self.ai_service.get_name())
            .field("pacing", &self.pacing)
            .finish()
    }
}

impl GameService {
    pub fn new(
        session_manager: Arc<SessionManager>,
        ai_service: Arc<dyn AIService>,
        pacing: PacingConfig,
    ) -> Self {
        Self {
            session_manager,
            ai_service,
            pacing,
        }
    }

    /// 設定からセッションマネージャーとローカルAIサービスを組み立てる
    pub fn from_config(config: &Config) -> Self {
        let session_manager = Arc::new(SessionManager::with_timeout(
            config.sessions.max_sessions,
            config.sessions.session_timeout_minutes,
        ));
        let ai_service = Arc::new(LocalAIService::new(config.pacing.thinking_delay));

        Self::new(session_manager, ai_service, config.pacing.clone())
    }

    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.session_manager
    }

    pub fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    pub fn create_session(&self, config: SessionConfig) -> Result<GameSession> {
        let session = self.session_manager.create_session(config)?;
        info!(session_id = %session.id, kind = %config.kind, opponent = ?config.opponent, "session created");
        Ok(session)
    }

    pub fn get_session(&self, session_id: Uuid) -> Result<GameSession> {
        self.session_manager.get_session(&session_id)
    }

    /// 盤面を初期化して新しい対局を始める（通算成績は保持）
    /// コンピュータの着手は中断できないため、ロック中は拒否する
    pub fn new_game(&self, session_id: Uuid) -> Result<GameSession> {
        self.session_manager.with_session_mut(&session_id, |session| {
            if session.locked {
                return Err(GameError::invalid_state(InvalidStateReason::BoardLocked));
            }
            session.new_game();
            debug!(session_id = %session_id, "new game started");
            Ok(session.clone())
        })
    }

    /// 人間の着手を適用する
    /// 石を返す演出やコンピュータの応手が続く場合は、ロックしたままバックグラウンドで進める
    pub async fn submit_move(&self, session_id: Uuid, coord: Coord) -> Result<MoveOutcome> {
        let (outcome, hand_off, animate) = self.session_manager.with_session_mut(&session_id, |session| {
            let outcome = session.submit_move(coord)?;
            let hand_off = self.pacing.auto_computer_turn && session.is_computer_turn();
            let animate = !outcome.flipped.is_empty() && !self.pacing.flip_step.is_zero();
            if hand_off || animate {
                session.lock();
            }
            Ok((outcome, hand_off, animate))
        })?;

        if hand_off || animate {
            let service = self.clone();
            let flip_count = outcome.flipped.len();
            tokio::spawn(async move {
                service.animate_flips(flip_count).await;
                if hand_off {
                    service.run_computer_turns(session_id).await;
                }
                service.release(session_id);
            });
        }

        Ok(outcome)
    }

    /// コンピュータに1手指させる
    /// 開始から演出の完了までセッションをロックする
    pub async fn computer_move(&self, session_id: Uuid) -> Result<MoveOutcome> {
        self.session_manager.with_session_mut(&session_id, |session| {
            if !session.is_active() {
                return Err(GameError::invalid_state(InvalidStateReason::GameInactive));
            }
            if session.locked {
                return Err(GameError::invalid_state(InvalidStateReason::BoardLocked));
            }
            if !session.is_computer_turn() {
                return Err(GameError::invalid_state(InvalidStateReason::NotYourTurn));
            }
            session.lock();
            Ok(())
        })?;

        let result = self.play_computer_turn(session_id).await;
        self.release(session_id);
        result
    }

    /// 手番側の合法手（ヒント表示用）
    pub fn get_legal_moves(&self, session_id: Uuid) -> Result<Vec<Coord>> {
        Ok(self.session_manager.get_session(&session_id)?.legal_moves())
    }

    pub fn reset_scores(&self, session_id: Uuid) -> Result<Scoreboard> {
        self.session_manager.with_session_mut(&session_id, |session| {
            session.reset_scores();
            Ok(session.scores)
        })
    }

    pub fn delete_session(&self, session_id: Uuid) -> Result<()> {
        self.session_manager.remove_session(&session_id)?;
        info!(session_id = %session_id, "session deleted");
        Ok(())
    }

    pub fn list_sessions(&self) -> Vec<GameSession> {
        self.session_manager.list_sessions()
    }

    pub fn cleanup_inactive_sessions(&self) -> usize {
        let removed = self.session_manager.cleanup_inactive_sessions();
        if removed > 0 {
            info!(removed, "inactive sessions cleaned up");
        }
        removed
    }

    pub fn get_service_stats(&self) -> SessionStats {
        self.session_manager.get_stats()
    }

    /// ロック済みのセッションでAIに考えさせ、選んだ手を適用する
    async fn play_computer_turn(&self, session_id: Uuid) -> Result<MoveOutcome> {
        let snapshot = self.session_manager.get_session(&session_id)?;
        let side = snapshot
            .current_side()
            .ok_or(GameError::invalid_state(InvalidStateReason::GameInactive))?;
        let difficulty = snapshot
            .config
            .difficulty()
            .ok_or(GameError::invalid_state(InvalidStateReason::NotYourTurn))?;

        let ai_result = self.ai_service.calculate_move(&snapshot.board, side, difficulty).await?;
        let outcome = self
            .session_manager
            .with_session_mut(&session_id, |session| session.apply_computer_move(&ai_result.choice))?;

        info!(
            session_id = %session_id,
            strategy = %ai_result.strategy,
            placed = %outcome.placed,
            flipped = outcome.flipped.len(),
            thinking_time_ms = ai_result.thinking_time_ms,
            evaluation_score = ?ai_result.evaluation_score,
            "computer moved"
        );

        self.animate_flips(outcome.flipped.len()).await;
        Ok(outcome)
    }

    /// 人間がパスしている間、コンピュータが続けて指す
    async fn run_computer_turns(&self, session_id: Uuid) {
        loop {
            match self.play_computer_turn(session_id).await {
                Ok(outcome) if outcome.forced_pass() => {
                    if !self.pacing.forced_pass_delay.is_zero() {
                        sleep(self.pacing.forced_pass_delay).await;
                    }
                }
                Ok(_) => break,
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "computer turn aborted");
                    break;
                }
            }
        }
    }

    /// 石を1枚ずつ返す演出の時間だけ待つ
    async fn animate_flips(&self, flip_count: usize) {
        if self.pacing.flip_step.is_zero() {
            return;
        }
        for _ in 0..flip_count {
            sleep(self.pacing.flip_step).await;
        }
    }

    fn release(&self, session_id: Uuid) {
        let released = self.session_manager.with_session_mut(&session_id, |session| {
            session.unlock();
            Ok(())
        });
        if let Err(e) = released {
            debug!(session_id = %session_id, error = %e, "session gone before unlock");
        }
    }
}
