//! ゲームセッション管理モジュール
//! 同時に対局する複数のセッションを管理し、
//! セッション数制限、タイムアウト処理、クリーンアップを担当する。

use chrono::{Duration, Utc};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::error::{GameError, Result};

use super::state::{GameSession, SessionConfig};

/// ゲームセッションの管理を行うメイン構造体
/// スレッドセーフなDashMapで同時アクセスを効率的に処理
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// アクティブセッションのコレクション
    sessions: Arc<DashMap<Uuid, GameSession>>,
    /// 上限チェックと登録をまとめて行うためのロック
    create_lock: Arc<Mutex<()>>,
    /// 同時存在可能な最大セッション数
    max_sessions: usize,
    /// セッションのタイムアウト時間（分）
    session_timeout_minutes: i64,
}

impl SessionManager {
    /// デフォルトタイムアウト（30分）でセッションマネージャーを作成
    pub fn new(max_sessions: usize) -> Self {
        Self::with_timeout(max_sessions, 30)
    }

    /// カスタムタイムアウトでセッションマネージャーを作成
    pub fn with_timeout(max_sessions: usize, timeout_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            create_lock: Arc::new(Mutex::new(())),
            max_sessions,
            session_timeout_minutes: timeout_minutes,
        }
    }

    /// 新しいセッションを作成して登録する
    /// 最大セッション数に達している場合はエラーを返す
    pub fn create_session(&self, config: SessionConfig) -> Result<GameSession> {
        let _guard = self.create_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.sessions.len() >= self.max_sessions {
            return Err(GameError::SessionLimitExceeded { max: self.max_sessions });
        }

        let session = GameSession::new(config)?;
        self.sessions.insert(session.id, session.clone());

        Ok(session)
    }

    /// 指定したIDのセッションのスナップショットを取得する
    pub fn get_session(&self, session_id: &Uuid) -> Result<GameSession> {
        match self.sessions.get(session_id) {
            Some(session) => Ok(session.clone()),
            None => Err(GameError::SessionNotFound { session_id: *session_id }),
        }
    }

    /// エントリのロックを保持したままセッションを変更する
    /// 検証と変更が同じロック内で行われるため、並行する着手が割り込むことはない
    pub fn with_session_mut<F, R>(&self, session_id: &Uuid, f: F) -> Result<R>
    where
        F: FnOnce(&mut GameSession) -> Result<R>,
    {
        match self.sessions.get_mut(session_id) {
            Some(mut session) => f(&mut session),
            None => Err(GameError::SessionNotFound { session_id: *session_id }),
        }
    }

    pub fn remove_session(&self, session_id: &Uuid) -> Result<GameSession> {
        match self.sessions.remove(session_id) {
            Some((_, session)) => Ok(session),
            None => Err(GameError::SessionNotFound { session_id: *session_id }),
        }
    }

    pub fn list_sessions(&self) -> Vec<GameSession> {
        self.sessions.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// 一定時間操作のないセッションを削除する
    /// コンピュータの着手中（ロック中）のセッションは残す
    pub fn cleanup_inactive_sessions(&self) -> usize {
        let cutoff_time = Utc::now() - Duration::minutes(self.session_timeout_minutes);

        let expired_ids: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|entry| !entry.value().locked && entry.value().last_updated < cutoff_time)
            .map(|entry| *entry.key())
            .collect();

        expired_ids
            .into_iter()
            .filter(|session_id| self.sessions.remove(session_id).is_some())
            .count()
    }

    pub fn session_exists(&self, session_id: &Uuid) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn get_stats(&self) -> SessionStats {
        let mut stats = SessionStats {
            total_sessions: self.sessions.len(),
            max_sessions: self.max_sessions,
            ..SessionStats::default()
        };

        for entry in self.sessions.iter() {
            let session = entry.value();
            if session.locked {
                stats.locked_sessions += 1;
            }
            if session.is_active() {
                stats.active_games += 1;
            }
        }

        stats
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(100)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub max_sessions: usize,
    pub locked_sessions: usize,
    pub active_games: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Difficulty;
    use crate::game::types::{Coord, GameKind};

    fn othello_config() -> SessionConfig {
        SessionConfig::vs_computer(GameKind::Othello, Difficulty::Greedy)
    }

    #[test]
    fn test_session_limit_holds_under_concurrent_creation() {
        let manager = SessionManager::new(5);

        let created = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..32)
                .map(|_| scope.spawn(|| manager.create_session(othello_config()).is_ok()))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });

        assert_eq!(created, 5);
        assert_eq!(manager.session_count(), 5);
    }

    #[test]
    fn test_create_session() {
        let manager = SessionManager::new(10);
        let session = manager.create_session(othello_config()).unwrap();

        assert!(manager.session_exists(&session.id));
        assert_eq!(manager.session_count(), 1);
    }

    #[test]
    fn test_max_sessions_limit() {
        let manager = SessionManager::new(2);

        manager.create_session(othello_config()).unwrap();
        manager.create_session(SessionConfig::two_player(GameKind::TicTacToe)).unwrap();

        let result = manager.create_session(othello_config());
        assert!(matches!(result, Err(GameError::SessionLimitExceeded { max: 2 })));
    }

    #[test]
    fn test_invalid_config_not_registered() {
        let manager = SessionManager::new(10);
        let result = manager.create_session(SessionConfig::vs_computer(GameKind::Othello, Difficulty::Exhaustive));

        assert!(matches!(result, Err(GameError::InvalidConfiguration { .. })));
        assert_eq!(manager.session_count(), 0);
    }

    #[test]
    fn test_get_nonexistent_session() {
        let manager = SessionManager::new(10);
        let result = manager.get_session(&Uuid::new_v4());
        assert!(matches!(result, Err(GameError::SessionNotFound { .. })));
    }

    #[test]
    fn test_with_session_mut() {
        let manager = SessionManager::new(10);
        let session_id = manager.create_session(othello_config()).unwrap().id;

        let outcome = manager
            .with_session_mut(&session_id, |session| session.submit_move(Coord::new(2, 3)))
            .unwrap();
        assert_eq!(outcome.flipped.len(), 1);
        assert_eq!(manager.get_session(&session_id).unwrap().move_count, 1);

        // 失敗した変更は反映されない
        let result = manager.with_session_mut(&session_id, |session| session.submit_move(Coord::new(0, 0)));
        assert!(result.is_err());
        assert_eq!(manager.get_session(&session_id).unwrap().move_count, 1);
    }

    #[test]
    fn test_remove_session() {
        let manager = SessionManager::new(10);
        let session_id = manager.create_session(othello_config()).unwrap().id;

        let removed = manager.remove_session(&session_id).unwrap();
        assert_eq!(removed.id, session_id);
        assert!(!manager.session_exists(&session_id));
        assert!(manager.remove_session(&session_id).is_err());
    }

    #[tokio::test]
    async fn test_cleanup_inactive_sessions() {
        let manager = SessionManager::with_timeout(10, 0);

        let locked_id = manager.create_session(othello_config()).unwrap().id;
        manager.create_session(othello_config()).unwrap();
        manager
            .with_session_mut(&locked_id, |session| {
                session.lock();
                Ok(())
            })
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let removed_count = manager.cleanup_inactive_sessions();

        assert_eq!(removed_count, 1);
        assert!(manager.session_exists(&locked_id));
    }

    #[test]
    fn test_session_stats() {
        let manager = SessionManager::new(10);
        manager.create_session(othello_config()).unwrap();
        let stats = manager.get_stats();

        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.max_sessions, 10);
        assert_eq!(stats.locked_sessions, 0);
        assert_eq!(stats.active_games, 1);
    }
}
