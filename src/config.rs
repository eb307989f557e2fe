//! アプリケーション設定管理モジュール
//! サーバー、セッション、演出の待ち時間、既定の難易度などの設定を
//! 設定ファイルと環境変数から読み込んで管理する。

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, str::FromStr, time::Duration};

use crate::ai::Difficulty;
use crate::game::types::GameKind;

/// Duration型をJSONでシリアライズするためのモジュール
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    /// Durationを(secs, nanos)のタプルとしてシリアライズ
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_secs(), duration.subsec_nanos()).serialize(serializer)
    }

    /// (secs, nanos)のタプルからDurationをデシリアライズ
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (secs, nanos) = <(u64, u32)>::deserialize(deserializer)?;
        Ok(Duration::new(secs, nanos))
    }
}

/// サーバーの設定を管理する構造体
/// ポート番号、ホスト名、CORS設定などを含む
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub enable_cors: bool,
    pub enable_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            enable_cors: true,
            enable_logging: true,
        }
    }
}

/// セッション管理の設定
/// セッション数制限、タイムアウト、クリーンアップ設定など
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub max_sessions: usize,
    pub session_timeout_minutes: i64,
    pub enable_session_cleanup: bool,
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_sessions: 100,
            session_timeout_minutes: 30,
            enable_session_cleanup: true,
            cleanup_interval_minutes: 5,
        }
    }
}

/// コンピュータの着手にかける演出上の待ち時間
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// 着手前の「考えている」時間
    #[serde(with = "duration_serde")]
    pub thinking_delay: Duration,
    /// ひっくり返す石1枚あたりの時間
    #[serde(with = "duration_serde")]
    pub flip_step: Duration,
    /// 人間がパスしてコンピュータが続けて打つまでの時間
    #[serde(with = "duration_serde")]
    pub forced_pass_delay: Duration,
    /// 人間の着手後、自動でコンピュータに打たせる
    pub auto_computer_turn: bool,
}

impl PacingConfig {
    /// 待ち時間なし（テスト用）
    pub fn instant() -> Self {
        Self {
            thinking_delay: Duration::ZERO,
            flip_step: Duration::ZERO,
            forced_pass_delay: Duration::ZERO,
            auto_computer_turn: false,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            thinking_delay: Duration::from_millis(700),
            flip_step: Duration::from_millis(150),
            forced_pass_delay: Duration::from_millis(1000),
            auto_computer_turn: true,
        }
    }
}

/// セッション作成時に難易度が省略された場合の既定値
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub tictactoe_difficulty: Difficulty,
    pub othello_difficulty: Difficulty,
}

impl DefaultsConfig {
    pub fn difficulty_for(&self, kind: GameKind) -> Difficulty {
        match kind {
            GameKind::TicTacToe => self.tictactoe_difficulty,
            GameKind::Othello => self.othello_difficulty,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tictactoe_difficulty: Difficulty::default_for(GameKind::TicTacToe),
            othello_difficulty: Difficulty::default_for(GameKind::Othello),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing-subscriberのフィルタ指定（例: "info", "board_games=debug"）
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// アプリケーションの全設定を統合するメイン設定構造体
/// 各サブシステムの設定をまとめて管理する
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub sessions: SessionSettings,
    pub pacing: PacingConfig,
    pub defaults: DefaultsConfig,
    pub logging: LoggingConfig,
}

/// 設定関連のエラーを表すenum
/// ファイル読み込み、パース、検証エラーなどを含む
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("設定ファイル読み込みエラー: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("設定ファイル解析エラー: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("環境変数エラー: {name} = {value}")]
    EnvVarError { name: String, value: String },

    #[error("設定値が無効です: {field} = {value}")]
    InvalidValue { field: String, value: String },
}

/// 環境変数を読み、設定されていればパースした値を返す
fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarError {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// 指定したファイルパスから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 環境変数から設定を読み込む
    /// デフォルト値をベースに環境変数で上書きする
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// 設定されている環境変数の値で上書きする
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(port) = parse_env("SERVER_PORT")? {
            self.server.port = port;
        }

        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(max_sessions) = parse_env("MAX_SESSIONS")? {
            self.sessions.max_sessions = max_sessions;
        }

        if let Some(timeout) = parse_env("SESSION_TIMEOUT_MINUTES")? {
            self.sessions.session_timeout_minutes = timeout;
        }

        if let Some(delay_ms) = parse_env::<u64>("AI_THINKING_DELAY_MS")? {
            self.pacing.thinking_delay = Duration::from_millis(delay_ms);
        }

        if let Some(step_ms) = parse_env::<u64>("FLIP_STEP_MS")? {
            self.pacing.flip_step = Duration::from_millis(step_ms);
        }

        if let Some(pass_ms) = parse_env::<u64>("FORCED_PASS_DELAY_MS")? {
            self.pacing.forced_pass_delay = Duration::from_millis(pass_ms);
        }

        if let Some(auto) = parse_env("AUTO_COMPUTER_TURN")? {
            self.pacing.auto_computer_turn = auto;
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// 設定ファイルと環境変数を結合して設定を読み込む
    /// 設定ファイルがなくてもデフォルト値で動作する
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("config.json")
            .or_else(|_| Self::from_file("config/app.json"))
            .unwrap_or_default();

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// 現在の設定を指定したファイルに保存する
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 設定値の妥当性をチェックする
    /// 不正な値がある場合はConfigErrorを返す
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                value: self.server.port.to_string(),
            });
        }

        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.max_sessions".to_string(),
                value: self.sessions.max_sessions.to_string(),
            });
        }

        if self.sessions.session_timeout_minutes < 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.session_timeout_minutes".to_string(),
                value: self.sessions.session_timeout_minutes.to_string(),
            });
        }

        for (field, kind, difficulty) in [
            ("defaults.tictactoe_difficulty", GameKind::TicTacToe, self.defaults.tictactoe_difficulty),
            ("defaults.othello_difficulty", GameKind::Othello, self.defaults.othello_difficulty),
        ] {
            if !difficulty.supports(kind) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: difficulty.to_string(),
                });
            }
        }

        Ok(())
    }
}
