//! 対局APIサーバーのエントリポイント
//! 設定読み込み、ログ初期化、対局サービス初期化、HTTPサーバー起動を行う。

use std::{sync::Arc, time::Duration};

use board_games::{
    api::{create_router, AppState},
    config::Config,
    session::GameService,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// メイン関数 - サーバーの初期化と起動を担当
#[tokio::main]
async fn main() {
    // 設定ファイルと環境変数から統合設定を読み込み
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("設定エラー: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = config.validate() {
        error!(error = %e, "invalid configuration");
        std::process::exit(1);
    }

    info!(
        host = %config.server.host,
        port = config.server.port,
        max_sessions = config.sessions.max_sessions,
        thinking_delay_ms = config.pacing.thinking_delay.as_millis() as u64,
        auto_computer_turn = config.pacing.auto_computer_turn,
        "configuration loaded"
    );

    let service = Arc::new(GameService::from_config(&config));

    if config.sessions.enable_session_cleanup {
        let cleanup_service = Arc::clone(&service);
        let interval = Duration::from_secs(config.sessions.cleanup_interval_minutes.max(1) * 60);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                cleanup_service.cleanup_inactive_sessions();
            }
        });
    }

    let state = AppState::new(service, config.defaults.clone());
    let app = create_router(state, &config.server);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(address = %bind_address, error = %e, "failed to bind address");
            std::process::exit(1);
        }
    };

    info!(address = %bind_address, "board games API server started");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server terminated");
        std::process::exit(1);
    }
}
