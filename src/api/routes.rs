use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::config::ServerConfig;

use super::{
    handlers::{
        computer_move, create_session, delete_session, get_legal_moves, get_session, health_check,
        list_sessions, new_game, reset_scores, submit_move, AppState,
    },
    middleware::{cors, logging},
};

pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/new-game", post(new_game))
        .route("/api/sessions/:id/move", post(submit_move))
        .route("/api/sessions/:id/computer-move", post(computer_move))
        .route("/api/sessions/:id/legal-moves", get(get_legal_moves))
        .route("/api/sessions/:id/scores", delete(reset_scores))
        .route("/health", get(health_check))
        .with_state(state);

    if server.enable_cors {
        router = router.layer(middleware::from_fn(cors));
    }
    if server.enable_logging {
        router = router.layer(middleware::from_fn(logging));
    }

    router
}
