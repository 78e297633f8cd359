/*
 * Responsibility
 * - URL 構造を定義 (/, /health, /login, /me, /fetch)
 * - rate key の middleware は app.rs 側で Router 全体に掛ける
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    index::{health, root},
    me::me,
    session::{fetch, login},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/fetch", get(fetch))
}
