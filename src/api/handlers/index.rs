/*
 * Responsibility
 * - GET / (認証不要の疎通確認, plain text)
 * - GET /health (監視用, JSON)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "jwt test")
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
