/*
 * Responsibility
 * - POST /login: ランダムな user id で session JWT を発行し authorization cookie にセット
 * - GET /fetch: authorization cookie の JWT を署名検証してから応答
 */
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::rate_key::cookie_header;
use crate::services::rate_key::{AUTH_COOKIE, find_cookie};
use crate::state::AppState;

pub async fn login(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let user_id = Uuid::new_v4().to_string();
    let token = state.sessions.issue(&user_id)?;

    let cookie = HeaderValue::from_str(&state.sessions.cookie(&token)).map_err(|e| {
        error!(error = %e, "session cookie is not a valid header value");
        AppError::Internal
    })?;

    info!(user_id = %user_id, ttl_seconds = state.sessions.ttl_seconds(), "session issued");

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        format!("Login successful. User ID: {user_id}"),
    ))
}

pub async fn fetch(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let cookies = cookie_header(&headers);
    let token = find_cookie(&cookies, AUTH_COOKIE).ok_or(AppError::Unauthorized)?;

    let claims = state.sessions.verify(token)?;

    info!(user_id = %claims.sub, "request from user");

    Ok((StatusCode::OK, "Hello, world!"))
}
