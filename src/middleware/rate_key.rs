//! Cookie JWT → rate limit key → request extensions + request header
//!
//! - `Cookie` ヘッダと接続元 IP を ClaimExtractor に渡して key を決める
//! - key は `RateKey` として extensions に入れ、設定されたヘッダ (既定 `x-rate-limit-key`) にも書く
//! - どんな入力でもリクエストを拒否しない
//!
//! 下流の rate limiter / upstream はこのヘッダか `RateKey` を見ればよい。

use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::RateKey;
use crate::state::AppState;

/// Router 全体に rate key の算出を掛ける。
///
/// 例：
/// ```ignore
/// let router = middleware::rate_key::apply(api::routes(), state.clone());
/// let app = router.with_state(state);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, rate_key_middleware))
}

async fn rate_key_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let cookies = cookie_header(req.headers());

    // nginx の $remote_addr と同じく IP のみ (port は含めない)
    let remote_address = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();

    let key = state.extractor.get_user_id(&cookies, &remote_address);

    // client が送ってきた同名ヘッダは必ず上書き or 削除する
    // UTF-8 の sub はそのまま bytes で通す。制御文字を含む場合だけ落とす
    match HeaderValue::from_bytes(key.as_bytes()) {
        Ok(value) => {
            req.headers_mut().insert(state.rate_key_header.clone(), value);
        }
        Err(err) => {
            tracing::warn!(error = %err, "rate key is not a valid header value");
            req.headers_mut().remove(&state.rate_key_header);
        }
    }

    tracing::debug!(rate_key = %key, "rate key resolved");
    req.extensions_mut().insert(RateKey(key));

    next.run(req).await
}

/// All `Cookie` headers joined with `"; "` (HTTP/2 clients may split them).
///
/// Non-UTF-8 values are skipped; no header at all yields `""`.
pub fn cookie_header(headers: &HeaderMap) -> String {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ")
}
