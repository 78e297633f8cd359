use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::state::AppState;

use super::RateKey;

/// The rate limit key `middleware::rate_key` resolved for this request.
///
/// ```ignore
/// async fn handler(RateKeyExtractor(key): RateKeyExtractor) -> String {
///     key.0 // JWT sub, or the peer IP when the cookie is unusable
/// }
/// ```
///
/// key の算出自体は失敗しない (必ず sub か IP が入る) ので、
/// extensions に無い = middleware を掛け忘れたルート。500 で落とす。
pub struct RateKeyExtractor(pub RateKey);

impl FromRequestParts<AppState> for RateKeyExtractor {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<RateKey>() {
            Some(key) => Ok(Self(key.clone())),
            None => {
                tracing::error!(uri = %parts.uri, "route is not behind the rate key middleware");
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
